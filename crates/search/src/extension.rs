//! Hook for resource kinds the open core does not implement itself.

use scout_core::{Context, Resource};
use scout_store::{ResourceIter, StateReader, StoreError};

/// Capabilities an extension may contribute. Every method returns `None` when
/// the extension does not handle the context or record; the core then treats
/// the context as having no matches.
pub trait SearchExtension: Send + Sync {
    /// Extra top-level contexts, appended to `all` when the catalog is built.
    fn contexts(&self) -> Vec<Context> {
        Vec::new()
    }

    fn try_expand(&self, _context: &Context) -> Option<Vec<Context>> {
        None
    }

    fn try_identify(&self, _resource: &Resource) -> Option<String> {
        None
    }

    fn try_name(&self, _resource: &Resource) -> Option<String> {
        None
    }

    fn try_iterate<'a>(
        &'a self,
        _context: &Context,
        _state: &'a dyn StateReader,
        _namespace: &str,
        _prefix: &str,
    ) -> Option<Result<ResourceIter<'a>, StoreError>> {
        None
    }

    fn try_index(&self, _context: &Context, _state: &dyn StateReader) -> Option<Result<u64, StoreError>> {
        None
    }
}

/// Extension that handles nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExtension;

impl SearchExtension for NoopExtension {}
