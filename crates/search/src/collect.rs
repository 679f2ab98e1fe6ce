//! Bounded identifier collection for prefix search.

use std::borrow::Cow;

use scout_store::ResourceIter;
use tracing::error;

use crate::extension::SearchExtension;

/// Maximum records read from one context before the result is marked
/// truncated.
pub const TRUNCATE_LIMIT: usize = 20;

/// Read up to [`TRUNCATE_LIMIT`] records and keep the identifiers that start
/// with `exact_prefix`, in iterator order. Truncation reports whether the
/// iterator had records beyond the limit, whether or not those would match.
pub fn collect(
    mut iter: ResourceIter<'_>,
    exact_prefix: &str,
    ext: &dyn SearchExtension,
) -> (Vec<String>, bool) {
    let mut ids = Vec::new();
    for res in iter.by_ref().take(TRUNCATE_LIMIT) {
        let id = match res.id() {
            Some(id) => Cow::Borrowed(id),
            None => match ext.try_identify(res) {
                Some(id) => Cow::Owned(id),
                None => {
                    error!(kind = %res.kind(), "search: unexpected type for resources context");
                    continue;
                }
            },
        };
        if !id.starts_with(exact_prefix) {
            continue;
        }
        ids.push(id.into_owned());
    }
    let truncated = iter.next().is_some();
    (ids, truncated)
}
