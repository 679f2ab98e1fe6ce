//! Searchable contexts and union expansion.

use std::sync::Arc;

use scout_core::Context;

use crate::extension::SearchExtension;

/// Top-level contexts covered by `all`, in query order.
pub const BUILTIN_CONTEXTS: &[Context] = &[
    Context::Allocs,
    Context::Jobs,
    Context::Nodes,
    Context::Evals,
    Context::Deployments,
    Context::Plugins,
    Context::Volumes,
    Context::ScalingPolicies,
    Context::Namespaces,
];

/// Contexts whose records carry a name and so take part in fuzzy search.
pub const FUZZY_CONTEXTS: &[Context] =
    &[Context::Nodes, Context::Namespaces, Context::Jobs, Context::Allocs];

pub struct Catalog {
    all: Vec<Context>,
    ext: Arc<dyn SearchExtension>,
}

impl Catalog {
    pub fn new(ext: Arc<dyn SearchExtension>) -> Self {
        let mut all = BUILTIN_CONTEXTS.to_vec();
        for ctx in ext.contexts() {
            if ctx.is_union() || all.contains(&ctx) {
                continue;
            }
            all.push(ctx);
        }
        Self { all, ext }
    }

    pub fn all(&self) -> &[Context] {
        &self.all
    }

    /// Built-in fuzzy contexts and every registered extension context.
    pub fn is_fuzzy(&self, context: &Context) -> bool {
        FUZZY_CONTEXTS.contains(context)
            || (context.is_extension() && self.all.contains(context))
    }

    /// Concrete contexts to query for `context`.
    pub fn expand(&self, context: &Context) -> Vec<Context> {
        match context {
            Context::All => self.all.clone(),
            Context::Fuzzy => {
                let ext = self.all.iter().filter(|c| c.is_extension());
                FUZZY_CONTEXTS.iter().chain(ext).cloned().collect()
            }
            Context::Extension(_) => self.ext.try_expand(context).unwrap_or_else(|| {
                if self.all.contains(context) { vec![context.clone()] } else { Vec::new() }
            }),
            other => vec![other.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::NoopExtension;

    struct Quotas;

    impl SearchExtension for Quotas {
        fn contexts(&self) -> Vec<Context> {
            vec![Context::from("quotas"), Context::Jobs, Context::All]
        }
    }

    #[test]
    fn all_is_builtin_order() {
        let c = Catalog::new(Arc::new(NoopExtension));
        assert_eq!(c.expand(&Context::All), BUILTIN_CONTEXTS.to_vec());
        assert_eq!(
            c.expand(&Context::Fuzzy),
            vec![Context::Nodes, Context::Namespaces, Context::Jobs, Context::Allocs]
        );
    }

    #[test]
    fn concrete_contexts_expand_to_themselves() {
        let c = Catalog::new(Arc::new(NoopExtension));
        assert_eq!(c.expand(&Context::Evals), vec![Context::Evals]);
        assert_eq!(c.expand(&Context::Groups), vec![Context::Groups]);
    }

    #[test]
    fn unknown_extension_context_expands_to_nothing() {
        let c = Catalog::new(Arc::new(NoopExtension));
        assert!(c.expand(&Context::from("quotas")).is_empty());
    }

    #[test]
    fn registered_contexts_join_all_once() {
        let c = Catalog::new(Arc::new(Quotas));
        let all = c.expand(&Context::All);
        assert_eq!(all.len(), BUILTIN_CONTEXTS.len() + 1);
        assert_eq!(all.last(), Some(&Context::from("quotas")));
        assert_eq!(c.expand(&Context::from("quotas")), vec![Context::from("quotas")]);
    }

    #[test]
    fn registered_contexts_join_fuzzy() {
        let c = Catalog::new(Arc::new(Quotas));
        let fuzzy = c.expand(&Context::Fuzzy);
        assert_eq!(fuzzy.len(), FUZZY_CONTEXTS.len() + 1);
        assert_eq!(fuzzy.last(), Some(&Context::from("quotas")));
        assert!(c.is_fuzzy(&Context::from("quotas")));
        assert!(c.is_fuzzy(&Context::Jobs));
        assert!(!c.is_fuzzy(&Context::Evals));
        assert!(!Catalog::new(Arc::new(NoopExtension)).is_fuzzy(&Context::from("quotas")));
    }
}
