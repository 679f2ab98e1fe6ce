//! Access checks: which contexts a caller may search, and which namespace
//! records they may see.

use scout_core::{AccessControl, Capability, Context, Resource};
use scout_store::ResourceIter;

/// Nodes need node read; unions need node read or job read in `namespace`;
/// everything else needs job read (or list) in `namespace`. No ACL means
/// unrestricted.
pub fn sufficient_search_perms(
    acl: Option<&dyn AccessControl>,
    namespace: &str,
    context: &Context,
) -> bool {
    let Some(acl) = acl else {
        return true;
    };
    let node_read = acl.allow_node_read();
    let job_read = acl.allow_namespace_op(namespace, Capability::ReadJob)
        || acl.allow_namespace_op(namespace, Capability::ListJobs);
    match context {
        Context::Nodes => node_read,
        Context::All | Context::Fuzzy => node_read || job_read,
        _ => job_read,
    }
}

/// Drop the contexts the caller may not search individually.
pub fn admitted(
    acl: Option<&dyn AccessControl>,
    namespace: &str,
    contexts: Vec<Context>,
) -> Vec<Context> {
    if acl.is_none() {
        return contexts;
    }
    contexts.into_iter().filter(|c| sufficient_search_perms(acl, namespace, c)).collect()
}

/// Hide namespaces the caller cannot read.
pub fn filter_namespaces<'a>(iter: ResourceIter<'a>, acl: &'a dyn AccessControl) -> ResourceIter<'a> {
    Box::new(iter.filter(move |res| match res {
        Resource::Namespace(ns) => acl.allow_namespace(&ns.name),
        _ => true,
    }))
}
