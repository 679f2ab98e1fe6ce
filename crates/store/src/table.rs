use scout_core::Resource;

/// Collections held by the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Jobs,
    Evals,
    Allocs,
    Nodes,
    Deployments,
    CsiPlugins,
    CsiVolumes,
    ScalingPolicies,
    Namespaces,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Jobs,
        Table::Evals,
        Table::Allocs,
        Table::Nodes,
        Table::Deployments,
        Table::CsiPlugins,
        Table::CsiVolumes,
        Table::ScalingPolicies,
        Table::Namespaces,
    ];

    /// Name used for the table's index entry.
    pub fn name(self) -> &'static str {
        match self {
            Table::Jobs => "jobs",
            Table::Evals => "evals",
            Table::Allocs => "allocs",
            Table::Nodes => "nodes",
            Table::Deployments => "deployment",
            Table::CsiPlugins => "csi_plugins",
            Table::CsiVolumes => "csi_volumes",
            Table::ScalingPolicies => "scaling_policy",
            Table::Namespaces => "namespaces",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Rows keyed by a UUID; prefixes must be whole hex bytes.
    pub fn uuid_keyed(self) -> bool {
        matches!(
            self,
            Table::Evals | Table::Allocs | Table::Nodes | Table::Deployments | Table::ScalingPolicies
        )
    }

    pub fn namespaced(self) -> bool {
        matches!(
            self,
            Table::Jobs
                | Table::Evals
                | Table::Allocs
                | Table::Deployments
                | Table::CsiVolumes
                | Table::ScalingPolicies
        )
    }

    /// Table a record is stored in; extension records have none.
    pub fn of(resource: &Resource) -> Option<Table> {
        Some(match resource {
            Resource::Job(_) => Table::Jobs,
            Resource::Evaluation(_) => Table::Evals,
            Resource::Allocation(_) => Table::Allocs,
            Resource::Node(_) => Table::Nodes,
            Resource::Deployment(_) => Table::Deployments,
            Resource::CsiPlugin(_) => Table::CsiPlugins,
            Resource::CsiVolume(_) => Table::CsiVolumes,
            Resource::ScalingPolicy(_) => Table::ScalingPolicies,
            Resource::Namespace(_) => Table::Namespaces,
            Resource::Extension(_) => return None,
        })
    }
}
