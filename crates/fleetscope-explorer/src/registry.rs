use crate::explorer::{explorer_for, ReplicaEstimate, ReplicaExplorer};
use crate::{ExplorerError, Result};
use fleetscope_core::{Deployment, GroupVersionKind, Job, ReplicaSet, StatefulSet, WorkloadReference};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_REGISTRY: LazyLock<ExplorerRegistry> = LazyLock::new(ExplorerRegistry::builtin);

/// Process-wide registry of the built-in explorers, built on first use
pub fn default_registry() -> &'static ExplorerRegistry {
    &DEFAULT_REGISTRY
}

/// Explorers shipped with the crate, one per workload kind
pub fn builtin_explorers() -> Vec<(GroupVersionKind, ReplicaExplorer)> {
    vec![
        explorer_for::<Deployment>(),
        explorer_for::<Job>(),
        explorer_for::<StatefulSet>(),
        explorer_for::<ReplicaSet>(),
    ]
}

/// Immutable mapping from workload kind to its replica explorer.
///
/// All entries are supplied at construction; there is no way to add or
/// replace an explorer afterwards, so a registry can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct ExplorerRegistry {
    explorers: HashMap<GroupVersionKind, ReplicaExplorer>,
}

impl ExplorerRegistry {
    /// Build a registry from (kind, explorer) pairs.
    ///
    /// Fails if two explorers are given for the same kind.
    pub fn new(
        entries: impl IntoIterator<Item = (GroupVersionKind, ReplicaExplorer)>,
    ) -> Result<Self> {
        let mut explorers = HashMap::new();

        for (gvk, explorer) in entries {
            if explorers.contains_key(&gvk) {
                return Err(ExplorerError::duplicate_explorer(gvk.to_string()));
            }
            debug!("Registering replica explorer for {}", gvk);
            explorers.insert(gvk, explorer);
        }

        Ok(Self { explorers })
    }

    /// Built-in explorers plus `extra`; an extra entry may not shadow a built-in kind
    pub fn with_builtins(
        extra: impl IntoIterator<Item = (GroupVersionKind, ReplicaExplorer)>,
    ) -> Result<Self> {
        Self::new(builtin_explorers().into_iter().chain(extra))
    }

    fn builtin() -> Self {
        Self {
            explorers: builtin_explorers().into_iter().collect(),
        }
    }

    /// Explorer registered for `gvk`, or `None` if the kind is unsupported
    pub fn lookup(&self, gvk: &GroupVersionKind) -> Option<ReplicaExplorer> {
        self.explorers.get(gvk).copied()
    }

    /// Whether an explorer is registered for `gvk`
    pub fn contains(&self, gvk: &GroupVersionKind) -> bool {
        self.explorers.contains_key(gvk)
    }

    /// Registered kinds, in no particular order
    pub fn kinds(&self) -> impl Iterator<Item = &GroupVersionKind> {
        self.explorers.keys()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.explorers.len()
    }

    /// Whether no kind is registered
    pub fn is_empty(&self) -> bool {
        self.explorers.is_empty()
    }

    /// Look up the workload's explorer and run it
    pub fn explore(&self, workload: &WorkloadReference) -> Result<ReplicaEstimate> {
        let explorer = self
            .lookup(workload.gvk())
            .ok_or_else(|| ExplorerError::unsupported_kind(workload.gvk().to_string()))?;

        Ok(explorer(workload)?)
    }
}
