use fleetscope_core::{Deployment, GroupVersionKind, Job, PodTemplateSpec, ReplicaSet, StatefulSet};
use serde::de::DeserializeOwned;

/// Typed workload shape an explorer can extract replicas and requirements from.
///
/// Each kind names its own authoritative desired-count field. Counts are never
/// derived from list lengths or other proxies.
pub trait ReplicaWorkload: DeserializeOwned {
    /// Path of the desired-count field, used in diagnostics
    const REPLICA_FIELD: &'static str;

    /// Kind identifier this shape decodes
    fn gvk() -> GroupVersionKind;

    /// Declared desired count, `None` when unset
    fn desired_replicas(&self) -> Option<i32>;

    /// Template every replica runs
    fn pod_template(&self) -> Option<&PodTemplateSpec>;
}

impl ReplicaWorkload for Deployment {
    const REPLICA_FIELD: &'static str = "spec.replicas";

    fn gvk() -> GroupVersionKind {
        GroupVersionKind::of::<Self>()
    }

    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.replicas)
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }
}

impl ReplicaWorkload for Job {
    const REPLICA_FIELD: &'static str = "spec.parallelism";

    fn gvk() -> GroupVersionKind {
        GroupVersionKind::of::<Self>()
    }

    // The API server normally defaults parallelism to 1, but objects may reach
    // us before defaulting.
    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.parallelism)
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }
}

impl ReplicaWorkload for StatefulSet {
    const REPLICA_FIELD: &'static str = "spec.replicas";

    fn gvk() -> GroupVersionKind {
        GroupVersionKind::of::<Self>()
    }

    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.replicas)
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }
}

impl ReplicaWorkload for ReplicaSet {
    const REPLICA_FIELD: &'static str = "spec.replicas";

    fn gvk() -> GroupVersionKind {
        GroupVersionKind::of::<Self>()
    }

    fn desired_replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.replicas)
    }

    fn pod_template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().and_then(|s| s.template.as_ref())
    }
}
