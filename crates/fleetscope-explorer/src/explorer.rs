use crate::workload::ReplicaWorkload;
use fleetscope_core::{
    convert, generate_replica_requirements, FleetscopeError, GroupVersionKind,
    ReplicaRequirements, Result, WorkloadReference,
};
use serde::Serialize;
use tracing::{debug, error};

/// Desired replica count and per-replica requirements of a workload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplicaEstimate {
    /// Declared desired count; 0 when the field is unset
    pub replicas: u32,
    /// Footprint of one replica, `None` when the template yields nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<ReplicaRequirements>,
}

/// Strategy extracting a [`ReplicaEstimate`] from a generic workload object
pub type ReplicaExplorer = fn(&WorkloadReference) -> Result<ReplicaEstimate>;

/// Explore a workload through its typed shape `W`.
///
/// Conversion failures are logged once with the workload's kind and returned
/// as is. Errors from requirement aggregation are propagated unchanged.
pub fn explore<W: ReplicaWorkload>(workload: &WorkloadReference) -> Result<ReplicaEstimate> {
    let typed: W = match convert(workload) {
        Ok(typed) => typed,
        Err(e) => {
            error!("Failed to convert object({}): {}", workload.gvk(), e);
            return Err(e);
        }
    };

    let replicas = match typed.desired_replicas() {
        None => 0,
        Some(count) => u32::try_from(count).map_err(|_| {
            let e = FleetscopeError::invalid_replica_count(
                workload.gvk().to_string(),
                W::REPLICA_FIELD,
                i64::from(count),
            );
            error!("Failed to convert object({}): {}", workload.gvk(), e);
            e
        })?,
    };

    let requirements = match typed.pod_template() {
        Some(template) => generate_replica_requirements(template)?,
        None => None,
    };

    debug!(
        "Explored {}: {} replicas, requirements: {}",
        workload,
        replicas,
        requirements.is_some()
    );

    Ok(ReplicaEstimate {
        replicas,
        requirements,
    })
}

/// Registry entry exploring `W` under its own kind identifier
pub fn explorer_for<W: ReplicaWorkload>() -> (GroupVersionKind, ReplicaExplorer) {
    (W::gvk(), explore::<W> as ReplicaExplorer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetscope_core::k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use fleetscope_core::{Deployment, Job, PodTemplateSpec};
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    fn pod_template() -> Value {
        json!({
            "metadata": {"labels": {"app": "web"}},
            "spec": {
                "containers": [{
                    "name": "web",
                    "image": "nginx",
                    "resources": {"requests": {"cpu": "500m", "memory": "128Mi"}}
                }]
            }
        })
    }

    fn deployment(replicas: Option<Value>) -> WorkloadReference {
        let mut spec = json!({
            "selector": {"matchLabels": {"app": "web"}},
            "template": pod_template()
        });
        if let Some(replicas) = replicas {
            spec["replicas"] = replicas;
        }
        WorkloadReference::from_object(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web", "namespace": "default"},
            "spec": spec
        }))
        .unwrap()
    }

    fn job(parallelism: Option<i32>) -> WorkloadReference {
        let mut spec = json!({"template": pod_template()});
        if let Some(parallelism) = parallelism {
            spec["parallelism"] = json!(parallelism);
        }
        WorkloadReference::from_object(json!({
            "apiVersion": "batch/v1",
            "kind": "Job",
            "metadata": {"name": "batch", "namespace": "default"},
            "spec": spec
        }))
        .unwrap()
    }

    fn expected_requirements() -> Option<ReplicaRequirements> {
        let template: PodTemplateSpec = serde_json::from_value(pod_template()).unwrap();
        let requirements = generate_replica_requirements(&template).unwrap();
        assert_eq!(
            requirements.as_ref().unwrap().resource_request,
            BTreeMap::from([
                ("cpu".to_string(), Quantity("500m".to_string())),
                ("memory".to_string(), Quantity("128Mi".to_string())),
            ])
        );
        requirements
    }

    #[test]
    fn test_deployment_replicas() {
        let estimate = explore::<Deployment>(&deployment(Some(json!(3)))).unwrap();
        assert_eq!(estimate.replicas, 3);
        assert_eq!(estimate.requirements, expected_requirements());
    }

    #[test]
    fn test_deployment_replicas_unset() {
        let estimate = explore::<Deployment>(&deployment(None)).unwrap();
        assert_eq!(estimate.replicas, 0);
        assert_eq!(estimate.requirements, expected_requirements());
    }

    #[test]
    fn test_job_parallelism() {
        let estimate = explore::<Job>(&job(Some(5))).unwrap();
        assert_eq!(estimate.replicas, 5);
        assert_eq!(estimate.requirements, expected_requirements());
    }

    #[test]
    fn test_job_parallelism_unset() {
        let estimate = explore::<Job>(&job(None)).unwrap();
        assert_eq!(estimate.replicas, 0);
        assert_eq!(estimate.requirements, expected_requirements());
    }

    #[test]
    fn test_job_ignores_completions() {
        let mut object = job(None).object().clone();
        object["spec"]["completions"] = json!(20);
        let workload = WorkloadReference::from_object(object).unwrap();

        assert_eq!(explore::<Job>(&workload).unwrap().replicas, 0);
    }

    #[test]
    fn test_missing_spec() {
        let workload = WorkloadReference::from_object(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "bare"}
        }))
        .unwrap();

        assert_eq!(
            explore::<Deployment>(&workload).unwrap(),
            ReplicaEstimate::default()
        );
    }

    #[test]
    fn test_conversion_error_logged_once() {
        let workload = deployment(Some(json!("three")));

        let (result, logs) = with_captured_logs(|| explore::<Deployment>(&workload));

        let err = result.unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(logs.matches("Failed to convert object").count(), 1);
        assert!(logs.contains("apps/v1/Deployment"));
    }

    #[test]
    fn test_success_emits_no_error() {
        let (result, logs) = with_captured_logs(|| explore::<Job>(&job(Some(2))));

        assert!(result.is_ok());
        assert!(!logs.contains("ERROR"));
    }

    #[test]
    fn test_negative_replicas() {
        let (result, logs) =
            with_captured_logs(|| explore::<Deployment>(&deployment(Some(json!(-1)))));

        let err = result.unwrap_err();
        assert!(matches!(err, FleetscopeError::InvalidReplicaCount { value: -1, .. }));
        assert_eq!(logs.matches("Failed to convert object").count(), 1);
    }

    #[test]
    fn test_aggregation_error_propagated() {
        let mut object = job(Some(1)).object().clone();
        object["spec"]["template"]["spec"]["containers"][0]["resources"]["requests"]["cpu"] =
            json!("plenty");
        let workload = WorkloadReference::from_object(object).unwrap();

        let err = explore::<Job>(&workload).unwrap_err();
        assert!(err.is_aggregation());
    }

    #[test]
    fn test_idempotent() {
        let workload = deployment(Some(json!(4)));
        let before = workload.clone();

        let first = explore::<Deployment>(&workload).unwrap();
        let second = explore::<Deployment>(&workload).unwrap();

        assert_eq!(first, second);
        assert_eq!(workload, before);
    }

    #[derive(Deserialize)]
    struct Workflow {
        spec: WorkflowSpec,
    }

    #[derive(Deserialize)]
    struct WorkflowSpec {
        workers: Option<i32>,
        template: PodTemplateSpec,
    }

    impl ReplicaWorkload for Workflow {
        const REPLICA_FIELD: &'static str = "spec.workers";

        fn gvk() -> GroupVersionKind {
            GroupVersionKind::new("example.io", "v1alpha1", "Workflow")
        }

        fn desired_replicas(&self) -> Option<i32> {
            self.spec.workers
        }

        fn pod_template(&self) -> Option<&PodTemplateSpec> {
            Some(&self.spec.template)
        }
    }

    #[test]
    fn test_custom_workload() {
        let (gvk, explorer) = explorer_for::<Workflow>();
        let workload = WorkloadReference::from_object(json!({
            "apiVersion": "example.io/v1alpha1",
            "kind": "Workflow",
            "metadata": {"name": "pipeline"},
            "spec": {
                "workers": 7,
                "steps": [{"name": "a"}, {"name": "b"}],
                "template": pod_template()
            }
        }))
        .unwrap();

        assert_eq!(workload.gvk(), &gvk);
        let estimate = explorer(&workload).unwrap();
        assert_eq!(estimate.replicas, 7);
        assert_eq!(estimate.requirements, expected_requirements());
    }
}
