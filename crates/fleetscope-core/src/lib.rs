//! Fleetscope Core - Workload types shared by the replica explorers
//!
//! This crate provides:
//! - Kind identifiers and generic workload references
//! - Error types with miette diagnostics
//! - Typed conversion of generic workload objects
//! - Resource quantities and per-replica requirement generation

pub mod convert;
pub mod error;
pub mod resources;
pub mod types;

// Re-export commonly used types
pub use convert::convert;
pub use error::{FleetscopeError, Result};
pub use resources::{
    generate_replica_requirements, NodeClaim, ReplicaRequirements, ResourceQuantities,
};
pub use types::{GroupVersionKind, WorkloadReference};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
pub use k8s_openapi::api::batch::v1::Job;
pub use k8s_openapi::api::core::v1::PodTemplateSpec;

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        FleetscopeError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from JSON
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| {
        FleetscopeError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to YAML
pub fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        FleetscopeError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize every document of a YAML stream into generic objects.
///
/// Empty documents (e.g. a trailing `---`) are skipped. JSON input is accepted
/// as well since it is a subset of YAML.
pub fn from_yaml_documents(data: &str) -> Result<Vec<serde_json::Value>> {
    use serde::Deserialize;

    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(data) {
        let value = serde_json::Value::deserialize(document).map_err(|e| {
            FleetscopeError::serialization_error(
                format!("Failed to deserialize from YAML: {}", e),
                Some(Box::new(e)),
            )
        })?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}
