use crate::{FleetscopeError, Result, WorkloadReference};
use serde::de::DeserializeOwned;

/// Decode a generic workload object into its typed representation.
///
/// The object is deserialized by reference and left untouched. k8s-openapi
/// types additionally reject objects whose own `apiVersion` or `kind` differ
/// from the target type.
pub fn convert<T: DeserializeOwned>(workload: &WorkloadReference) -> Result<T> {
    T::deserialize(workload.object()).map_err(|e| {
        FleetscopeError::conversion_failed(
            workload.gvk().to_string(),
            e.to_string(),
            Some(Box::new(e)),
        )
    })
}
