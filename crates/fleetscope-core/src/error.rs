// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for Fleetscope operations
#[derive(Error, Debug, Diagnostic)]
pub enum FleetscopeError {
    /// Generic object cannot be identified as a workload
    #[error("Invalid workload object: {reason}")]
    #[diagnostic(
        code(fleetscope::invalid_workload),
        help("Every workload object needs string 'apiVersion' and 'kind' fields")
    )]
    InvalidWorkload {
        #[allow(unused)]
        reason: String,
    },

    /// Generic object does not match the typed schema of its kind
    #[error("Object does not match the schema of {gvk}: {message}")]
    #[diagnostic(
        code(fleetscope::conversion_failed),
        help("Check that the object matches the schema of its declared apiVersion and kind")
    )]
    ConversionFailed {
        #[allow(unused)]
        gvk: String,
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Declared replica count cannot be represented
    #[error("Invalid replica count {value} in {field} of {gvk}")]
    #[diagnostic(
        code(fleetscope::invalid_replica_count),
        help("Replica counts must be zero or positive")
    )]
    InvalidReplicaCount {
        #[allow(unused)]
        gvk: String,
        #[allow(unused)]
        field: String,
        #[allow(unused)]
        value: i64,
    },

    /// Pod template cannot be aggregated into requirements
    #[error("Failed to aggregate {resource} quantity '{quantity}': {reason}")]
    #[diagnostic(
        code(fleetscope::aggregation_failed),
        help("Use Kubernetes quantity notation, e.g. '500m', '2', '128Mi' or '1G'")
    )]
    AggregationFailed {
        #[allow(unused)]
        resource: String,
        #[allow(unused)]
        quantity: String,
        #[allow(unused)]
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(fleetscope::serialization_error),
        help("Ensure the manifest is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for Fleetscope operations
pub type Result<T> = std::result::Result<T, FleetscopeError>;

impl FleetscopeError {
    /// Create an InvalidWorkload error
    pub fn invalid_workload(reason: impl Into<String>) -> Self {
        Self::InvalidWorkload {
            reason: reason.into(),
        }
    }

    /// Create a ConversionFailed error
    pub fn conversion_failed(
        gvk: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConversionFailed {
            gvk: gvk.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an InvalidReplicaCount error
    pub fn invalid_replica_count(
        gvk: impl Into<String>,
        field: impl Into<String>,
        value: i64,
    ) -> Self {
        Self::InvalidReplicaCount {
            gvk: gvk.into(),
            field: field.into(),
            value,
        }
    }

    /// Create an AggregationFailed error
    pub fn aggregation_failed(
        resource: impl Into<String>,
        quantity: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AggregationFailed {
            resource: resource.into(),
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }

    /// Whether the object failed to match its kind's schema
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            Self::ConversionFailed { .. } | Self::InvalidReplicaCount { .. }
        )
    }

    /// Whether the pod template could not be aggregated
    pub fn is_aggregation(&self) -> bool {
        matches!(self, Self::AggregationFailed { .. })
    }
}
