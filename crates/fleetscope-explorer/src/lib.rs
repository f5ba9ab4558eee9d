//! Fleetscope Explorer - Replica and requirement extraction per workload kind
//!
//! This crate provides:
//! - The `ReplicaWorkload` contract implemented by each workload shape
//! - Explorers for Deployment, Job, StatefulSet and ReplicaSet
//! - An immutable kind-indexed explorer registry

pub mod error;
pub mod explorer;
pub mod registry;
pub mod workload;

// Re-export commonly used types
pub use error::{ExplorerError, Result};
pub use explorer::{explore, explorer_for, ReplicaEstimate, ReplicaExplorer};
pub use registry::{builtin_explorers, default_registry, ExplorerRegistry};
pub use workload::ReplicaWorkload;
