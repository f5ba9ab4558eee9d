pub mod quantities;
pub mod requirements;

pub use quantities::ResourceQuantities;
pub use requirements::{generate_replica_requirements, NodeClaim, ReplicaRequirements};
