use crate::resources::ResourceQuantities;
use crate::Result;
use k8s_openapi::api::core::v1::{
    Container, NodeSelector, PodSpec, PodTemplateSpec, Toleration,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compute footprint and placement constraints of a single replica
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaRequirements {
    /// Node constraints the replica must satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_claim: Option<NodeClaim>,
    /// Resources requested by one replica
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resource_request: BTreeMap<String, Quantity>,
}

/// Node selection constraints taken from the pod template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClaim {
    /// Required node affinity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_node_affinity: Option<NodeSelector>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
}

/// Derive the per-replica requirements of a pod template.
///
/// The resource request is the sum of all containers, raised to any single
/// init container that asks for more, plus the pod overhead. Returns `None`
/// when the template yields neither a request nor a node claim.
pub fn generate_replica_requirements(
    template: &PodTemplateSpec,
) -> Result<Option<ReplicaRequirements>> {
    let spec = match &template.spec {
        Some(spec) => spec,
        None => return Ok(None),
    };

    let node_claim = node_claim_for(spec);
    let resource_request = pod_request(spec)?.to_k8s_resource_map();

    if node_claim.is_none() && resource_request.is_empty() {
        return Ok(None);
    }

    Ok(Some(ReplicaRequirements {
        node_claim,
        resource_request,
    }))
}

fn pod_request(spec: &PodSpec) -> Result<ResourceQuantities> {
    let mut total = ResourceQuantities::default();

    for container in &spec.containers {
        total.add(&container_request(container)?)?;
    }

    // Init containers run one at a time before the app containers
    for container in spec.init_containers.iter().flatten() {
        total.set_max(&container_request(container)?);
    }

    if let Some(overhead) = &spec.overhead {
        total.add(&ResourceQuantities::from_k8s_resource_map(overhead)?)?;
    }

    Ok(total)
}

/// Requests of a container; a resource with only a limit requests that limit
fn container_request(container: &Container) -> Result<ResourceQuantities> {
    let resources = match &container.resources {
        Some(resources) => resources,
        None => return Ok(ResourceQuantities::default()),
    };

    let mut effective = resources.limits.clone().unwrap_or_default();
    if let Some(requests) = &resources.requests {
        effective.extend(requests.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    ResourceQuantities::from_k8s_resource_map(&effective)
}

fn node_claim_for(spec: &PodSpec) -> Option<NodeClaim> {
    let hard_node_affinity = spec
        .affinity
        .as_ref()
        .and_then(|a| a.node_affinity.as_ref())
        .and_then(|na| na.required_during_scheduling_ignored_during_execution.clone());
    let node_selector = spec.node_selector.clone().unwrap_or_default();
    let tolerations = spec.tolerations.clone().unwrap_or_default();

    if hard_node_affinity.is_none() && node_selector.is_empty() && tolerations.is_empty() {
        return None;
    }

    Some(NodeClaim {
        hard_node_affinity,
        node_selector,
        tolerations,
    })
}
