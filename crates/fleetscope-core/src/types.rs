use crate::{FleetscopeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// GroupVersionKind uniquely identifies a Kubernetes resource type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersionKind {
    /// API group (e.g., "", "apps", "batch")
    pub group: String,
    /// API version (e.g., "v1", "v1beta1")
    pub version: String,
    /// Resource kind (e.g., "Deployment", "Job")
    pub kind: String,
}

impl GroupVersionKind {
    /// Create a new GVK
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// GVK of a k8s-openapi resource type
    pub fn of<K: k8s_openapi::Resource>() -> Self {
        Self::new(K::GROUP, K::VERSION, K::KIND)
    }

    /// Create a GVK from apiVersion and kind
    /// apiVersion format: "v1" or "group/version"
    pub fn from_api_version_kind(api_version: &str, kind: &str) -> Self {
        let (group, version) = match api_version.split_once('/') {
            Some((g, v)) => (g.to_string(), v.to_string()),
            None => (String::new(), api_version.to_string()),
        };

        Self {
            group,
            version,
            kind: kind.to_string(),
        }
    }

    /// Get the apiVersion string (group/version or just version)
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version(), self.kind)
    }
}

/// A generic workload object tagged with its kind identifier.
///
/// The object is only ever read; explorers borrow it for the duration of a
/// single extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadReference {
    gvk: GroupVersionKind,
    object: Value,
}

impl WorkloadReference {
    /// Tag a generic object with an explicit kind identifier
    pub fn new(gvk: GroupVersionKind, object: Value) -> Self {
        Self { gvk, object }
    }

    /// Build a reference from the object's own `apiVersion` and `kind` fields
    pub fn from_object(object: Value) -> Result<Self> {
        let api_version = object
            .get("apiVersion")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FleetscopeError::invalid_workload("missing field 'apiVersion'"))?;
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FleetscopeError::invalid_workload("missing field 'kind'"))?;

        let gvk = GroupVersionKind::from_api_version_kind(api_version, kind);
        Ok(Self { gvk, object })
    }

    /// Kind identifier of the object
    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    /// The generic object
    pub fn object(&self) -> &Value {
        &self.object
    }

    /// `metadata.name`, if present
    pub fn name(&self) -> Option<&str> {
        self.object.pointer("/metadata/name").and_then(Value::as_str)
    }

    /// `metadata.namespace`, if present
    pub fn namespace(&self) -> Option<&str> {
        self.object
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
    }
}

impl fmt::Display for WorkloadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name().unwrap_or("unknown");
        match self.namespace() {
            Some(ns) if !ns.is_empty() => write!(f, "{}/{}/{}", self.gvk, ns, name),
            _ => write!(f, "{}/{}", self.gvk, name),
        }
    }
}
