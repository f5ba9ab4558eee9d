// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Explorer error type
#[derive(Error, Debug, Diagnostic)]
pub enum ExplorerError {
    /// No explorer registered for the kind
    #[error("No replica explorer registered for {gvk}")]
    #[diagnostic(
        code(explorer::unsupported_kind),
        help("Only registered workload kinds can be explored; skip this workload or register an explorer for it")
    )]
    UnsupportedKind {
        gvk: String,
    },

    /// Two explorers registered for the same kind
    #[error("Duplicate replica explorer for {gvk}")]
    #[diagnostic(
        code(explorer::duplicate_explorer),
        help("Register exactly one explorer per group, version and kind")
    )]
    DuplicateExplorer {
        gvk: String,
    },

    /// Core error
    #[error("Core error: {0}")]
    #[diagnostic(
        code(explorer::core_error),
        help("The workload object could not be converted or its pod template aggregated")
    )]
    CoreError(#[from] fleetscope_core::FleetscopeError),
}

/// Result type for explorer operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

impl ExplorerError {
    /// Create an UnsupportedKind error
    pub fn unsupported_kind(gvk: impl Into<String>) -> Self {
        Self::UnsupportedKind { gvk: gvk.into() }
    }

    /// Create a DuplicateExplorer error
    pub fn duplicate_explorer(gvk: impl Into<String>) -> Self {
        Self::DuplicateExplorer { gvk: gvk.into() }
    }
}
