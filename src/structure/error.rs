// Tue Jan 13 2026 - Alex

use serde::Serialize;
use thiserror::Error;

/// Failures at the boundary of the engine: bad input documents, bad ABI tables.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid alignment: {0}")]
    InvalidAlignment(u64),
    #[error("Invalid size: {size} is not a multiple of alignment {align}")]
    InvalidSize { size: u64, align: u64 },
    #[error("Unknown ABI: {0}")]
    UnknownAbi(String),
    #[error("Struct declaration without a name")]
    MissingName,
    #[error("Member {index} of {parent} has no type")]
    MissingType { parent: String, index: usize },
    #[error("Duplicate member {member} in {parent}")]
    DuplicateMember { parent: String, member: String },
    #[error("Duplicate struct declaration: {0}")]
    DuplicateStruct(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Conditions the engine recovers from. Recorded, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutIssue {
    #[error("{path}: unresolvable type `{type_name}`, using default layout")]
    UnresolvableType { path: String, type_name: String },
    #[error("{path}: cyclic type `{type_name}`, using pointer layout")]
    CyclicType { path: String, type_name: String },
    #[error("{path}: composite without members")]
    DegenerateComposite { path: String },
}

impl LayoutIssue {
    pub fn path(&self) -> &str {
        match self {
            Self::UnresolvableType { path, .. }
            | Self::CyclicType { path, .. }
            | Self::DegenerateComposite { path } => path,
        }
    }
}
