//! # Error Types
//!
//! Errors raised by the platform registries other crates consult.

use crate::entities::ProjectId;
use thiserror::Error;

/// Failure of a platform registry lookup (directory, projects, operator store).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The project is not known to the registry.
    #[error("Unknown project: {0}")]
    UnknownProject(ProjectId),

    /// The registry could not be reached or answered with an error.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}
