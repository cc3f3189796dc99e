//! # Authorization Basis
//!
//! The three ways a caller may hold administrative rights over a project's
//! delegate chain, and the order they are tried in.
//!
//! | Basis | Holds when |
//! |-------|------------|
//! | `Owner` | caller is the project's registered owner |
//! | `ProjectOperator` | owner granted caller the permission for this project |
//! | `PlatformOperator` | owner granted caller the permission for project 0 |
//!
//! Nothing is cached; every mutation resolves the basis afresh.

use shared_types::{Address, ProjectId};
use std::fmt;

/// Why a caller was allowed to mutate the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorizationBasis {
    /// Caller owns the project.
    Owner,
    /// Caller is an operator for this project.
    ProjectOperator,
    /// Caller is an operator for the platform root scope.
    PlatformOperator,
}

impl fmt::Display for AuthorizationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::ProjectOperator => write!(f, "project operator"),
            Self::PlatformOperator => write!(f, "platform operator"),
        }
    }
}

/// A single operator-store question the gate must ask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperatorQuery {
    /// Scope the permission must be granted under.
    pub scope: ProjectId,
    /// Basis the caller gets if the answer is yes.
    pub basis: AuthorizationBasis,
}

/// Operator-store queries for `project_id`, in evaluation order.
///
/// The project scope is asked before the platform root scope.
#[must_use]
pub fn operator_queries(project_id: ProjectId) -> [OperatorQuery; 2] {
    [
        OperatorQuery {
            scope: project_id,
            basis: AuthorizationBasis::ProjectOperator,
        },
        OperatorQuery {
            scope: ProjectId::PLATFORM_ROOT,
            basis: AuthorizationBasis::PlatformOperator,
        },
    ]
}

/// Ownership short-circuits the operator lookups.
#[must_use]
pub fn owner_basis(caller: Address, owner: Address) -> Option<AuthorizationBasis> {
    (caller == owner).then_some(AuthorizationBasis::Owner)
}
