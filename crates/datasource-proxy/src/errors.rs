//! # Error Types
//!
//! All error types raised by the proxy. Every one of them is fatal to the
//! operation that produced it: registry state is left as it was before the
//! call and no partial consultation result is returned.

use shared_types::{Address, LookupError, OperationId, ProjectId};
use thiserror::Error;

// =============================================================================
// PROXY ERRORS
// =============================================================================

/// Errors surfaced by the proxy facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Caller is neither the project owner nor an operator holding the
    /// required permission for the project or the platform root.
    #[error("permission denied: {caller} lacks {permission} on project {project_id}")]
    PermissionDenied {
        caller: Address,
        project_id: ProjectId,
        permission: OperationId,
    },

    /// Read past the end of the delegate list.
    #[error("delegate index out of range: {index} >= {length}")]
    DelegateIndexOutOfRange { index: usize, length: usize },

    /// Removal of an identity that is not registered.
    #[error("invalid delegate: {0} is not registered")]
    InvalidDelegate(Address),

    /// A fanned-out delegate call failed; the whole consultation fails with it.
    #[error("delegate call failed: {delegate} at position {position}: {source}")]
    DelegateCallFailure {
        delegate: Address,
        position: usize,
        #[source]
        source: DelegateError,
    },

    /// A platform registry (directory, projects, operator store) failed.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] LookupError),

    /// The proxy configuration was rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl ProxyError {
    /// Returns true if the error came from the authorization check.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Returns the failing delegate, if the error came from the fan-out.
    #[must_use]
    pub fn failing_delegate(&self) -> Option<Address> {
        match self {
            Self::DelegateCallFailure { delegate, .. } => Some(*delegate),
            _ => None,
        }
    }
}

// =============================================================================
// DELEGATE ERRORS
// =============================================================================

/// Failure of a single delegate consultation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelegateError {
    /// The delegate aborted the call.
    #[error("reverted: {0}")]
    Reverted(String),

    /// No callable data source is known for the registered identity.
    #[error("no data source at address")]
    Unresolvable,

    /// The delegate did not answer within the configured bound.
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// A nested proxy was consulted deeper than its configured bound, as
    /// happens when a chain contains itself.
    #[error("proxy nesting deeper than {max_depth}")]
    NestingTooDeep { max_depth: usize },
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Invalid proxy configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Permission index 0 is not a grantable operation.
    #[error("required permission must be non-zero")]
    InvalidPermission,

    /// A zero timeout would fail every delegate call.
    #[error("delegate call timeout must be greater than zero")]
    ZeroTimeout,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_error_display() {
        let err = ProxyError::DelegateIndexOutOfRange { index: 3, length: 3 };
        assert_eq!(err.to_string(), "delegate index out of range: 3 >= 3");

        let err = ProxyError::InvalidDelegate(Address::from_low_u8(9));
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_delegate_failure_display_includes_source() {
        let err = ProxyError::DelegateCallFailure {
            delegate: Address::from_low_u8(1),
            position: 2,
            source: DelegateError::Reverted("SOLD_OUT".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("position 2"));
        assert!(msg.contains("SOLD_OUT"));
        assert_eq!(err.failing_delegate(), Some(Address::from_low_u8(1)));
    }

    #[test]
    fn test_nesting_error_display() {
        let err = DelegateError::NestingTooDeep { max_depth: 4 };
        assert_eq!(err.to_string(), "proxy nesting deeper than 4");
    }

    #[test]
    fn test_lookup_error_conversion() {
        let err: ProxyError = LookupError::Unavailable("rpc down".to_string()).into();
        assert!(matches!(err, ProxyError::Collaborator(_)));
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ProxyError = ConfigError::ZeroTimeout.into();
        assert!(matches!(err, ProxyError::Config(ConfigError::ZeroTimeout)));
    }
}
