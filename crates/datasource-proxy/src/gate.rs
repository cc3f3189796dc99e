//! # Permission Gate
//!
//! Decides whether a caller may deploy the proxy or mutate its delegate
//! chain. A caller passes if any of these holds, evaluated in order and
//! never cached:
//!
//! 1. caller is the project's owner;
//! 2. the owner granted caller the required permission for this project;
//! 3. the owner granted caller the required permission for project 0.
//!
//! Consultations are never gated.

use crate::domain::authorization::{operator_queries, owner_basis, AuthorizationBasis};
use crate::errors::ProxyError;
use crate::ports::outbound::{OperatorStore, ProjectsRegistry};
use shared_types::{Address, OperationId, ProjectId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Capability check over the projects registry and operator store.
#[derive(Clone)]
pub struct PermissionGate {
    projects: Arc<dyn ProjectsRegistry>,
    operators: Arc<dyn OperatorStore>,
    project_id: ProjectId,
    permission: OperationId,
}

impl PermissionGate {
    /// Gate for `project_id`, requiring `permission` from operators.
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectsRegistry>,
        operators: Arc<dyn OperatorStore>,
        project_id: ProjectId,
        permission: OperationId,
    ) -> Self {
        Self {
            projects,
            operators,
            project_id,
            permission,
        }
    }

    /// Basis on which `caller` is authorized, or `None`.
    ///
    /// # Errors
    ///
    /// `Collaborator` if the projects registry or operator store fails.
    pub async fn authorization_basis(
        &self,
        caller: Address,
    ) -> Result<Option<AuthorizationBasis>, ProxyError> {
        let owner = self.projects.owner_of(self.project_id).await?;
        if let Some(basis) = owner_basis(caller, owner) {
            return Ok(Some(basis));
        }

        for query in operator_queries(self.project_id) {
            let granted = self
                .operators
                .has_permission(caller, owner, query.scope, self.permission)
                .await?;
            if granted {
                return Ok(Some(query.basis));
            }
        }

        Ok(None)
    }

    /// Whether `caller` may mutate the registry.
    ///
    /// # Errors
    ///
    /// `Collaborator` if a registry lookup fails.
    pub async fn authorize(&self, caller: Address) -> Result<bool, ProxyError> {
        Ok(self.authorization_basis(caller).await?.is_some())
    }

    /// Require `caller` to pass the gate.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if it does not, `Collaborator` if a lookup fails.
    pub async fn require(&self, caller: Address) -> Result<AuthorizationBasis, ProxyError> {
        match self.authorization_basis(caller).await? {
            Some(basis) => {
                debug!(%caller, %basis, project_id = %self.project_id, "Caller authorized");
                Ok(basis)
            }
            None => {
                warn!(
                    %caller,
                    project_id = %self.project_id,
                    permission = %self.permission,
                    "Caller failed permission gate"
                );
                Err(ProxyError::PermissionDenied {
                    caller,
                    project_id: self.project_id,
                    permission: self.permission,
                })
            }
        }
    }
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("project_id", &self.project_id)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryOperatorStore, InMemoryProjects};
    use shared_types::LookupError;

    const PROJECT: ProjectId = ProjectId(2);
    const OWNER: Address = Address::from_low_u8(0xA0);
    const OPERATOR: Address = Address::from_low_u8(0xB0);
    const STRANGER: Address = Address::from_low_u8(0xC0);

    fn setup() -> (Arc<InMemoryProjects>, Arc<InMemoryOperatorStore>, PermissionGate) {
        let projects = Arc::new(InMemoryProjects::new());
        projects.set_owner(PROJECT, OWNER);
        let operators = Arc::new(InMemoryOperatorStore::new());
        let gate = PermissionGate::new(
            projects.clone(),
            operators.clone(),
            PROJECT,
            OperationId::MANAGE_PAYMENTS,
        );
        (projects, operators, gate)
    }

    #[tokio::test]
    async fn test_owner_passes() {
        let (_, _, gate) = setup();
        assert_eq!(gate.require(OWNER).await, Ok(AuthorizationBasis::Owner));
    }

    #[tokio::test]
    async fn test_project_operator_passes() {
        let (_, operators, gate) = setup();
        operators.grant(OPERATOR, OWNER, PROJECT, OperationId::MANAGE_PAYMENTS);
        assert_eq!(
            gate.authorization_basis(OPERATOR).await,
            Ok(Some(AuthorizationBasis::ProjectOperator))
        );
    }

    #[tokio::test]
    async fn test_platform_root_operator_passes() {
        let (_, operators, gate) = setup();
        operators.grant(
            OPERATOR,
            OWNER,
            ProjectId::PLATFORM_ROOT,
            OperationId::MANAGE_PAYMENTS,
        );
        assert_eq!(
            gate.require(OPERATOR).await,
            Ok(AuthorizationBasis::PlatformOperator)
        );
    }

    #[tokio::test]
    async fn test_wrong_permission_bit_fails() {
        let (_, operators, gate) = setup();
        operators.grant(OPERATOR, OWNER, PROJECT, OperationId::PROCESS_FEES);
        operators.grant(
            OPERATOR,
            OWNER,
            ProjectId::PLATFORM_ROOT,
            OperationId::PROCESS_FEES,
        );
        assert_eq!(gate.authorize(OPERATOR).await, Ok(false));
    }

    #[tokio::test]
    async fn test_grant_from_non_owner_fails() {
        let (_, operators, gate) = setup();
        operators.grant(OPERATOR, STRANGER, PROJECT, OperationId::MANAGE_PAYMENTS);
        let err = gate.require(OPERATOR).await.unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn test_ownership_is_not_cached() {
        let (projects, _, gate) = setup();
        assert_eq!(gate.authorize(STRANGER).await, Ok(false));
        projects.set_owner(PROJECT, STRANGER);
        assert_eq!(gate.authorize(STRANGER).await, Ok(true));
        assert_eq!(gate.authorize(OWNER).await, Ok(false));
    }

    #[tokio::test]
    async fn test_unknown_project_is_collaborator_error() {
        let projects = Arc::new(InMemoryProjects::new());
        let gate = PermissionGate::new(
            projects,
            Arc::new(InMemoryOperatorStore::new()),
            PROJECT,
            OperationId::MANAGE_PAYMENTS,
        );
        assert_eq!(
            gate.require(OWNER).await,
            Err(ProxyError::Collaborator(LookupError::UnknownProject(PROJECT)))
        );
    }

    struct OfflineOperators;

    #[async_trait::async_trait]
    impl OperatorStore for OfflineOperators {
        async fn has_permission(
            &self,
            _operator: Address,
            _account: Address,
            _domain: ProjectId,
            _permission: OperationId,
        ) -> Result<bool, LookupError> {
            Err(LookupError::Unavailable("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_operator_lookup_failure_is_not_a_denial() {
        let (projects, _, _) = setup();
        let gate = PermissionGate::new(
            projects,
            Arc::new(OfflineOperators),
            PROJECT,
            OperationId::MANAGE_PAYMENTS,
        );

        assert_eq!(gate.require(OWNER).await, Ok(AuthorizationBasis::Owner));
        assert_eq!(
            gate.require(STRANGER).await,
            Err(ProxyError::Collaborator(LookupError::Unavailable(
                "timeout".to_string()
            )))
        );
    }
}
