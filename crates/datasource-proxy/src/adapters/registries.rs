//! # Registry Adapters
//!
//! In-memory directory, projects and operator-store implementations.
//! Production deployments would back these with the platform's on-chain
//! registries.

use crate::ports::outbound::{Directory, OperatorStore, ProjectsRegistry};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, LookupError, OperationId, ProjectId};
use std::collections::{HashMap, HashSet};

/// In-memory project directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    controllers: RwLock<HashMap<ProjectId, Address>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the controller of a project.
    pub fn set_controller(&self, project_id: ProjectId, controller: Address) {
        self.controllers.write().insert(project_id, controller);
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn controller_of(&self, project_id: ProjectId) -> Result<Address, LookupError> {
        self.controllers
            .read()
            .get(&project_id)
            .copied()
            .ok_or(LookupError::UnknownProject(project_id))
    }
}

/// In-memory project ownership registry.
#[derive(Debug, Default)]
pub struct InMemoryProjects {
    owners: RwLock<HashMap<ProjectId, Address>>,
}

impl InMemoryProjects {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or transfer) ownership of a project.
    pub fn set_owner(&self, project_id: ProjectId, owner: Address) {
        self.owners.write().insert(project_id, owner);
    }
}

#[async_trait]
impl ProjectsRegistry for InMemoryProjects {
    async fn owner_of(&self, project_id: ProjectId) -> Result<Address, LookupError> {
        self.owners
            .read()
            .get(&project_id)
            .copied()
            .ok_or(LookupError::UnknownProject(project_id))
    }
}

type Grant = (Address, Address, ProjectId, OperationId);

/// In-memory operator permissions.
///
/// A grant is the tuple `(operator, account, domain, permission)`.
#[derive(Debug, Default)]
pub struct InMemoryOperatorStore {
    grants: RwLock<HashSet<Grant>>,
}

impl InMemoryOperatorStore {
    /// Create a store with no grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `account` lets `operator` use `permission` within `domain`.
    pub fn grant(
        &self,
        operator: Address,
        account: Address,
        domain: ProjectId,
        permission: OperationId,
    ) {
        self.grants
            .write()
            .insert((operator, account, domain, permission));
    }

    /// Withdraw a grant. Returns whether it existed.
    pub fn revoke(
        &self,
        operator: Address,
        account: Address,
        domain: ProjectId,
        permission: OperationId,
    ) -> bool {
        self.grants
            .write()
            .remove(&(operator, account, domain, permission))
    }
}

#[async_trait]
impl OperatorStore for InMemoryOperatorStore {
    async fn has_permission(
        &self,
        operator: Address,
        account: Address,
        domain: ProjectId,
        permission: OperationId,
    ) -> Result<bool, LookupError> {
        Ok(self
            .grants
            .read()
            .contains(&(operator, account, domain, permission)))
    }
}
