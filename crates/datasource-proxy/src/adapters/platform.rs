//! # In-Memory Platform
//!
//! Every collaborator a proxy needs, wired together in memory. Used by the
//! test suites and for local experimentation.

use super::delegates::InMemoryDelegateBook;
use super::event_log::InMemoryEventLog;
use super::registries::{InMemoryDirectory, InMemoryOperatorStore, InMemoryProjects};
use crate::binding::ProjectBinding;
use crate::config::ProxyConfig;
use crate::errors::ProxyError;
use crate::ports::outbound::FundingCycleDataSource;
use crate::service::DatasourceProxy;
use shared_types::{Address, OperationId, ProjectId};
use std::sync::Arc;

/// In-memory registries, delegate book and event log.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPlatform {
    /// Project directory.
    pub directory: Arc<InMemoryDirectory>,
    /// Project ownership.
    pub projects: Arc<InMemoryProjects>,
    /// Operator permissions.
    pub operators: Arc<InMemoryOperatorStore>,
    /// Deployed data sources.
    pub delegates: Arc<InMemoryDelegateBook>,
    /// Published proxy events.
    pub events: Arc<InMemoryEventLog>,
}

impl InMemoryPlatform {
    /// Create an empty platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `project_id` with the given owner and controller.
    pub fn create_project(&self, project_id: ProjectId, owner: Address, controller: Address) {
        self.projects.set_owner(project_id, owner);
        self.directory.set_controller(project_id, controller);
    }

    /// Owner of `project_id` grants `operator` the `permission` in `domain`.
    pub fn grant(
        &self,
        operator: Address,
        owner: Address,
        domain: ProjectId,
        permission: OperationId,
    ) {
        self.operators.grant(operator, owner, domain, permission);
    }

    /// Make `source` callable at `address`.
    pub fn deploy_delegate(&self, address: Address, source: Arc<dyn FundingCycleDataSource>) {
        self.delegates.deploy(address, source);
    }

    /// Binding of `project_id` to this platform's registries.
    #[must_use]
    pub fn binding(&self, project_id: ProjectId) -> ProjectBinding {
        ProjectBinding::new(
            self.directory.clone(),
            self.projects.clone(),
            self.operators.clone(),
            project_id,
        )
    }

    /// Deploy a proxy for `project_id` as `deployer`.
    ///
    /// # Errors
    ///
    /// Whatever `DatasourceProxy::deploy` returns.
    pub async fn deploy_proxy(
        &self,
        deployer: Address,
        project_id: ProjectId,
        initial_delegates: Vec<Address>,
        config: ProxyConfig,
    ) -> Result<DatasourceProxy, ProxyError> {
        DatasourceProxy::deploy(
            deployer,
            self.binding(project_id),
            initial_delegates,
            self.delegates.clone(),
            self.events.clone(),
            config,
        )
        .await
    }
}
