//! # Datasource Proxy Service
//!
//! The facade a project registers as its funding-cycle data source.
//!
//! ## Operations
//!
//! | Operation | Gated | Mutates |
//! |-----------|-------|---------|
//! | `deploy` | yes (deployer) | creates the registry |
//! | `register_delegate` | yes | inserts |
//! | `remove_delegate` | yes | removes |
//! | `delegates`, `delegate_count`, `controller` | no | no |
//! | `pay_params`, `redeem_params` | no | no |
//!
//! ## Atomicity
//!
//! A mutation holds the registry write lock from the permission check to
//! the commit, so mutations are totally ordered and each one sees exactly
//! the state committed before it. A failed mutation leaves the registry as
//! it was. Events are published before the lock is released, so their
//! order is the commit order. Consultations work on a snapshot taken under
//! the read lock.
//!
//! ## Nesting
//!
//! A proxy is itself a data source and may sit in another proxy's chain,
//! including its own. The nesting depth of a consultation is carried in a
//! task-local; a proxy consulted deeper than its `max_nesting_depth` fails
//! that call with `NestingTooDeep`, so a cyclic chain fails like any other
//! delegate instead of recursing without bound.

use crate::aggregator::ParamsAggregator;
use crate::binding::ProjectBinding;
use crate::config::ProxyConfig;
use crate::domain::entities::{
    PayParamsRequest, PayParamsResponse, RedeemParamsRequest, RedeemParamsResponse,
};
use crate::domain::registry::DelegateRegistry;
use crate::errors::{DelegateError, ProxyError};
use crate::events::ProxyEvent;
use crate::gate::PermissionGate;
use crate::ports::inbound::{DataSourceApi, DelegateRegistryApi};
use crate::ports::outbound::{DelegateResolver, EventPublisher, FundingCycleDataSource};

use async_trait::async_trait;
use shared_types::{Address, ProjectId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Counters for the proxy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProxyStats {
    /// Completed pay consultations.
    pub pay_consultations: u64,
    /// Completed redeem consultations.
    pub redeem_consultations: u64,
    /// Consultations aborted by a delegate failure.
    pub failed_consultations: u64,
    /// Successful `register_delegate` calls.
    pub delegates_registered: u64,
    /// Successful `remove_delegate` calls.
    pub delegates_removed: u64,
    /// Mutations refused by the permission gate.
    pub rejected_mutations: u64,
}

tokio::task_local! {
    /// Proxies the current consultation has already passed through.
    static NESTING_DEPTH: usize;
}

fn nesting_depth() -> usize {
    NESTING_DEPTH.try_with(|depth| *depth).unwrap_or(0)
}

/// Delegate aggregation proxy for one project.
pub struct DatasourceProxy {
    binding: ProjectBinding,
    config: ProxyConfig,
    gate: PermissionGate,
    aggregator: ParamsAggregator,
    registry: RwLock<DelegateRegistry>,
    events: Arc<dyn EventPublisher>,
    stats: RwLock<ProxyStats>,
}

impl DatasourceProxy {
    /// Deploy a proxy for `binding`'s project with `initial_delegates`.
    ///
    /// `deployer` must pass the permission gate for the project; otherwise
    /// no proxy is created.
    ///
    /// # Errors
    ///
    /// `Config` for an invalid config, `PermissionDenied` for an
    /// unauthorized deployer, `Collaborator` if a registry lookup fails.
    #[instrument(skip_all, fields(project_id = %binding.project_id(), %deployer))]
    pub async fn deploy(
        deployer: Address,
        binding: ProjectBinding,
        initial_delegates: Vec<Address>,
        resolver: Arc<dyn DelegateResolver>,
        events: Arc<dyn EventPublisher>,
        config: ProxyConfig,
    ) -> Result<Self, ProxyError> {
        config.validate()?;

        let gate = PermissionGate::new(
            binding.projects().clone(),
            binding.operator_store().clone(),
            binding.project_id(),
            config.required_permission,
        );
        let basis = gate.require(deployer).await?;

        info!(
            %basis,
            delegates = initial_delegates.len(),
            "Datasource proxy deployed"
        );

        Ok(Self {
            aggregator: ParamsAggregator::new(resolver, config.delegate_call_timeout()),
            registry: RwLock::new(DelegateRegistry::from_delegates(initial_delegates)),
            stats: RwLock::new(ProxyStats::default()),
            binding,
            config,
            gate,
            events,
        })
    }

    /// Project this proxy serves.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.binding.project_id()
    }

    /// Registries and project this proxy is bound to.
    #[must_use]
    pub fn binding(&self) -> &ProjectBinding {
        &self.binding
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Current statistics.
    pub async fn stats(&self) -> ProxyStats {
        self.stats.read().await.clone()
    }

    /// Controller of the project, per the directory.
    ///
    /// # Errors
    ///
    /// `Collaborator` if the directory lookup fails.
    pub async fn controller(&self) -> Result<Address, ProxyError> {
        Ok(self
            .binding
            .directory()
            .controller_of(self.project_id())
            .await?)
    }

    /// All delegates in chain order.
    pub async fn delegates_snapshot(&self) -> Vec<Address> {
        self.registry.read().await.snapshot()
    }

    /// Insert `delegate` at `index`, clamped to the chain length.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if `caller` fails the gate.
    #[instrument(skip(self), fields(project_id = %self.project_id()))]
    pub async fn register_delegate(
        &self,
        caller: Address,
        delegate: Address,
        index: usize,
    ) -> Result<(), ProxyError> {
        let mut registry = self.registry.write().await;
        self.require(caller).await?;

        let position = registry.insert(delegate, index);
        self.publish(ProxyEvent::DelegateRegistered {
            project_id: self.project_id(),
            delegate,
            index: position,
            caller,
        });
        drop(registry);

        info!(%delegate, requested = index, position, "Delegate registered");
        self.stats.write().await.delegates_registered += 1;
        Ok(())
    }

    /// Remove the first occurrence of `delegate`.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if `caller` fails the gate, `InvalidDelegate` if
    /// `delegate` is not registered.
    #[instrument(skip(self), fields(project_id = %self.project_id()))]
    pub async fn remove_delegate(
        &self,
        caller: Address,
        delegate: Address,
    ) -> Result<(), ProxyError> {
        let mut registry = self.registry.write().await;
        self.require(caller).await?;

        let position = registry.remove(delegate).map_err(|e| {
            warn!(%delegate, "Attempt to remove unregistered delegate");
            e
        })?;
        self.publish(ProxyEvent::DelegateRemoved {
            project_id: self.project_id(),
            delegate,
            index: position,
            caller,
        });
        drop(registry);

        info!(%delegate, position, "Delegate removed");
        self.stats.write().await.delegates_removed += 1;
        Ok(())
    }

    /// Delegate at `index`.
    ///
    /// # Errors
    ///
    /// `DelegateIndexOutOfRange` if `index` is past the end.
    pub async fn delegates(&self, index: usize) -> Result<Address, ProxyError> {
        self.registry.read().await.get(index)
    }

    /// Number of registered delegates.
    pub async fn delegate_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Consult every delegate about a payment.
    ///
    /// # Errors
    ///
    /// `DelegateCallFailure` if any delegate fails.
    #[instrument(
        skip(self, request),
        fields(project_id = %self.project_id(), consultation_id = %Uuid::new_v4())
    )]
    pub async fn pay_params(
        &self,
        request: &PayParamsRequest,
    ) -> Result<PayParamsResponse, ProxyError> {
        let delegates = self.delegates_snapshot().await;
        let result = self.aggregator.pay_params(&delegates, request).await;

        let mut stats = self.stats.write().await;
        match &result {
            Ok(response) => {
                stats.pay_consultations += 1;
                info!(
                    delegates = delegates.len(),
                    allocations = response.allocations.len(),
                    "Pay consultation completed"
                );
            }
            Err(e) => {
                stats.failed_consultations += 1;
                error!(error = %e, "Pay consultation failed");
            }
        }
        result
    }

    /// Consult every delegate about a redemption.
    ///
    /// # Errors
    ///
    /// `DelegateCallFailure` if any delegate fails.
    #[instrument(
        skip(self, request),
        fields(project_id = %self.project_id(), consultation_id = %Uuid::new_v4())
    )]
    pub async fn redeem_params(
        &self,
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, ProxyError> {
        let delegates = self.delegates_snapshot().await;
        let result = self.aggregator.redeem_params(&delegates, request).await;

        let mut stats = self.stats.write().await;
        match &result {
            Ok(response) => {
                stats.redeem_consultations += 1;
                info!(
                    delegates = delegates.len(),
                    allocations = response.allocations.len(),
                    "Redeem consultation completed"
                );
            }
            Err(e) => {
                stats.failed_consultations += 1;
                error!(error = %e, "Redeem consultation failed");
            }
        }
        result
    }

    async fn require(&self, caller: Address) -> Result<(), ProxyError> {
        match self.gate.require(caller).await {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.is_permission_denied() {
                    self.stats.write().await.rejected_mutations += 1;
                }
                Err(e)
            }
        }
    }

    fn publish(&self, event: ProxyEvent) {
        if self.config.publish_events {
            self.events.publish(event);
        }
    }

    /// Depth at which this proxy is being consulted as a delegate.
    fn enter_nested(&self) -> Result<usize, DelegateError> {
        let depth = nesting_depth() + 1;
        let max_depth = self.config.max_nesting_depth;
        if depth > max_depth {
            warn!(
                project_id = %self.project_id(),
                depth,
                max_depth,
                "Refusing nested consultation"
            );
            return Err(DelegateError::NestingTooDeep { max_depth });
        }
        Ok(depth)
    }
}

impl std::fmt::Debug for DatasourceProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceProxy")
            .field("binding", &self.binding)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Port implementations
// =============================================================================

#[async_trait]
impl DataSourceApi for DatasourceProxy {
    async fn pay_params(
        &self,
        request: &PayParamsRequest,
    ) -> Result<PayParamsResponse, ProxyError> {
        DatasourceProxy::pay_params(self, request).await
    }

    async fn redeem_params(
        &self,
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, ProxyError> {
        DatasourceProxy::redeem_params(self, request).await
    }
}

#[async_trait]
impl DelegateRegistryApi for DatasourceProxy {
    async fn register_delegate(
        &self,
        caller: Address,
        delegate: Address,
        index: usize,
    ) -> Result<(), ProxyError> {
        DatasourceProxy::register_delegate(self, caller, delegate, index).await
    }

    async fn remove_delegate(&self, caller: Address, delegate: Address) -> Result<(), ProxyError> {
        DatasourceProxy::remove_delegate(self, caller, delegate).await
    }

    async fn delegates(&self, index: usize) -> Result<Address, ProxyError> {
        DatasourceProxy::delegates(self, index).await
    }

    async fn delegate_count(&self) -> usize {
        DatasourceProxy::delegate_count(self).await
    }
}

/// A proxy can sit in another proxy's chain; its errors surface as a revert.
#[async_trait]
impl FundingCycleDataSource for DatasourceProxy {
    async fn pay_params(
        &self,
        request: &PayParamsRequest,
    ) -> Result<PayParamsResponse, DelegateError> {
        let depth = self.enter_nested()?;
        NESTING_DEPTH
            .scope(depth, DatasourceProxy::pay_params(self, request))
            .await
            .map_err(|e| DelegateError::Reverted(e.to_string()))
    }

    async fn redeem_params(
        &self,
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, DelegateError> {
        let depth = self.enter_nested()?;
        NESTING_DEPTH
            .scope(depth, DatasourceProxy::redeem_params(self, request))
            .await
            .map_err(|e| DelegateError::Reverted(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
