//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces of the collaborators the proxy consults:
//! - Platform registries (directory, projects, operator store)
//! - The delegates themselves, resolved from their registered identity
//! - An event sink for registry mutations
//!
//! Adapters implement these traits; the proxy never talks to a concrete
//! registry or delegate type.

use crate::domain::entities::{
    PayParamsRequest, PayParamsResponse, RedeemParamsRequest, RedeemParamsResponse,
};
use crate::errors::DelegateError;
use crate::events::ProxyEvent;
use async_trait::async_trait;
use shared_types::{Address, LookupError, OperationId, ProjectId};
use std::sync::Arc;

// =============================================================================
// PLATFORM REGISTRIES
// =============================================================================

/// Directory of project controllers and terminals.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Controller currently managing `project_id`.
    async fn controller_of(&self, project_id: ProjectId) -> Result<Address, LookupError>;
}

/// Registry of project ownership.
#[async_trait]
pub trait ProjectsRegistry: Send + Sync {
    /// Current owner of `project_id`.
    async fn owner_of(&self, project_id: ProjectId) -> Result<Address, LookupError>;
}

/// Registry of operator permissions.
///
/// An `account` grants an `operator` a `permission` within a `domain`
/// (a project id, or `ProjectId::PLATFORM_ROOT` for every project).
#[async_trait]
pub trait OperatorStore: Send + Sync {
    /// Whether `operator` holds `permission` from `account` in `domain`.
    async fn has_permission(
        &self,
        operator: Address,
        account: Address,
        domain: ProjectId,
        permission: OperationId,
    ) -> Result<bool, LookupError>;
}

// =============================================================================
// DATA SOURCES
// =============================================================================

/// A funding-cycle data source: consulted before a payment or redemption is
/// recorded.
///
/// Every registered delegate implements this, and so does the proxy, which
/// is why a terminal cannot tell the proxy from a single data source.
#[async_trait]
pub trait FundingCycleDataSource: Send + Sync {
    /// Pay consultation.
    async fn pay_params(&self, request: &PayParamsRequest)
        -> Result<PayParamsResponse, DelegateError>;

    /// Redeem consultation.
    async fn redeem_params(
        &self,
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, DelegateError>;
}

/// Maps a registered identity to a callable data source.
///
/// `None` means nothing callable lives at that identity.
pub trait DelegateResolver: Send + Sync {
    /// Resolve `delegate`.
    fn resolve(&self, delegate: Address) -> Option<Arc<dyn FundingCycleDataSource>>;
}

// =============================================================================
// EVENTS
// =============================================================================

/// Sink for registry mutation events.
pub trait EventPublisher: Send + Sync {
    /// Publish one event. Must not block.
    fn publish(&self, event: ProxyEvent);
}
