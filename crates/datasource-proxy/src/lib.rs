//! # Datasource Proxy - Delegate Aggregation for Funding Cycles
//!
//! ## Purpose
//!
//! A project's payment terminal consults one data source before it records a
//! payment or a redemption. This crate lets a project put an ordered chain of
//! delegates behind that single data source: the proxy forwards each
//! consultation to every delegate and merges the answers, so the terminal
//! never knows there is more than one.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Permission Gate | `gate.rs` | owner / project operator / platform operator check |
//! | Delegate Registry | `domain/registry.rs` | ordered, index-addressed chain |
//! | Params Aggregator | `aggregator.rs` | all-or-nothing fan-out and merge |
//! | Proxy Facade | `service.rs` | deployment, mutation, consultation |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Weight and memo pass through unchanged | `domain/invariants.rs` - `check_pay_pass_through()` |
//! | INVARIANT-2 | Allocations concatenate in chain order | `domain/invariants.rs` - `check_pay_concatenation()` |
//! | INVARIANT-3 | Insert index clamps to `[0, len]` | `domain/registry.rs` - `DelegateRegistry::insert()` |
//! | INVARIANT-4 | Failed mutation leaves the chain untouched | `service.rs` - write lock held through the gate |
//!
//! ## Security
//!
//! - Deployment and both mutations require the permission gate.
//! - Consultations are open to any caller.
//! - One failing delegate fails the whole consultation; there is no
//!   skip-and-continue.
//!
//! ## Outbound Dependencies
//!
//! | Collaborator | Trait | Purpose |
//! |--------------|-------|---------|
//! | Directory | `Directory` | project controller lookup |
//! | Projects | `ProjectsRegistry` | project owner lookup |
//! | Operator store | `OperatorStore` | permission lookup |
//! | Delegates | `FundingCycleDataSource` via `DelegateResolver` | consultations |
//! | Event sink | `EventPublisher` | registry mutation events |
//!
//! ## Usage Example
//!
//! ```ignore
//! use datasource_proxy::prelude::*;
//!
//! let proxy = DatasourceProxy::deploy(
//!     owner,
//!     binding,
//!     vec![reward_delegate],
//!     resolver,
//!     events,
//!     ProxyConfig::default(),
//! )
//! .await?;
//!
//! proxy.register_delegate(owner, fee_delegate, 0).await?;
//! let response = proxy.pay_params(&request).await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod aggregator;
pub mod binding;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod gate;
pub mod ports;
pub mod service;

pub use binding::ProjectBinding;
pub use config::ProxyConfig;
pub use errors::{ConfigError, DelegateError, ProxyError};
pub use service::{DatasourceProxy, ProxyStats};

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Shared primitives
    pub use shared_types::{
        Address, LookupError, Metadata, OperationId, ProjectId, TokenAmount, U256,
    };

    // Domain
    pub use crate::domain::entities::{
        PayDelegateAllocation, PayParamsRequest, PayParamsResponse, RedeemParamsRequest,
        RedeemParamsResponse, RedemptionDelegateAllocation,
    };
    pub use crate::domain::authorization::AuthorizationBasis;
    pub use crate::domain::registry::DelegateRegistry;

    // Ports
    pub use crate::ports::inbound::{DataSourceApi, DelegateRegistryApi};
    pub use crate::ports::outbound::{
        DelegateResolver, Directory, EventPublisher, FundingCycleDataSource, OperatorStore,
        ProjectsRegistry,
    };

    // Events
    pub use crate::events::{topics, ProxyEvent};

    // Errors
    pub use crate::errors::{ConfigError, DelegateError, ProxyError};

    // Components
    pub use crate::aggregator::ParamsAggregator;
    pub use crate::gate::PermissionGate;

    // Adapters
    pub use crate::adapters::{
        FixedAllocationDelegate, InMemoryDelegateBook, InMemoryDirectory, InMemoryEventLog,
        InMemoryOperatorStore, InMemoryPlatform, InMemoryProjects,
    };

    // Service
    pub use crate::binding::ProjectBinding;
    pub use crate::config::ProxyConfig;
    pub use crate::service::{DatasourceProxy, ProxyStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
