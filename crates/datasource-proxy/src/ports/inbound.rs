//! # Driving Ports (API - Inbound)
//!
//! What the proxy exposes:
//! - To payment terminals: the two consultations, with the call shape of a
//!   single data source. Open to any caller.
//! - To project administrators: registry mutation, gated by the permission
//!   gate, plus ungated reads.

use crate::domain::entities::{
    PayParamsRequest, PayParamsResponse, RedeemParamsRequest, RedeemParamsResponse,
};
use crate::errors::ProxyError;
use async_trait::async_trait;
use shared_types::Address;

/// Aggregate consultations.
#[async_trait]
pub trait DataSourceApi: Send + Sync {
    /// Consult every delegate about a payment and merge the answers.
    ///
    /// # Errors
    ///
    /// `DelegateCallFailure` if any delegate fails; no partial result.
    async fn pay_params(&self, request: &PayParamsRequest)
        -> Result<PayParamsResponse, ProxyError>;

    /// Consult every delegate about a redemption and merge the answers.
    ///
    /// # Errors
    ///
    /// `DelegateCallFailure` if any delegate fails; no partial result.
    async fn redeem_params(
        &self,
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, ProxyError>;
}

/// Registry administration and reads.
#[async_trait]
pub trait DelegateRegistryApi: Send + Sync {
    /// Insert `delegate` at `index` (clamped to the list length).
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if `caller` fails the permission gate.
    async fn register_delegate(
        &self,
        caller: Address,
        delegate: Address,
        index: usize,
    ) -> Result<(), ProxyError>;

    /// Remove the first occurrence of `delegate`.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if `caller` fails the permission gate,
    /// `InvalidDelegate` if `delegate` is not registered.
    async fn remove_delegate(&self, caller: Address, delegate: Address) -> Result<(), ProxyError>;

    /// Delegate at `index`.
    ///
    /// # Errors
    ///
    /// `DelegateIndexOutOfRange` if `index` is past the end.
    async fn delegates(&self, index: usize) -> Result<Address, ProxyError>;

    /// Number of registered delegates.
    async fn delegate_count(&self) -> usize;
}
