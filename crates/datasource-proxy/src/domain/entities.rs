//! # Domain Entities
//!
//! Consultation requests and responses exchanged between a payment terminal
//! and a data source, in their pay and redeem flavors.
//!
//! The same shapes are used on both sides of the proxy: a terminal sends a
//! request to the proxy, and the proxy forwards that very request to each
//! registered delegate.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Metadata, ProjectId, TokenAmount, U256};

// =============================================================================
// ALLOCATIONS
// =============================================================================

/// One delegate's recommendation to route part of a payment elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayDelegateAllocation {
    /// Recipient of the routed value.
    pub delegate: Address,
    /// Amount to route.
    pub amount: U256,
}

impl PayDelegateAllocation {
    /// Creates an allocation.
    #[must_use]
    pub fn new(delegate: Address, amount: U256) -> Self {
        Self { delegate, amount }
    }
}

/// One delegate's recommendation to route part of a redemption elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionDelegateAllocation {
    /// Recipient of the routed value.
    pub delegate: Address,
    /// Amount to route.
    pub amount: U256,
}

impl RedemptionDelegateAllocation {
    /// Creates an allocation.
    #[must_use]
    pub fn new(delegate: Address, amount: U256) -> Self {
        Self { delegate, amount }
    }
}

// =============================================================================
// PAY CONSULTATION
// =============================================================================

/// Context of a contribution about to be recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayParamsRequest {
    /// Terminal recording the payment.
    pub terminal: Address,
    /// Account paying.
    pub payer: Address,
    /// Amount paid.
    pub amount: TokenAmount,
    /// Project being paid.
    pub project_id: ProjectId,
    /// Configuration of the funding cycle in effect.
    pub current_funding_cycle_configuration: U256,
    /// Account receiving project tokens.
    pub beneficiary: Address,
    /// Weight the funding cycle would apply.
    pub weight: U256,
    /// Reserved rate of the funding cycle.
    pub reserved_rate: U256,
    /// Memo attached by the payer.
    pub memo: String,
    /// Extra data for delegates.
    pub metadata: Metadata,
}

/// A data source's answer to a pay consultation.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayParamsResponse {
    /// Weight to record the payment with.
    pub weight: U256,
    /// Memo to record the payment with.
    pub memo: String,
    /// Value to route to other recipients, in order.
    pub allocations: Vec<PayDelegateAllocation>,
}

impl PayParamsResponse {
    /// Response echoing the request's weight and memo with no allocations.
    #[must_use]
    pub fn pass_through(request: &PayParamsRequest) -> Self {
        Self {
            weight: request.weight,
            memo: request.memo.clone(),
            allocations: Vec::new(),
        }
    }

    /// Sum of all allocation amounts, saturating.
    #[must_use]
    pub fn total_allocated(&self) -> U256 {
        self.allocations
            .iter()
            .fold(U256::zero(), |acc, a| acc.saturating_add(a.amount))
    }
}

// =============================================================================
// REDEEM CONSULTATION
// =============================================================================

/// Context of a redemption about to be recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemParamsRequest {
    /// Terminal recording the redemption.
    pub terminal: Address,
    /// Account redeeming tokens.
    pub holder: Address,
    /// Project whose tokens are redeemed.
    pub project_id: ProjectId,
    /// Configuration of the funding cycle in effect.
    pub current_funding_cycle_configuration: U256,
    /// Number of tokens redeemed.
    pub token_count: U256,
    /// Total token supply.
    pub total_supply: U256,
    /// Overflow available to reclaim from.
    pub overflow: U256,
    /// Amount the terminal would reclaim.
    pub reclaim_amount: TokenAmount,
    /// Whether overflow across all terminals is used.
    pub use_total_overflow: bool,
    /// Redemption rate of the funding cycle.
    pub redemption_rate: U256,
    /// Memo attached by the holder.
    pub memo: String,
    /// Extra data for delegates.
    pub metadata: Metadata,
}

/// A data source's answer to a redeem consultation.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedeemParamsResponse {
    /// Amount to reclaim (the redemption weight).
    pub reclaim_amount: U256,
    /// Memo to record the redemption with.
    pub memo: String,
    /// Value to route to other recipients, in order.
    pub allocations: Vec<RedemptionDelegateAllocation>,
}

impl RedeemParamsResponse {
    /// Response echoing the request's reclaim amount and memo with no allocations.
    #[must_use]
    pub fn pass_through(request: &RedeemParamsRequest) -> Self {
        Self {
            reclaim_amount: request.reclaim_amount.value,
            memo: request.memo.clone(),
            allocations: Vec::new(),
        }
    }

    /// Sum of all allocation amounts, saturating.
    #[must_use]
    pub fn total_allocated(&self) -> U256 {
        self.allocations
            .iter()
            .fold(U256::zero(), |acc, a| acc.saturating_add(a.amount))
    }
}

// =============================================================================
// TESTS
// =============================================================================
