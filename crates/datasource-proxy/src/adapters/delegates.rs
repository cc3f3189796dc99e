//! # Delegate Adapters
//!
//! Resolving registered identities to callable data sources, plus a simple
//! delegate that always recommends the same allocation.

use crate::domain::entities::{
    PayDelegateAllocation, PayParamsRequest, PayParamsResponse, RedeemParamsRequest,
    RedeemParamsResponse, RedemptionDelegateAllocation,
};
use crate::errors::DelegateError;
use crate::ports::outbound::{DelegateResolver, FundingCycleDataSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

/// Address book of deployed data sources.
#[derive(Default)]
pub struct InMemoryDelegateBook {
    sources: RwLock<HashMap<Address, Arc<dyn FundingCycleDataSource>>>,
}

impl InMemoryDelegateBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy `source` at `address`, replacing whatever was there.
    pub fn deploy(&self, address: Address, source: Arc<dyn FundingCycleDataSource>) {
        self.sources.write().insert(address, source);
    }

    /// Remove the data source at `address`.
    pub fn destroy(&self, address: Address) {
        self.sources.write().remove(&address);
    }
}

impl std::fmt::Debug for InMemoryDelegateBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDelegateBook")
            .field("deployed", &self.sources.read().len())
            .finish()
    }
}

impl DelegateResolver for InMemoryDelegateBook {
    fn resolve(&self, delegate: Address) -> Option<Arc<dyn FundingCycleDataSource>> {
        self.sources.read().get(&delegate).cloned()
    }
}

/// Delegate that recommends routing a fixed amount to a fixed recipient on
/// both payments and redemptions.
///
/// Weight and memo are echoed from the request.
#[derive(Clone, Copy, Debug)]
pub struct FixedAllocationDelegate {
    recipient: Address,
    amount: U256,
}

impl FixedAllocationDelegate {
    /// Route `amount` to `recipient`.
    #[must_use]
    pub fn new(recipient: Address, amount: U256) -> Self {
        Self { recipient, amount }
    }
}

#[async_trait]
impl FundingCycleDataSource for FixedAllocationDelegate {
    async fn pay_params(
        &self,
        request: &PayParamsRequest,
    ) -> Result<PayParamsResponse, DelegateError> {
        Ok(PayParamsResponse {
            weight: request.weight,
            memo: request.memo.clone(),
            allocations: vec![PayDelegateAllocation::new(self.recipient, self.amount)],
        })
    }

    async fn redeem_params(
        &self,
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, DelegateError> {
        Ok(RedeemParamsResponse {
            reclaim_amount: request.reclaim_amount.value,
            memo: request.memo.clone(),
            allocations: vec![RedemptionDelegateAllocation::new(self.recipient, self.amount)],
        })
    }
}
