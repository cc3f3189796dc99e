//! # Params Aggregator
//!
//! Fans one consultation out to every delegate of a chain and merges the
//! answers.
//!
//! - Delegates are called one after another, strictly in chain order, each
//!   with the same request.
//! - The first failure aborts the consultation. Nothing already collected
//!   is returned.
//! - Each call is bounded by the configured timeout; elapsing it counts as
//!   a failure of that delegate.

use crate::domain::entities::{
    PayParamsRequest, PayParamsResponse, RedeemParamsRequest, RedeemParamsResponse,
};
use crate::domain::invariants::{check_pay_invariants, check_redeem_invariants};
use crate::domain::merge::{merge_pay_responses, merge_redeem_responses};
use crate::errors::{DelegateError, ProxyError};
use crate::ports::outbound::{DelegateResolver, FundingCycleDataSource};
use shared_types::Address;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Fan-out and merge over a delegate chain.
#[derive(Clone)]
pub struct ParamsAggregator {
    resolver: Arc<dyn DelegateResolver>,
    call_timeout: Duration,
}

impl ParamsAggregator {
    /// Aggregator resolving delegates through `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn DelegateResolver>, call_timeout: Duration) -> Self {
        Self {
            resolver,
            call_timeout,
        }
    }

    /// Consult `delegates` about a payment.
    ///
    /// # Errors
    ///
    /// `DelegateCallFailure` for the first delegate that fails.
    pub async fn pay_params(
        &self,
        delegates: &[Address],
        request: &PayParamsRequest,
    ) -> Result<PayParamsResponse, ProxyError> {
        let mut parts = Vec::with_capacity(delegates.len());
        for (position, &delegate) in delegates.iter().enumerate() {
            let source = self.resolve(position, delegate)?;
            let part = self
                .bounded(position, delegate, source.pay_params(request))
                .await?;
            debug!(
                %delegate,
                position,
                allocations = part.allocations.len(),
                "Delegate answered pay consultation"
            );
            parts.push(part);
        }

        let merged = merge_pay_responses(request, parts.iter().cloned());
        debug_assert!(check_pay_invariants(request, &parts, &merged).is_empty());
        Ok(merged)
    }

    /// Consult `delegates` about a redemption.
    ///
    /// # Errors
    ///
    /// `DelegateCallFailure` for the first delegate that fails.
    pub async fn redeem_params(
        &self,
        delegates: &[Address],
        request: &RedeemParamsRequest,
    ) -> Result<RedeemParamsResponse, ProxyError> {
        let mut parts = Vec::with_capacity(delegates.len());
        for (position, &delegate) in delegates.iter().enumerate() {
            let source = self.resolve(position, delegate)?;
            let part = self
                .bounded(position, delegate, source.redeem_params(request))
                .await?;
            debug!(
                %delegate,
                position,
                allocations = part.allocations.len(),
                "Delegate answered redeem consultation"
            );
            parts.push(part);
        }

        let merged = merge_redeem_responses(request, parts.iter().cloned());
        debug_assert!(check_redeem_invariants(request, &parts, &merged).is_empty());
        Ok(merged)
    }

    fn resolve(
        &self,
        position: usize,
        delegate: Address,
    ) -> Result<Arc<dyn FundingCycleDataSource>, ProxyError> {
        self.resolver
            .resolve(delegate)
            .ok_or_else(|| failure(position, delegate, DelegateError::Unresolvable))
    }

    async fn bounded<T, F>(
        &self,
        position: usize,
        delegate: Address,
        call: F,
    ) -> Result<T, ProxyError>
    where
        F: Future<Output = Result<T, DelegateError>>,
    {
        let timeout_ms = u64::try_from(self.call_timeout.as_millis()).unwrap_or(u64::MAX);
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(failure(position, delegate, source)),
            Err(_) => Err(failure(position, delegate, DelegateError::Timeout { timeout_ms })),
        }
    }
}

fn failure(position: usize, delegate: Address, source: DelegateError) -> ProxyError {
    error!(%delegate, position, error = %source, "Delegate call failed");
    ProxyError::DelegateCallFailure {
        delegate,
        position,
        source,
    }
}

impl std::fmt::Debug for ParamsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamsAggregator")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedAllocationDelegate, InMemoryDelegateBook};
    use crate::domain::entities::PayDelegateAllocation;
    use async_trait::async_trait;
    use shared_types::{Metadata, ProjectId, TokenAmount, U256};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Reverting;

    #[async_trait]
    impl FundingCycleDataSource for Reverting {
        async fn pay_params(
            &self,
            _request: &PayParamsRequest,
        ) -> Result<PayParamsResponse, DelegateError> {
            Err(DelegateError::Reverted("NOPE".to_string()))
        }

        async fn redeem_params(
            &self,
            _request: &RedeemParamsRequest,
        ) -> Result<RedeemParamsResponse, DelegateError> {
            Err(DelegateError::Reverted("NOPE".to_string()))
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl FundingCycleDataSource for Counting {
        async fn pay_params(
            &self,
            request: &PayParamsRequest,
        ) -> Result<PayParamsResponse, DelegateError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(PayParamsResponse::pass_through(request))
        }

        async fn redeem_params(
            &self,
            request: &RedeemParamsRequest,
        ) -> Result<RedeemParamsResponse, DelegateError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(RedeemParamsResponse::pass_through(request))
        }
    }

    struct Stalling;

    #[async_trait]
    impl FundingCycleDataSource for Stalling {
        async fn pay_params(
            &self,
            request: &PayParamsRequest,
        ) -> Result<PayParamsResponse, DelegateError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(PayParamsResponse::pass_through(request))
        }

        async fn redeem_params(
            &self,
            request: &RedeemParamsRequest,
        ) -> Result<RedeemParamsResponse, DelegateError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(RedeemParamsResponse::pass_through(request))
        }
    }

    fn addr(id: u8) -> Address {
        Address::from_low_u8(id)
    }

    fn request() -> PayParamsRequest {
        PayParamsRequest {
            terminal: addr(0x10),
            payer: addr(0x11),
            amount: TokenAmount::new(Address::ZERO, U256::from(100u64), 18, U256::one()),
            project_id: ProjectId::new(2),
            current_funding_cycle_configuration: U256::zero(),
            beneficiary: addr(0x11),
            weight: U256::from(10u64),
            reserved_rate: U256::zero(),
            memo: String::new(),
            metadata: Metadata::empty(),
        }
    }

    fn aggregator(book: Arc<InMemoryDelegateBook>) -> ParamsAggregator {
        ParamsAggregator::new(book, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_allocations_follow_chain_order() {
        let book = Arc::new(InMemoryDelegateBook::new());
        book.deploy(addr(1), Arc::new(FixedAllocationDelegate::new(addr(1), U256::from(7u64))));
        book.deploy(addr(2), Arc::new(FixedAllocationDelegate::new(addr(2), U256::from(9u64))));

        let merged = aggregator(book)
            .pay_params(&[addr(2), addr(1)], &request())
            .await
            .unwrap();

        assert_eq!(
            merged.allocations,
            vec![
                PayDelegateAllocation::new(addr(2), U256::from(9u64)),
                PayDelegateAllocation::new(addr(1), U256::from(7u64)),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_stops_fan_out() {
        let calls = Arc::new(AtomicUsize::new(0));
        let book = Arc::new(InMemoryDelegateBook::new());
        book.deploy(addr(1), Arc::new(Counting(calls.clone())));
        book.deploy(addr(2), Arc::new(Reverting));
        book.deploy(addr(3), Arc::new(Counting(calls.clone())));

        let err = aggregator(book)
            .pay_params(&[addr(1), addr(2), addr(3)], &request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProxyError::DelegateCallFailure {
                delegate: addr(2),
                position: 1,
                source: DelegateError::Reverted("NOPE".to_string()),
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_delegate_fails() {
        let book = Arc::new(InMemoryDelegateBook::new());
        let err = aggregator(book)
            .pay_params(&[addr(9)], &request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::DelegateCallFailure {
                source: DelegateError::Unresolvable,
                position: 0,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalling_delegate_times_out() {
        let book = Arc::new(InMemoryDelegateBook::new());
        book.deploy(addr(1), Arc::new(Stalling));

        let err = aggregator(book)
            .pay_params(&[addr(1)], &request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::DelegateCallFailure {
                source: DelegateError::Timeout { timeout_ms: 500 },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_delegate_is_consulted_twice() {
        let calls = Arc::new(AtomicUsize::new(0));
        let book = Arc::new(InMemoryDelegateBook::new());
        book.deploy(addr(1), Arc::new(Counting(calls.clone())));

        aggregator(book)
            .pay_params(&[addr(1), addr(1)], &request())
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
