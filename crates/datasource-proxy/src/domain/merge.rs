//! # Merge Policy
//!
//! Combines the answers of every delegate in the chain into the single
//! answer the proxy returns.
//!
//! - Weight (reclaim amount for redemptions) and memo come from the inbound
//!   request unchanged. Whatever a delegate returns for them is ignored.
//! - Allocations are concatenated in chain order, each delegate's entries
//!   kept in the order it returned them. Zero-amount entries are kept.

use super::entities::{
    PayParamsRequest, PayParamsResponse, RedeemParamsRequest, RedeemParamsResponse,
};

/// Merges delegate pay responses, given in chain order.
#[must_use]
pub fn merge_pay_responses<I>(request: &PayParamsRequest, responses: I) -> PayParamsResponse
where
    I: IntoIterator<Item = PayParamsResponse>,
{
    let mut merged = PayParamsResponse::pass_through(request);
    for response in responses {
        merged.allocations.extend(response.allocations);
    }
    merged
}

/// Merges delegate redeem responses, given in chain order.
#[must_use]
pub fn merge_redeem_responses<I>(
    request: &RedeemParamsRequest,
    responses: I,
) -> RedeemParamsResponse
where
    I: IntoIterator<Item = RedeemParamsResponse>,
{
    let mut merged = RedeemParamsResponse::pass_through(request);
    for response in responses {
        merged.allocations.extend(response.allocations);
    }
    merged
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PayDelegateAllocation, RedemptionDelegateAllocation};
    use shared_types::{Address, Metadata, ProjectId, TokenAmount, U256};

    fn pay_request() -> PayParamsRequest {
        PayParamsRequest {
            terminal: Address::from_low_u8(0x10),
            payer: Address::from_low_u8(0x11),
            amount: TokenAmount::new(Address::ZERO, U256::from(500u64), 18, U256::one()),
            project_id: ProjectId::new(2),
            current_funding_cycle_configuration: U256::zero(),
            beneficiary: Address::from_low_u8(0x11),
            weight: U256::from(42u64),
            reserved_rate: U256::zero(),
            memo: "inbound".to_string(),
            metadata: Metadata::empty(),
        }
    }

    fn redeem_request() -> RedeemParamsRequest {
        RedeemParamsRequest {
            terminal: Address::from_low_u8(0x10),
            holder: Address::from_low_u8(0x12),
            project_id: ProjectId::new(2),
            current_funding_cycle_configuration: U256::zero(),
            token_count: U256::from(10u64),
            total_supply: U256::from(100u64),
            overflow: U256::from(1_000u64),
            reclaim_amount: TokenAmount::new(Address::ZERO, U256::from(77u64), 18, U256::one()),
            use_total_overflow: false,
            redemption_rate: U256::from(10_000u64),
            memo: "bye".to_string(),
            metadata: Metadata::empty(),
        }
    }

    fn pay_response(entries: &[(u8, u64)]) -> PayParamsResponse {
        PayParamsResponse {
            weight: U256::from(999u64),
            memo: "delegate memo".to_string(),
            allocations: entries
                .iter()
                .map(|(id, amount)| {
                    PayDelegateAllocation::new(Address::from_low_u8(*id), U256::from(*amount))
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_pay_concatenates_in_order() {
        let req = pay_request();
        let merged = merge_pay_responses(
            &req,
            vec![pay_response(&[(1, 10), (1, 0)]), pay_response(&[]), pay_response(&[(3, 30)])],
        );

        let order: Vec<_> = merged.allocations.iter().map(|a| a.delegate).collect();
        assert_eq!(
            order,
            vec![Address::from_low_u8(1), Address::from_low_u8(1), Address::from_low_u8(3)]
        );
        assert_eq!(merged.allocations[1].amount, U256::zero());
    }

    #[test]
    fn test_merge_pay_ignores_delegate_weight_and_memo() {
        let req = pay_request();
        let merged = merge_pay_responses(&req, vec![pay_response(&[(1, 10)])]);
        assert_eq!(merged.weight, U256::from(42u64));
        assert_eq!(merged.memo, "inbound");
    }

    #[test]
    fn test_merge_empty_chain_is_pass_through() {
        let req = pay_request();
        assert_eq!(
            merge_pay_responses(&req, Vec::new()),
            PayParamsResponse::pass_through(&req)
        );

        let req = redeem_request();
        let merged = merge_redeem_responses(&req, Vec::new());
        assert_eq!(merged.reclaim_amount, U256::from(77u64));
        assert_eq!(merged.memo, "bye");
        assert!(merged.allocations.is_empty());
    }

    #[test]
    fn test_merge_redeem_concatenates_in_order() {
        let req = redeem_request();
        let a = RedeemParamsResponse {
            reclaim_amount: U256::one(),
            memo: String::new(),
            allocations: vec![RedemptionDelegateAllocation::new(
                Address::from_low_u8(1),
                U256::from(5u64),
            )],
        };
        let b = RedeemParamsResponse {
            reclaim_amount: U256::one(),
            memo: String::new(),
            allocations: vec![RedemptionDelegateAllocation::new(
                Address::from_low_u8(2),
                U256::from(6u64),
            )],
        };
        let merged = merge_redeem_responses(&req, vec![a, b]);
        assert_eq!(merged.reclaim_amount, U256::from(77u64));
        assert_eq!(merged.allocations.len(), 2);
        assert_eq!(merged.allocations[0].delegate, Address::from_low_u8(1));
        assert_eq!(merged.allocations[1].delegate, Address::from_low_u8(2));
    }
}
