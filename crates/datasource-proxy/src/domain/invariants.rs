//! # Domain Invariants
//!
//! Properties a merged consultation result must satisfy.
//!
//! - INVARIANT-1: Pass-through. Weight (reclaim amount) and memo equal the
//!   inbound request's.
//! - INVARIANT-2: Concatenation. The merged allocation list is exactly every
//!   delegate's allocations, in chain order, nothing dropped or added.

use super::entities::{
    PayParamsRequest, PayParamsResponse, RedeemParamsRequest, RedeemParamsResponse,
};

/// INVARIANT-1 for pay consultations.
#[must_use]
pub fn check_pay_pass_through(request: &PayParamsRequest, merged: &PayParamsResponse) -> bool {
    merged.weight == request.weight && merged.memo == request.memo
}

/// INVARIANT-1 for redeem consultations.
#[must_use]
pub fn check_redeem_pass_through(
    request: &RedeemParamsRequest,
    merged: &RedeemParamsResponse,
) -> bool {
    merged.reclaim_amount == request.reclaim_amount.value && merged.memo == request.memo
}

/// INVARIANT-2 for pay consultations.
#[must_use]
pub fn check_pay_concatenation(parts: &[PayParamsResponse], merged: &PayParamsResponse) -> bool {
    let expected = parts.iter().flat_map(|p| p.allocations.iter());
    merged.allocations.len() == parts.iter().map(|p| p.allocations.len()).sum::<usize>()
        && merged.allocations.iter().eq(expected)
}

/// INVARIANT-2 for redeem consultations.
#[must_use]
pub fn check_redeem_concatenation(
    parts: &[RedeemParamsResponse],
    merged: &RedeemParamsResponse,
) -> bool {
    let expected = parts.iter().flat_map(|p| p.allocations.iter());
    merged.allocations.len() == parts.iter().map(|p| p.allocations.len()).sum::<usize>()
        && merged.allocations.iter().eq(expected)
}

/// A violated invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Weight/reclaim amount or memo differs from the request.
    PassThroughBroken,
    /// Allocation list is not the ordered concatenation of the parts.
    ConcatenationBroken,
}

/// Checks both invariants for a pay consultation.
#[must_use]
pub fn check_pay_invariants(
    request: &PayParamsRequest,
    parts: &[PayParamsResponse],
    merged: &PayParamsResponse,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    if !check_pay_pass_through(request, merged) {
        violations.push(InvariantViolation::PassThroughBroken);
    }
    if !check_pay_concatenation(parts, merged) {
        violations.push(InvariantViolation::ConcatenationBroken);
    }
    violations
}

/// Checks both invariants for a redeem consultation.
#[must_use]
pub fn check_redeem_invariants(
    request: &RedeemParamsRequest,
    parts: &[RedeemParamsResponse],
    merged: &RedeemParamsResponse,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    if !check_redeem_pass_through(request, merged) {
        violations.push(InvariantViolation::PassThroughBroken);
    }
    if !check_redeem_concatenation(parts, merged) {
        violations.push(InvariantViolation::ConcatenationBroken);
    }
    violations
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PayDelegateAllocation;
    use crate::domain::merge::merge_pay_responses;
    use shared_types::{Address, Metadata, ProjectId, TokenAmount, U256};

    fn request() -> PayParamsRequest {
        PayParamsRequest {
            terminal: Address::from_low_u8(1),
            payer: Address::from_low_u8(2),
            amount: TokenAmount::default(),
            project_id: ProjectId::new(2),
            current_funding_cycle_configuration: U256::zero(),
            beneficiary: Address::from_low_u8(2),
            weight: U256::from(5u64),
            reserved_rate: U256::zero(),
            memo: "m".to_string(),
            metadata: Metadata::empty(),
        }
    }

    fn part(id: u8, amount: u64) -> PayParamsResponse {
        PayParamsResponse {
            weight: U256::zero(),
            memo: String::new(),
            allocations: vec![PayDelegateAllocation::new(
                Address::from_low_u8(id),
                U256::from(amount),
            )],
        }
    }

    #[test]
    fn test_merged_result_satisfies_invariants() {
        let req = request();
        let parts = vec![part(1, 1), part(2, 2)];
        let merged = merge_pay_responses(&req, parts.clone());
        assert!(check_pay_invariants(&req, &parts, &merged).is_empty());
    }

    #[test]
    fn test_reordered_allocations_violate_concatenation() {
        let req = request();
        let parts = vec![part(1, 1), part(2, 2)];
        let mut merged = merge_pay_responses(&req, parts.clone());
        merged.allocations.reverse();
        assert_eq!(
            check_pay_invariants(&req, &parts, &merged),
            vec![InvariantViolation::ConcatenationBroken]
        );
    }

    #[test]
    fn test_blended_weight_violates_pass_through() {
        let req = request();
        let parts = vec![part(1, 1)];
        let mut merged = merge_pay_responses(&req, parts.clone());
        merged.weight = U256::from(6u64);
        assert_eq!(
            check_pay_invariants(&req, &parts, &merged),
            vec![InvariantViolation::PassThroughBroken]
        );
    }
}
