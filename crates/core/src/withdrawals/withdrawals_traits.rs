//! Withdrawal repository and service traits.

use async_trait::async_trait;

use super::withdrawals_model::{
    EligibilityBreakdown, NewWithdrawalRequest, WithdrawalDecision, WithdrawalRequest,
};
use crate::errors::Result;

/// Read access to withdrawal requests.
///
/// Requests are written through [`crate::ledger::LedgerWriterTrait`] together
/// with the escrow movement they cause.
pub trait WithdrawalRepositoryTrait: Send + Sync {
    fn get_withdrawal(&self, request_id: &str) -> Result<WithdrawalRequest>;

    /// Requests of one account, newest first.
    fn list_withdrawals(&self, account_id: &str) -> Result<Vec<WithdrawalRequest>>;

    /// Requests awaiting admin review, oldest first.
    fn list_pending_withdrawals(&self) -> Result<Vec<WithdrawalRequest>>;
}

#[async_trait]
pub trait WithdrawalServiceTrait: Send + Sync {
    /// Bucket breakdown from the latest account snapshot. Read-only.
    fn compute_eligibility(&self, account_id: &str) -> Result<EligibilityBreakdown>;

    /// Validates a request against fresh account state and escrows its amount.
    async fn submit_withdrawal(
        &self,
        account_id: &str,
        request: NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest>;

    /// Approves (pays out) or rejects (refunds) a pending request, exactly once.
    async fn resolve_withdrawal(
        &self,
        request_id: &str,
        decision: WithdrawalDecision,
    ) -> Result<WithdrawalRequest>;

    fn list_withdrawals(&self, account_id: &str) -> Result<Vec<WithdrawalRequest>>;

    fn list_pending_withdrawals(&self) -> Result<Vec<WithdrawalRequest>>;
}
