//! Investment repository and service traits.

use async_trait::async_trait;

use super::investments_model::{
    ClaimReceipt, Investment, InvestmentProduct, InvestmentSummary, InvestmentValuation,
    NewInvestmentProduct,
};
use crate::errors::Result;

/// Read access to products and investments, plus product inserts.
///
/// Investment rows are written through [`crate::ledger::LedgerWriterTrait`]
/// together with the ledger changes they imply.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    fn get_product(&self, product_id: &str) -> Result<InvestmentProduct>;

    fn list_products(&self, active_only: bool) -> Result<Vec<InvestmentProduct>>;

    async fn insert_product(&self, product: InvestmentProduct) -> Result<InvestmentProduct>;

    fn get_investment(&self, investment_id: &str) -> Result<Investment>;

    /// All investments of an account, newest first.
    fn list_investments(&self, account_id: &str) -> Result<Vec<Investment>>;

    /// Active investments, of one account or of every account when `None`.
    fn list_active_investments(&self, account_id: Option<&str>) -> Result<Vec<Investment>>;
}

/// Investment operations exposed to the application.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    async fn create_product(&self, new_product: NewInvestmentProduct) -> Result<InvestmentProduct>;

    fn list_products(&self, active_only: bool) -> Result<Vec<InvestmentProduct>>;

    /// Buys one ticket of a product, debiting the account balance.
    async fn open_investment(&self, account_id: &str, product_id: &str) -> Result<Investment>;

    /// An investment owned by `account_id`; `Error::NotFound` otherwise.
    fn get_investment(&self, account_id: &str, investment_id: &str) -> Result<Investment>;

    fn list_investments(&self, account_id: &str) -> Result<Vec<Investment>>;

    fn get_active_investments(&self, account_id: &str) -> Result<Vec<Investment>>;

    /// Live value and claimable profit at the current instant.
    fn compute_current_value(
        &self,
        account_id: &str,
        investment_id: &str,
    ) -> Result<InvestmentValuation>;

    /// Credits accrued-but-unclaimed profit to the account balance.
    async fn claim_profit(&self, account_id: &str, investment_id: &str) -> Result<ClaimReceipt>;

    fn investment_summary(&self, account_id: &str) -> Result<InvestmentSummary>;
}
