//! Withdrawals - eligibility buckets and the request state machine.

mod eligibility_calculator;
mod withdrawals_model;
mod withdrawals_service;
mod withdrawals_traits;


pub use eligibility_calculator::calculate_eligibility;
pub use withdrawals_model::*;
pub use withdrawals_service::WithdrawalService;
pub use withdrawals_traits::{WithdrawalRepositoryTrait, WithdrawalServiceTrait};
