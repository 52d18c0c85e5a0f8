//! Withdrawal eligibility figures derived from a ledger account snapshot.

use rust_decimal::Decimal;

use super::withdrawals_model::EligibilityBreakdown;
use crate::accounts::LedgerAccount;

/// Splits an account into the two withdrawal buckets.
///
/// ```text
/// profit_from_invested = max(0, balance - total_invested)
/// available_withdrawal = max(0, balance + profit_from_invested + referral_bonus - escrowed)
/// profit_amount        = max(0, available_withdrawal - referral_bonus)
/// ```
///
/// `balance` appears twice in `available_withdrawal` (directly and through
/// `profit_from_invested`); this matches the figures users have always been
/// shown and is kept as-is.
pub fn calculate_eligibility(account: &LedgerAccount) -> EligibilityBreakdown {
    let zero = Decimal::ZERO;
    let profit_from_invested = (account.balance - account.total_invested).max(zero);
    let available_withdrawal = (account.balance + profit_from_invested + account.referral_bonus
        - account.escrowed_amount)
        .max(zero);
    let profit_amount = (available_withdrawal - account.referral_bonus).max(zero);

    EligibilityBreakdown {
        available_withdrawal,
        profit_amount,
        referral_bonus: account.referral_bonus.max(zero),
        escrowed_amount: account.escrowed_amount,
        pending_withdrawals: account.escrowed_amount,
        total_withdrawn: account.total_withdrawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::withdrawals::WithdrawalSource;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn account(balance: Decimal, invested: Decimal, referral: Decimal, escrow: Decimal) -> LedgerAccount {
        let mut account = LedgerAccount::new("acc-1".to_string(), None, Utc::now());
        account.balance = balance;
        account.total_invested = invested;
        account.referral_bonus = referral;
        account.escrowed_amount = escrow;
        account
    }

    #[test]
    fn balance_below_invested_has_no_invested_profit() {
        let breakdown = calculate_eligibility(&account(dec!(50), dec!(100), dec!(20), dec!(0)));
        assert_eq!(breakdown.available_withdrawal, dec!(70));
        assert_eq!(breakdown.profit_amount, dec!(50));
        assert_eq!(breakdown.referral_bonus, dec!(20));
        assert_eq!(breakdown.bucket(WithdrawalSource::Profit), dec!(50));
        assert_eq!(breakdown.bucket(WithdrawalSource::ReferralBonus), dec!(20));
    }

    #[test]
    fn balance_above_invested_counts_twice() {
        let breakdown = calculate_eligibility(&account(dec!(150), dec!(100), dec!(0), dec!(0)));
        // 150 + (150 - 100) + 0 - 0
        assert_eq!(breakdown.available_withdrawal, dec!(200));
        assert_eq!(breakdown.profit_amount, dec!(200));
    }

    #[test]
    fn escrow_reduces_available() {
        let breakdown = calculate_eligibility(&account(dec!(50), dec!(100), dec!(20), dec!(30)));
        assert_eq!(breakdown.available_withdrawal, dec!(40));
        assert_eq!(breakdown.profit_amount, dec!(20));
        assert_eq!(breakdown.escrowed_amount, dec!(30));
        assert_eq!(breakdown.pending_withdrawals, dec!(30));
    }

    #[test]
    fn never_negative() {
        let breakdown = calculate_eligibility(&account(dec!(0), dec!(100), dec!(5), dec!(80)));
        assert_eq!(breakdown.available_withdrawal, dec!(0));
        assert_eq!(breakdown.profit_amount, dec!(0));
    }

    #[test]
    fn referral_larger_than_available_zeroes_profit() {
        let breakdown = calculate_eligibility(&account(dec!(12), dec!(0), dec!(40), dec!(45)));
        assert_eq!(breakdown.available_withdrawal, dec!(19));
        assert_eq!(breakdown.profit_amount, dec!(0));
    }
}
