#[cfg(test)]
mod tests {
    use crate::errors::{Error, FundsSource, StateTransitionError};
    use crate::investments::{
        AccrualServiceTrait, InvestmentServiceTrait, InvestmentStatus, NewInvestmentProduct,
    };
    use crate::test_support::{t0, Fixture};
    use crate::transactions::TransactionType;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn funded_fixture() -> Fixture {
        let fx = Fixture::new();
        fx.seed_account("alice", dec!(500), dec!(0), dec!(0));
        fx.seed_product("starter", dec!(100), dec!(10), 30);
        fx
    }

    #[tokio::test]
    async fn open_investment_debits_ticket_and_snapshots_terms() {
        let fx = funded_fixture();
        let investment = fx
            .investments()
            .open_investment("alice", "starter")
            .await
            .unwrap();

        assert_eq!(investment.principal, dec!(100));
        assert_eq!(investment.final_value_cap, dec!(200));
        assert_eq!(investment.end_date, t0() + Duration::days(30));
        assert_eq!(investment.current_value, dec!(110));
        assert_eq!(investment.status, InvestmentStatus::Active);

        let account = fx.store.account("alice");
        assert_eq!(account.balance, dec!(400));
        assert_eq!(account.total_invested, dec!(100));

        let txs = fx.store.transactions_of("alice");
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].transaction_type, TransactionType::Investment);
        assert_eq!(txs[0].amount, dec!(-100));
    }

    #[tokio::test]
    async fn open_investment_without_funds_changes_nothing() {
        let fx = Fixture::new();
        fx.seed_account("alice", dec!(60), dec!(0), dec!(0));
        fx.seed_product("starter", dec!(100), dec!(10), 30);

        let err = fx
            .investments()
            .open_investment("alice", "starter")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientFunds {
                bucket: FundsSource::Balance,
                ..
            }
        ));
        assert_eq!(fx.store.account("alice").balance, dec!(60));
        assert_eq!(fx.store.commit_count(), 0);
    }

    #[tokio::test]
    async fn create_product_validates_terms() {
        let fx = Fixture::new();
        let service = fx.investments();
        let bad_rate = NewInvestmentProduct {
            id: None,
            name: "Zero".to_string(),
            ticket_size: dec!(100),
            daily_growth_rate: dec!(0),
            duration_days: 10,
            is_active: true,
        };
        assert!(matches!(
            service.create_product(bad_rate).await,
            Err(Error::Validation(_))
        ));

        let product = service
            .create_product(NewInvestmentProduct {
                id: Some("gold".to_string()),
                name: " Gold ".to_string(),
                ticket_size: dec!(1000),
                daily_growth_rate: dec!(1.5),
                duration_days: 90,
                is_active: true,
            })
            .await
            .unwrap();
        assert_eq!(product.name, "Gold");
        assert_eq!(service.list_products(true).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn overlong_term_is_refused() {
        let fx = funded_fixture();
        let err = fx
            .investments()
            .create_product(NewInvestmentProduct {
                id: Some("forever".to_string()),
                name: "Forever".to_string(),
                ticket_size: dec!(100),
                daily_growth_rate: dec!(1),
                duration_days: 1_000_000_000_000,
                is_active: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // A row that slipped past validation still cannot be bought.
        fx.seed_product("legacy", dec!(100), dec!(1), i64::MAX);
        let err = fx
            .investments()
            .open_investment("alice", "legacy")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(fx.store.account("alice").balance, dec!(500));
        assert_eq!(fx.store.commit_count(), 0);
    }

    #[tokio::test]
    async fn inactive_product_cannot_be_bought() {
        let fx = funded_fixture();
        let mut product = fx.seed_product("retired", dec!(100), dec!(5), 30);
        product.is_active = false;
        fx.store.put_product(product);

        let err = fx
            .investments()
            .open_investment("alice", "retired")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn claim_credits_accrued_profit() {
        let fx = funded_fixture();
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        fx.clock.advance(Duration::days(5));

        let receipt = fx.investments().claim_profit("alice", "inv-1").await.unwrap();
        assert_eq!(receipt.claimed_amount, dec!(50));
        assert_eq!(receipt.new_balance, dec!(550));

        let investment = fx.store.investment("inv-1");
        assert_eq!(investment.claimed_profit, dec!(50));
        assert_eq!(investment.current_value, dec!(150));
        assert_eq!(investment.last_profit_claim_date, t0() + Duration::days(5));

        let returns: Vec<_> = fx
            .store
            .transactions_of("alice")
            .into_iter()
            .filter(|t| t.transaction_type == TransactionType::Return)
            .collect();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].amount, dec!(50));
        assert_eq!(returns[0].reference.as_deref(), Some("inv-1"));
    }

    #[tokio::test]
    async fn second_claim_at_same_instant_has_nothing() {
        let fx = funded_fixture();
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        fx.clock.advance(Duration::days(3));
        let service = fx.investments();

        service.claim_profit("alice", "inv-1").await.unwrap();
        let err = service.claim_profit("alice", "inv-1").await.unwrap_err();
        assert!(matches!(err, Error::NothingToClaim { .. }));
        assert_eq!(fx.store.account("alice").balance, dec!(530));
    }

    #[tokio::test]
    async fn concurrent_claims_pay_out_once() {
        let fx = funded_fixture();
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        fx.clock.advance(Duration::days(4));
        let service = fx.investments();

        let (first, second) = futures::join!(
            service.claim_profit("alice", "inv-1"),
            service.claim_profit("alice", "inv-1")
        );

        let outcomes = [first, second];
        let paid: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].claimed_amount, dec!(40));
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(Error::NothingToClaim { .. }))));

        assert_eq!(fx.store.account("alice").balance, dec!(540));
        assert_eq!(fx.store.investment("inv-1").claimed_profit, dec!(40));
    }

    #[tokio::test]
    async fn claim_on_completed_investment_is_settled() {
        let fx = funded_fixture();
        let mut investment = fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        investment.status = InvestmentStatus::Completed;
        fx.store.put_investment(investment);

        let err = fx
            .investments()
            .claim_profit("alice", "inv-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidStateTransition(StateTransitionError::AlreadySettled { .. })
        ));
    }

    #[tokio::test]
    async fn completed_investment_values_at_settlement() {
        let fx = funded_fixture();
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(1), 10);
        fx.accrual()
            .run_accrual_at(t0() + Duration::days(10))
            .await
            .unwrap();
        assert_eq!(fx.store.investment("inv-1").status, InvestmentStatus::Completed);

        fx.clock.advance(Duration::days(25));
        let valuation = fx
            .investments()
            .compute_current_value("alice", "inv-1")
            .unwrap();
        assert_eq!(valuation.current_value, dec!(110));
        assert_eq!(valuation.claimable_profit, Decimal::ZERO);
        assert!(valuation.is_matured);
    }

    #[tokio::test]
    async fn other_accounts_investment_is_not_found() {
        let fx = funded_fixture();
        fx.seed_account("mallory", dec!(0), dec!(0), dec!(0));
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        fx.clock.advance(Duration::days(2));

        let err = fx
            .investments()
            .claim_profit("mallory", "inv-1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(fx.store.account("alice").balance, dec!(500));
    }

    #[tokio::test]
    async fn valuation_does_not_persist() {
        let fx = funded_fixture();
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        fx.clock.advance(Duration::days(9));

        let valuation = fx
            .investments()
            .compute_current_value("alice", "inv-1")
            .unwrap();
        assert_eq!(valuation.current_value, dec!(190));
        assert_eq!(valuation.claimable_profit, dec!(90));
        assert_eq!(valuation.days_elapsed, 9);
        assert!(!valuation.is_matured);
        assert_eq!(fx.store.investment("inv-1").current_value, dec!(100));
    }

    #[tokio::test]
    async fn summary_totals_active_investments() {
        let fx = funded_fixture();
        fx.seed_investment("inv-1", "alice", dec!(100), dec!(10), 30);
        fx.seed_investment("inv-2", "alice", dec!(200), dec!(1), 30);
        let mut done = fx.seed_investment("inv-3", "alice", dec!(50), dec!(1), 30);
        done.status = InvestmentStatus::Completed;
        fx.store.put_investment(done);
        fx.clock.advance(Duration::days(2));

        let summary = fx.investments().investment_summary("alice").unwrap();
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.active_principal, dec!(300));
        // 120 + 204
        assert_eq!(summary.current_value, dec!(324));
        assert_eq!(summary.claimable_profit, dec!(24));
        assert_eq!(
            fx.investments().get_active_investments("alice").unwrap().len(),
            2
        );
        assert!(summary.claimable_profit > Decimal::ZERO);
    }
}
