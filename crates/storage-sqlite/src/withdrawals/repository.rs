use std::sync::Arc;

use diesel::prelude::*;

use tenorvest_core::withdrawals::{WithdrawalRepositoryTrait, WithdrawalRequest, WithdrawalStatus};
use tenorvest_core::Result;

use super::model::WithdrawalRequestDB;
use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::withdrawal_requests;

pub struct WithdrawalRepository {
    pool: Arc<DbPool>,
}

impl WithdrawalRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

fn into_requests(rows: Vec<WithdrawalRequestDB>) -> Result<Vec<WithdrawalRequest>> {
    rows.into_iter()
        .map(|row| WithdrawalRequest::try_from(row).map_err(Into::into))
        .collect()
}

impl WithdrawalRepositoryTrait for WithdrawalRepository {
    fn get_withdrawal(&self, request_id: &str) -> Result<WithdrawalRequest> {
        let mut conn = get_connection(&self.pool)?;
        let row = withdrawal_requests::table
            .find(request_id)
            .select(WithdrawalRequestDB::as_select())
            .first::<WithdrawalRequestDB>(&mut conn)
            .or_not_found(|| format!("withdrawal request {}", request_id))?;
        WithdrawalRequest::try_from(row).map_err(Into::into)
    }

    fn list_withdrawals(&self, account_id: &str) -> Result<Vec<WithdrawalRequest>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = withdrawal_requests::table
            .filter(withdrawal_requests::account_id.eq(account_id))
            .select(WithdrawalRequestDB::as_select())
            .order((
                withdrawal_requests::created_at.desc(),
                withdrawal_requests::id.desc(),
            ))
            .load::<WithdrawalRequestDB>(&mut conn)
            .into_core()?;
        into_requests(rows)
    }

    fn list_pending_withdrawals(&self) -> Result<Vec<WithdrawalRequest>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = withdrawal_requests::table
            .filter(withdrawal_requests::status.eq(WithdrawalStatus::Pending.as_str()))
            .select(WithdrawalRequestDB::as_select())
            .order(withdrawal_requests::created_at.asc())
            .load::<WithdrawalRequestDB>(&mut conn)
            .into_core()?;
        into_requests(rows)
    }
}
