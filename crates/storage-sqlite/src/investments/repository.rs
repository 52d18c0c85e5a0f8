use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use tenorvest_core::investments::{
    Investment, InvestmentProduct, InvestmentRepositoryTrait, InvestmentStatus,
};
use tenorvest_core::Result;

use super::model::{InvestmentDB, ProductDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound, StorageError};
use crate::schema::{investments, products};

pub struct InvestmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn into_investments(rows: Vec<InvestmentDB>) -> Result<Vec<Investment>> {
    rows.into_iter()
        .map(|row| Investment::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    fn get_product(&self, product_id: &str) -> Result<InvestmentProduct> {
        let mut conn = get_connection(&self.pool)?;
        let row = products::table
            .find(product_id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .or_not_found(|| format!("product {}", product_id))?;
        InvestmentProduct::try_from(row).map_err(Into::into)
    }

    fn list_products(&self, active_only: bool) -> Result<Vec<InvestmentProduct>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = products::table.into_boxed();
        if active_only {
            query = query.filter(products::is_active.eq(true));
        }
        let rows = query
            .select(ProductDB::as_select())
            .order(products::name.asc())
            .load::<ProductDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| InvestmentProduct::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn insert_product(&self, product: InvestmentProduct) -> Result<InvestmentProduct> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<InvestmentProduct> {
                let row = ProductDB::from(&product);
                diesel::insert_into(products::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(product)
            })
            .await
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        let mut conn = get_connection(&self.pool)?;
        let row = investments::table
            .find(investment_id)
            .select(InvestmentDB::as_select())
            .first::<InvestmentDB>(&mut conn)
            .or_not_found(|| format!("investment {}", investment_id))?;
        Investment::try_from(row).map_err(Into::into)
    }

    fn list_investments(&self, account_id: &str) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = investments::table
            .filter(investments::account_id.eq(account_id))
            .select(InvestmentDB::as_select())
            .order((investments::start_date.desc(), investments::id.asc()))
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;
        into_investments(rows)
    }

    fn list_active_investments(&self, account_id: Option<&str>) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = investments::table
            .filter(investments::status.eq(InvestmentStatus::Active.as_str()))
            .into_boxed();
        if let Some(account) = account_id {
            query = query.filter(investments::account_id.eq(account));
        }
        let rows = query
            .select(InvestmentDB::as_select())
            .order(investments::id.asc())
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;
        into_investments(rows)
    }
}
