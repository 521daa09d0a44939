//! SQLite ledger implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SelectStatement, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use super::schema::{Tips, CREATE_TIPS_TABLE, CREATE_TIPS_WORKER_INDEX};
use super::{LedgerStore, Result, StorageError};
use crate::policy::DistributionSplit;
use crate::tip::{ConfirmedTip, PaymentType, PendingEntry};

/// SQLite implementation of the ledger.
pub struct SqliteLedgerStore {
    pool: SqlitePool,
}

impl SqliteLedgerStore {
    /// Create a new SQLite ledger store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_TIPS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_TIPS_WORKER_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert one entry within an already-started transaction.
    async fn insert_tip(
        conn: &mut SqliteConnection,
        entry: PendingEntry,
        correlation_id: &str,
    ) -> Result<ConfirmedTip> {
        let next_id = {
            let query = Query::select()
                .expr(Expr::col(Tips::Id).max())
                .from(Tips::Table)
                .to_string(SqliteQueryBuilder);

            let row = sqlx::query(&query).fetch_optional(&mut *conn).await?;

            match row {
                Some(row) => {
                    let max_id: Option<i64> = row.get(0);
                    max_id.map(|id| id + 1).unwrap_or(1)
                }
                None => 1,
            }
        };

        let split = entry.applied_split();
        let draft = *entry.draft();

        let query = Query::insert()
            .into_table(Tips::Table)
            .columns([
                Tips::Id,
                Tips::WorkerId,
                Tips::Amount,
                Tips::PaymentType,
                Tips::TableNumber,
                Tips::RecordedAt,
                Tips::ServicePct,
                Tips::KitchenPct,
                Tips::BarPct,
                Tips::CorrelationId,
            ])
            .values_panic([
                next_id.into(),
                entry.worker_id().into(),
                // Drafts are built from a positive i64
                (draft.amount() as i64).into(),
                draft.payment_type().as_str().into(),
                i64::from(draft.table()).into(),
                entry.recorded_at().to_rfc3339().into(),
                i64::from(split.service()).into(),
                i64::from(split.kitchen()).into(),
                i64::from(split.bar()).into(),
                correlation_id.into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&mut *conn).await?;

        Ok(entry.into_confirmed(next_id as u64))
    }

    fn select_tips() -> SelectStatement {
        Query::select()
            .columns([
                Tips::Id,
                Tips::WorkerId,
                Tips::Amount,
                Tips::PaymentType,
                Tips::TableNumber,
                Tips::RecordedAt,
                Tips::ServicePct,
                Tips::KitchenPct,
                Tips::BarPct,
            ])
            .from(Tips::Table)
            .order_by(Tips::Id, Order::Asc)
            .to_owned()
    }

    async fn fetch_tips(&self, query: &str) -> Result<Vec<ConfirmedTip>> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_tip).collect()
    }
}

/// Decode a row, refusing anything that violates the ledger invariants.
fn row_to_tip(row: &SqliteRow) -> Result<ConfirmedTip> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |reason: String| StorageError::Corrupt { id, reason };

    let worker_id: String = row.try_get("worker_id")?;
    let amount: i64 = row.try_get("amount")?;
    let payment_type: String = row.try_get("payment_type")?;
    let table: i64 = row.try_get("table_number")?;
    let recorded_at: String = row.try_get("recorded_at")?;
    let service: i64 = row.try_get("service_pct")?;
    let kitchen: i64 = row.try_get("kitchen_pct")?;
    let bar: i64 = row.try_get("bar_pct")?;

    let tip_id = u64::try_from(id).map_err(|_| corrupt(format!("negative id {id}")))?;
    let amount = u64::try_from(amount)
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| corrupt(format!("non-positive amount {amount}")))?;
    let payment_type = PaymentType::parse(&payment_type)
        .ok_or_else(|| corrupt(format!("unknown payment type '{payment_type}'")))?;
    let table = u32::try_from(table)
        .ok()
        .filter(|t| *t > 0)
        .ok_or_else(|| corrupt(format!("invalid table number {table}")))?;
    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
        .map_err(|e| corrupt(format!("invalid timestamp '{recorded_at}': {e}")))?
        .with_timezone(&Utc);
    let applied_split = DistributionSplit::new(service, kitchen, bar)
        .map_err(|e| corrupt(format!("invalid applied split: {e}")))?;

    Ok(ConfirmedTip::restore(
        tip_id,
        worker_id,
        amount,
        payment_type,
        table,
        recorded_at,
        applied_split,
    ))
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn append(&self, entry: PendingEntry, correlation_id: &str) -> Result<ConfirmedTip> {
        // BEGIN IMMEDIATE takes the write lock upfront so concurrent appends
        // cannot read the same max id.
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = match Self::insert_tip(&mut conn, entry, correlation_id).await {
            Ok(tip) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| tip)
                .map_err(StorageError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(tip) => {
                debug!(tip_id = tip.id(), correlation_id, "Appended tip to SQLite ledger");
                Ok(tip)
            }
            Err(e) => {
                // The connection goes back to the pool, so it must not keep
                // the transaction open whether the insert or the commit failed.
                if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    warn!(error = %rollback, correlation_id, "Rollback after failed append failed");
                }
                Err(e)
            }
        }
    }

    async fn entries(&self) -> Result<Vec<ConfirmedTip>> {
        let query = Self::select_tips().to_string(SqliteQueryBuilder);
        self.fetch_tips(&query).await
    }

    async fn entries_for_worker(&self, worker_id: &str) -> Result<Vec<ConfirmedTip>> {
        let query = Self::select_tips()
            .and_where(Expr::col(Tips::WorkerId).eq(worker_id))
            .to_string(SqliteQueryBuilder);
        self.fetch_tips(&query).await
    }

    async fn get_by_correlation(&self, correlation_id: &str) -> Result<Option<ConfirmedTip>> {
        let query = Self::select_tips()
            .and_where(Expr::col(Tips::CorrelationId).eq(correlation_id))
            .limit(1)
            .to_string(SqliteQueryBuilder);
        Ok(self.fetch_tips(&query).await?.into_iter().next())
    }

    async fn len(&self) -> Result<usize> {
        let query = Query::select()
            .expr(Expr::col(Tips::Id).count())
            .from(Tips::Table)
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let count: i64 = row.get(0);
        Ok(count as usize)
    }
}
