//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Tips table schema.
///
/// The applied split is stored column-per-role so a restart restores the
/// exact percentages each tip was confirmed with.
#[derive(Iden)]
pub enum Tips {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "worker_id"]
    WorkerId,
    #[iden = "amount"]
    Amount,
    #[iden = "payment_type"]
    PaymentType,
    #[iden = "table_number"]
    TableNumber,
    #[iden = "recorded_at"]
    RecordedAt,
    #[iden = "service_pct"]
    ServicePct,
    #[iden = "kitchen_pct"]
    KitchenPct,
    #[iden = "bar_pct"]
    BarPct,
    #[iden = "correlation_id"]
    CorrelationId,
}

/// SQL for creating the tips table.
pub const CREATE_TIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tips (
    id INTEGER PRIMARY KEY,
    worker_id TEXT NOT NULL,
    amount INTEGER NOT NULL,
    payment_type TEXT NOT NULL,
    table_number INTEGER NOT NULL,
    recorded_at TEXT NOT NULL,
    service_pct INTEGER NOT NULL,
    kitchen_pct INTEGER NOT NULL,
    bar_pct INTEGER NOT NULL,
    correlation_id TEXT NOT NULL
)
"#;

/// SQL for the per-worker lookup index.
pub const CREATE_TIPS_WORKER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tips_worker_id ON tips(worker_id)";
