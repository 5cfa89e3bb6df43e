use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::InventoryStore;
use crate::error::AppResult;
use crate::models::stats::group_by_category;
use crate::models::*;

const RECORD_COLUMNS: &str =
    "id, barcode_number, stock_quantity, total_value, expiry_date, date_added, add_to_inventory";

/// Store backed by the `inventory` and `products` Postgres tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// An inventory row carrying the columns of the product it joined to.
#[derive(sqlx::FromRow)]
struct CategorizedRow {
    product_id: Uuid,
    category: String,
    #[sqlx(flatten)]
    record: InventoryRecord,
}

impl From<CategorizedRow> for JoinedRecord {
    fn from(row: CategorizedRow) -> Self {
        JoinedRecord {
            product: ProductRecord {
                id: row.product_id,
                barcode_number: row.record.barcode_number.clone(),
                category: row.category,
            },
            record: row.record,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Database connection pool established.");

        info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations complete.");

        Ok(Self::new(pool))
    }
}

fn range_bounds(range: Option<DateRange>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match range {
        Some(r) => (Some(r.from), Some(r.to)),
        None => (None, None),
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn list_inventory(&self) -> AppResult<Vec<InventoryRecord>> {
        let records = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {} FROM inventory ORDER BY date_added ASC, id ASC",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_inventory(&self, id: Uuid) -> AppResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {} FROM inventory WHERE id = $1",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_inventory(&self, record: &InventoryRecord) -> AppResult<InventoryRecord> {
        let stored = sqlx::query_as::<_, InventoryRecord>(&format!(
            r#"
            INSERT INTO inventory ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {cols}
            "#,
            cols = RECORD_COLUMNS
        ))
        .bind(record.id)
        .bind(&record.barcode_number)
        .bind(record.stock_quantity)
        .bind(record.total_value)
        .bind(record.expiry_date)
        .bind(record.date_added)
        .bind(&record.add_to_inventory)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn total_stock(&self) -> AppResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(stock_quantity), 0)::BIGINT FROM inventory")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    async fn total_stock_by_tag(&self) -> AppResult<Vec<TagTotal>> {
        let totals = sqlx::query_as::<_, TagTotal>(
            r#"
            SELECT add_to_inventory, SUM(stock_quantity)::BIGINT AS total_inventory
            FROM inventory
            GROUP BY add_to_inventory
            ORDER BY add_to_inventory
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    async fn total_value(&self) -> AppResult<f64> {
        let total: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_value), 0)::DOUBLE PRECISION FROM inventory",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn expired_stock(&self, window: ExpiryWindow) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(stock_quantity), 0)::BIGINT
            FROM inventory
            WHERE expiry_date <= $1
              AND stock_quantity > 0
            "#,
        )
        .bind(window.today)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn nearly_expired_stock(&self, window: ExpiryWindow) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(stock_quantity), 0)::BIGINT
            FROM inventory
            WHERE expiry_date > $1
              AND expiry_date <= $2
              AND stock_quantity > 0
            "#,
        )
        .bind(window.today)
        .bind(window.horizon)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn stock_by_category(&self, range: Option<DateRange>) -> AppResult<Vec<CategoryStock>> {
        let (from, to) = range_bounds(range);

        let groups = sqlx::query_as::<_, CategoryStock>(
            r#"
            SELECT p.category AS category,
                   SUM(i.stock_quantity)::BIGINT AS total_stock_quantity
            FROM inventory i
            JOIN products p ON p.barcode_number = i.barcode_number
            WHERE ($1::timestamptz IS NULL OR (i.date_added >= $1 AND i.date_added <= $2))
            GROUP BY p.category
            ORDER BY p.category
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn stock_by_category_with_data(
        &self,
        range: Option<DateRange>,
    ) -> AppResult<Vec<CategoryStockWithData>> {
        let (from, to) = range_bounds(range);

        let rows = sqlx::query_as::<_, CategorizedRow>(
            r#"
            SELECT p.id AS product_id, p.category AS category,
                   i.id, i.barcode_number, i.stock_quantity, i.total_value,
                   i.expiry_date, i.date_added, i.add_to_inventory
            FROM inventory i
            JOIN products p ON p.barcode_number = i.barcode_number
            WHERE ($1::timestamptz IS NULL OR (i.date_added >= $1 AND i.date_added <= $2))
            ORDER BY p.category, i.date_added, i.id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_by_category(rows.into_iter().map(JoinedRecord::from)))
    }
}
