mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::*;

/// Everything the HTTP layer asks of the backing store. Each method is a
/// single round trip.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // ── Records ───────────────────────────────────────────────────────────────

    async fn list_inventory(&self) -> AppResult<Vec<InventoryRecord>>;

    async fn find_inventory(&self, id: Uuid) -> AppResult<Option<InventoryRecord>>;

    /// Persists `record` as given (the caller generates its id) and returns
    /// what was stored.
    async fn insert_inventory(&self, record: &InventoryRecord) -> AppResult<InventoryRecord>;

    // ── Totals ────────────────────────────────────────────────────────────────

    /// Sum of `stock_quantity`; 0 for an empty collection.
    async fn total_stock(&self) -> AppResult<i64>;

    /// One row per distinct `add_to_inventory` tag, ordered by tag.
    async fn total_stock_by_tag(&self) -> AppResult<Vec<TagTotal>>;

    /// Sum of `total_value`; 0 for an empty collection.
    async fn total_value(&self) -> AppResult<f64>;

    // ── Expiry ────────────────────────────────────────────────────────────────

    async fn expired_stock(&self, window: ExpiryWindow) -> AppResult<i64>;

    async fn nearly_expired_stock(&self, window: ExpiryWindow) -> AppResult<i64>;

    // ── Category breakdowns (inner join on barcode) ───────────────────────────

    async fn stock_by_category(&self, range: Option<DateRange>) -> AppResult<Vec<CategoryStock>>;

    async fn stock_by_category_with_data(
        &self,
        range: Option<DateRange>,
    ) -> AppResult<Vec<CategoryStockWithData>>;
}
