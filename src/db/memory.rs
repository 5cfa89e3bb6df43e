use std::collections::BTreeMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::InventoryStore;
use crate::error::AppResult;
use crate::models::stats::group_by_category;
use crate::models::*;

/// In-process store. Aggregations run as folds over the materialized
/// collections, mirroring what the SQL backend pushes down to Postgres.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Keyed by id, iterated in insertion order.
    inventory: RwLock<IndexMap<Uuid, InventoryRecord>>,
    products: RwLock<Vec<ProductRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Products are read-only through the service; this is the seeding hook.
    pub async fn insert_product(&self, product: ProductRecord) {
        self.products.write().await.push(product);
    }

    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    /// Inner join: each record appears once per product sharing its barcode.
    async fn joined(&self, range: Option<DateRange>) -> Vec<JoinedRecord> {
        let inventory = self.inventory.read().await;
        let products = self.products.read().await;

        inventory
            .values()
            .filter(|r| range.map_or(true, |range| range.contains(r.date_added)))
            .flat_map(|r| {
                products
                    .iter()
                    .filter(move |p| p.barcode_number == r.barcode_number)
                    .map(move |p| JoinedRecord {
                        record: r.clone(),
                        product: p.clone(),
                    })
            })
            .collect()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_inventory(&self) -> AppResult<Vec<InventoryRecord>> {
        Ok(self.inventory.read().await.values().cloned().collect())
    }

    async fn find_inventory(&self, id: Uuid) -> AppResult<Option<InventoryRecord>> {
        Ok(self.inventory.read().await.get(&id).cloned())
    }

    async fn insert_inventory(&self, record: &InventoryRecord) -> AppResult<InventoryRecord> {
        self.inventory
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn total_stock(&self) -> AppResult<i64> {
        Ok(self
            .inventory
            .read()
            .await
            .values()
            .map(|r| r.stock_quantity)
            .sum())
    }

    async fn total_stock_by_tag(&self) -> AppResult<Vec<TagTotal>> {
        let inventory = self.inventory.read().await;
        let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
        for r in inventory.values() {
            *totals.entry(r.add_to_inventory.as_str()).or_default() += r.stock_quantity;
        }

        Ok(totals
            .into_iter()
            .map(|(tag, total)| TagTotal {
                add_to_inventory: tag.to_string(),
                total_inventory: total,
            })
            .collect())
    }

    async fn total_value(&self) -> AppResult<f64> {
        Ok(self
            .inventory
            .read()
            .await
            .values()
            .fold(0.0, |acc, r| acc + r.total_value))
    }

    async fn expired_stock(&self, window: ExpiryWindow) -> AppResult<i64> {
        Ok(self
            .inventory
            .read()
            .await
            .values()
            .filter(|r| r.stock_quantity > 0 && window.is_expired(r.expiry_date))
            .map(|r| r.stock_quantity)
            .sum())
    }

    async fn nearly_expired_stock(&self, window: ExpiryWindow) -> AppResult<i64> {
        Ok(self
            .inventory
            .read()
            .await
            .values()
            .filter(|r| r.stock_quantity > 0 && window.is_nearly_expired(r.expiry_date))
            .map(|r| r.stock_quantity)
            .sum())
    }

    async fn stock_by_category(&self, range: Option<DateRange>) -> AppResult<Vec<CategoryStock>> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for joined in self.joined(range).await {
            *totals.entry(joined.product.category).or_default() += joined.record.stock_quantity;
        }

        Ok(totals
            .into_iter()
            .map(|(category, total)| CategoryStock {
                category,
                total_stock_quantity: total,
            })
            .collect())
    }

    async fn stock_by_category_with_data(
        &self,
        range: Option<DateRange>,
    ) -> AppResult<Vec<CategoryStockWithData>> {
        Ok(group_by_category(self.joined(range).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dates::{parse_date, start_of_day};
    use chrono::{DateTime, Duration, Utc};

    fn record(barcode: &str, qty: i64, expiry: DateTime<Utc>, added: &str) -> InventoryRecord {
        InventoryRecord {
            id: Uuid::new_v4(),
            barcode_number: barcode.to_string(),
            stock_quantity: qty,
            total_value: qty as f64 * 1.5,
            expiry_date: expiry,
            date_added: parse_date(added).unwrap(),
            add_to_inventory: "purchase".to_string(),
        }
    }

    fn far_future() -> DateTime<Utc> {
        parse_date("2099-01-01").unwrap()
    }

    async fn store_with(records: Vec<InventoryRecord>) -> MemoryStore {
        let store = MemoryStore::new();
        for r in &records {
            store.insert_inventory(r).await.unwrap();
        }
        store
    }

    // ── Records ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_preserves_insertion_order_and_find_by_id() {
        let a = record("A", 1, far_future(), "2024-01-01");
        let b = record("B", 2, far_future(), "2024-01-02");
        let store = store_with(vec![b.clone(), a.clone()]).await;

        let listed = store.list_inventory().await.unwrap();
        assert_eq!(listed, vec![b, a.clone()]);
        assert_eq!(store.find_inventory(a.id).await.unwrap(), Some(a));
        assert_eq!(store.find_inventory(Uuid::new_v4()).await.unwrap(), None);
    }

    // ── Totals ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn totals_sum_all_records() {
        let store = store_with(vec![
            record("A", 3, far_future(), "2024-01-01"),
            record("B", 5, far_future(), "2024-01-01"),
            record("C", 7, far_future(), "2024-01-01"),
        ])
        .await;

        assert_eq!(store.total_stock().await.unwrap(), 15);
        assert!((store.total_value().await.unwrap() - 22.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_store_totals_are_zero() {
        let store = MemoryStore::new();
        let window = ExpiryWindow::starting(Utc::now());

        assert_eq!(store.total_stock().await.unwrap(), 0);
        assert_eq!(store.total_value().await.unwrap(), 0.0);
        assert_eq!(store.expired_stock(window).await.unwrap(), 0);
        assert_eq!(store.nearly_expired_stock(window).await.unwrap(), 0);
        assert!(store.total_stock_by_tag().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn totals_by_tag_group_and_sort() {
        let mut returned = record("A", 4, far_future(), "2024-01-01");
        returned.add_to_inventory = "return".to_string();
        let store = store_with(vec![
            record("A", 3, far_future(), "2024-01-01"),
            returned,
            record("B", 6, far_future(), "2024-01-01"),
        ])
        .await;

        assert_eq!(
            store.total_stock_by_tag().await.unwrap(),
            vec![
                TagTotal { add_to_inventory: "purchase".into(), total_inventory: 9 },
                TagTotal { add_to_inventory: "return".into(), total_inventory: 4 },
            ]
        );
    }

    // ── Expiry ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn expiry_counts_split_at_start_of_today() {
        let now = parse_date("2024-05-10T14:00:00Z").unwrap();
        let today = start_of_day(now);
        let window = ExpiryWindow::starting(now);

        let store = store_with(vec![
            record("A", 4, today - Duration::days(1), "2024-01-01"),
            record("B", 2, today, "2024-01-01"),
            record("C", 9, today + Duration::days(1), "2024-01-01"),
            record("D", 8, today + Duration::days(30), "2024-01-01"),
            record("E", 100, today + Duration::days(31), "2024-01-01"),
            record("F", 0, today - Duration::days(3), "2024-01-01"),
        ])
        .await;

        assert_eq!(store.expired_stock(window).await.unwrap(), 6);
        assert_eq!(store.nearly_expired_stock(window).await.unwrap(), 17);
    }

    // ── Categories ─────────────────────────────────────────────────────────────

    async fn category_fixture() -> MemoryStore {
        let store = store_with(vec![
            record("A", 10, far_future(), "2024-01-05"),
            record("B", 5, far_future(), "2024-02-05"),
            record("ORPHAN", 99, far_future(), "2024-01-05"),
        ])
        .await;
        store.insert_product(ProductRecord::new("A", "food")).await;
        store.insert_product(ProductRecord::new("B", "electronics")).await;
        store
    }

    #[tokio::test]
    async fn stock_by_category_inner_joins_on_barcode() {
        let store = category_fixture().await;

        assert_eq!(
            store.stock_by_category(None).await.unwrap(),
            vec![
                CategoryStock { category: "electronics".into(), total_stock_quantity: 5 },
                CategoryStock { category: "food".into(), total_stock_quantity: 10 },
            ]
        );
    }

    #[tokio::test]
    async fn stock_by_category_honours_date_range() {
        let store = category_fixture().await;
        let range = DateRange {
            from: parse_date("2024-01-01").unwrap(),
            to: parse_date("2024-01-31").unwrap(),
        };

        assert_eq!(
            store.stock_by_category(Some(range)).await.unwrap(),
            vec![CategoryStock { category: "food".into(), total_stock_quantity: 10 }]
        );
    }

    #[tokio::test]
    async fn duplicate_products_count_a_record_once_per_match() {
        let store = category_fixture().await;
        store.insert_product(ProductRecord::new("A", "snacks")).await;

        let groups = store.stock_by_category_with_data(None).await.unwrap();
        let categories: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["electronics", "food", "snacks"]);
        assert_eq!(groups[2].data[0].record.barcode_number, "A");
        assert_eq!(groups[2].data[0].product.category, "snacks");
        assert_eq!(store.product_count().await, 3);
    }
}
