use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::db::{InventoryStore, MemoryStore};
use crate::error::AppResult;
use crate::models::{InventoryRecord, ProductRecord};

static CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Food & Beverage",
    "Home & Garden",
    "Toys & Games",
    "Sports & Outdoors",
    "Books",
    "Automotive",
    "Health & Beauty",
    "Office Supplies",
    "Pet Supplies",
    "Baby Products",
];

static TAGS: &[&str] = &["purchase", "return", "transfer", "adjustment", "donation"];

/// Products to generate per seeded inventory record.
const PRODUCT_RATIO: usize = 4;

/// 13-digit EAN-style barcode derived from a serial.
fn barcode(serial: usize) -> String {
    format!("400{:010}", serial)
}

/// Seeds demo products and `count` inventory records into the memory store.
///
/// A handful of inventory barcodes deliberately match no product so the
/// category reports have something to drop.
pub async fn seed_demo_data(
    store: &MemoryStore,
    count: usize,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> AppResult<usize> {
    info!("Seeding {} inventory records...", count);

    let product_count = (count / PRODUCT_RATIO).max(1);
    for serial in 0..product_count {
        let category = CATEGORIES.choose(rng).unwrap_or(&"Books");
        store
            .insert_product(ProductRecord::new(barcode(serial), *category))
            .await;
    }

    for _ in 0..count {
        // One in ten records points at a barcode with no product.
        let serial = if rng.gen_bool(0.1) {
            product_count + rng.gen_range(0..1_000)
        } else {
            rng.gen_range(0..product_count)
        };
        let quantity: i64 = rng.gen_range(0..=250);
        let unit_cents: i64 = rng.gen_range(49..=9_999);

        let record = InventoryRecord {
            id: Uuid::new_v4(),
            barcode_number: barcode(serial),
            stock_quantity: quantity,
            total_value: (quantity * unit_cents) as f64 / 100.0,
            expiry_date: now + Duration::days(rng.gen_range(-60..=60)),
            date_added: now - Duration::days(rng.gen_range(0..=90)),
            add_to_inventory: TAGS.choose(rng).unwrap_or(&"purchase").to_string(),
        };
        store.insert_inventory(&record).await?;
    }

    info!(
        products = store.product_count().await,
        inventory = count,
        "Seeding complete"
    );
    Ok(count)
}
