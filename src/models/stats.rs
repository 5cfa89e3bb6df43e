use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{InventoryRecord, ProductRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalInventory {
    pub total_inventory: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TagTotal {
    pub add_to_inventory: String,
    pub total_inventory: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalInventoryValue {
    pub total_inventory_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredCount {
    pub total_expired_products: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearlyExpiredCount {
    pub total_nearly_expired_products: i64,
}

/// Stock summed per product category; the category is keyed as `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStock {
    #[serde(rename = "_id")]
    pub category: String,
    pub total_stock_quantity: i64,
}

/// An inventory record alongside the product it joined to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub product: ProductRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStockWithData {
    #[serde(rename = "_id")]
    pub category: String,
    pub total_stock_quantity: i64,
    pub data: Vec<JoinedRecord>,
}

/// Groups joined rows by their product's category, summing stock per group.
///
/// Output is ordered by category; records keep their input order within a group.
pub fn group_by_category<I>(rows: I) -> Vec<CategoryStockWithData>
where
    I: IntoIterator<Item = JoinedRecord>,
{
    let mut groups: BTreeMap<String, CategoryStockWithData> = BTreeMap::new();

    for joined in rows {
        let group = groups
            .entry(joined.product.category.clone())
            .or_insert_with_key(|category| CategoryStockWithData {
                category: category.clone(),
                total_stock_quantity: 0,
                data: Vec::new(),
            });
        group.total_stock_quantity += joined.record.stock_quantity;
        group.data.push(joined);
    }

    groups.into_values().collect()
}
