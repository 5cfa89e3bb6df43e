use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dates::{deserialize_date, deserialize_optional_date, parse_date};
use crate::error::{AppError, AppResult};

/// One unit of tracked stock. Links to a product through `barcode_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub barcode_number: String,
    pub stock_quantity: i64,
    pub total_value: f64,
    pub expiry_date: DateTime<Utc>,
    pub date_added: DateTime<Utc>,
    /// Why or how the stock was added (e.g. "purchase", "return").
    pub add_to_inventory: String,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventory {
    pub barcode_number: String,
    pub stock_quantity: u32,
    pub total_value: f64,
    #[serde(deserialize_with = "deserialize_date")]
    pub expiry_date: DateTime<Utc>,
    /// Defaults to the time of creation.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_added: Option<DateTime<Utc>>,
    pub add_to_inventory: String,
}

impl CreateInventory {
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> InventoryRecord {
        InventoryRecord {
            id,
            barcode_number: self.barcode_number,
            stock_quantity: i64::from(self.stock_quantity),
            total_value: self.total_value,
            expiry_date: self.expiry_date,
            date_added: self.date_added.unwrap_or(now),
            add_to_inventory: self.add_to_inventory,
        }
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Inclusive `date_added` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at <= self.to
    }
}

impl DateRangeParams {
    /// The filter only applies when both bounds are given; a lone bound is ignored.
    pub fn into_range(self) -> AppResult<Option<DateRange>> {
        let from = self.from_date.filter(|s| !s.trim().is_empty());
        let to = self.to_date.filter(|s| !s.trim().is_empty());

        let (Some(from), Some(to)) = (from, to) else {
            return Ok(None);
        };

        let parse = |name: &str, raw: &str| {
            parse_date(raw)
                .ok_or_else(|| AppError::BadRequest(format!("{} `{}` is not a valid date", name, raw)))
        };

        Ok(Some(DateRange {
            from: parse("fromDate", &from)?,
            to: parse("toDate", &to)?,
        }))
    }
}
