use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalogue entry owned by another service; this one only joins against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub barcode_number: String,
    pub category: String,
}

impl ProductRecord {
    pub fn new(barcode_number: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode_number: barcode_number.into(),
            category: category.into(),
        }
    }
}
