use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::Payload;
use crate::{
    error::{AppError, AppResult},
    models::{CreateInventory, InventoryRecord},
    AppState,
};

pub const INVENTORY_PATH: &str = "/api/v1/inventory";

// ── List / Get ────────────────────────────────────────────────────────────────

/// Serves both `/inventory` (every record) and `/inventory/:id` (one record).
pub async fn get_inventory(
    State(state): State<AppState>,
    id: Option<Path<String>>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();

    let Some(Path(raw_id)) = id else {
        let records = state.store.list_inventory().await?;
        info!(
            count = records.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Listed inventory"
        );
        return Ok((StatusCode::OK, Json(serde_json::json!(records))));
    };

    // Nothing is stored under an id that isn't a UUID.
    let not_found = || AppError::NotFound(format!("Inventory {} not found", raw_id));
    let id = Uuid::parse_str(&raw_id).map_err(|_| not_found())?;

    let record = state.store.find_inventory(id).await?.ok_or_else(not_found)?;

    info!(id = %id, elapsed_ms = start.elapsed().as_millis(), "Fetched inventory");

    Ok((StatusCode::OK, Json(serde_json::json!(record))))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_inventory(
    State(state): State<AppState>,
    Payload(payload): Payload<CreateInventory>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<serde_json::Value>)> {
    let record: InventoryRecord = payload.into_record(Uuid::new_v4(), Utc::now());

    let start = Instant::now();
    let stored = state.store.insert_inventory(&record).await?;
    let elapsed = start.elapsed();

    let url = format!("{}/{}", INVENTORY_PATH, stored.id);

    info!(
        id = %stored.id,
        barcode = %stored.barcode_number,
        quantity = stored.stock_quantity,
        elapsed_ms = elapsed.as_millis(),
        "Created inventory"
    );

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_LOCATION, url.clone())],
        Json(serde_json::json!({
            "url": url,
            "data": stored,
        })),
    ))
}
