use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::{
    error::AppResult,
    models::{
        CategoryStock, CategoryStockWithData, DateRangeParams, ExpiredCount, ExpiryWindow,
        NearlyExpiredCount, TagTotal, TotalInventory, TotalInventoryValue,
    },
    AppState,
};

// ── Totals ────────────────────────────────────────────────────────────────────

pub async fn total_inventory(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<TotalInventory>)> {
    let start = Instant::now();
    let total = state.store.total_stock().await?;

    info!(total, elapsed_ms = start.elapsed().as_millis(), "Computed total inventory");

    Ok((StatusCode::OK, Json(TotalInventory { total_inventory: total })))
}

pub async fn total_inventory_by_type(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<TagTotal>>)> {
    let start = Instant::now();
    let totals = state.store.total_stock_by_tag().await?;

    info!(
        groups = totals.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Computed inventory totals by type"
    );

    Ok((StatusCode::OK, Json(totals)))
}

pub async fn total_inventory_value(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<TotalInventoryValue>)> {
    let start = Instant::now();
    let total = state.store.total_value().await?;

    info!(total, elapsed_ms = start.elapsed().as_millis(), "Computed total inventory value");

    Ok((
        StatusCode::OK,
        Json(TotalInventoryValue { total_inventory_value: total }),
    ))
}

// ── Expiry ────────────────────────────────────────────────────────────────────

pub async fn expired_inventory(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ExpiredCount>)> {
    let window = ExpiryWindow::starting(Utc::now());
    let total = state.store.expired_stock(window).await?;

    info!(total, cutoff = %window.today, "Counted expired stock");

    Ok((StatusCode::OK, Json(ExpiredCount { total_expired_products: total })))
}

pub async fn nearly_expired_inventory(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<NearlyExpiredCount>)> {
    let window = ExpiryWindow::starting(Utc::now());
    let total = state.store.nearly_expired_stock(window).await?;

    info!(
        total,
        from = %window.today,
        to = %window.horizon,
        "Counted nearly expired stock"
    );

    Ok((
        StatusCode::OK,
        Json(NearlyExpiredCount { total_nearly_expired_products: total }),
    ))
}

// ── Categories ────────────────────────────────────────────────────────────────

pub async fn stock_by_category(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<(StatusCode, Json<Vec<CategoryStock>>)> {
    let range = params.into_range()?;

    let start = Instant::now();
    let groups = state.store.stock_by_category(range).await?;

    info!(
        groups = groups.len(),
        filtered = range.is_some(),
        elapsed_ms = start.elapsed().as_millis(),
        "Computed stock by category"
    );

    Ok((StatusCode::OK, Json(groups)))
}

pub async fn stock_by_category_with_data(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<(StatusCode, Json<Vec<CategoryStockWithData>>)> {
    let range = params.into_range()?;

    let start = Instant::now();
    let groups = state.store.stock_by_category_with_data(range).await?;

    info!(
        groups = groups.len(),
        records = groups.iter().map(|g| g.data.len()).sum::<usize>(),
        filtered = range.is_some(),
        elapsed_ms = start.elapsed().as_millis(),
        "Computed stock by category with data"
    );

    Ok((StatusCode::OK, Json(groups)))
}
