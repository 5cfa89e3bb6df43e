pub mod inventory;
pub mod stats;

use axum::{extract::FromRequest, http::StatusCode, Json};
use serde_json::json;

use crate::error::AppError;

/// JSON body extractor whose rejections render through `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "inventory-service" })))
}
