use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod seed;

use crate::config::{Config, StoreBackend};
use crate::db::{InventoryStore, MemoryStore, PgStore};

/// Shared application state. The store is injected so tests can swap it out.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,inventory_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn InventoryStore> = match &config.backend {
        StoreBackend::Postgres { database_url } => {
            if config.seed_demo_data {
                warn!("SEED_DEMO_DATA only applies to the memory backend; ignoring");
            }
            Arc::new(PgStore::connect(database_url, config.max_connections).await?)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on shutdown.");
            let store = MemoryStore::new();
            if config.seed_demo_data {
                let mut rng = StdRng::from_entropy();
                seed::seed_demo_data(&store, config.seed_count, &mut rng, Utc::now()).await?;
            }
            Arc::new(store)
        }
    };

    let app = build_router(AppState { store });

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    use handlers::{inventory, stats};

    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Inventory records ───────────────────────────────────────────────
        .route(
            inventory::INVENTORY_PATH,
            get(inventory::get_inventory).post(inventory::create_inventory),
        )
        .route("/api/v1/inventory/:id", get(inventory::get_inventory))

        // ── Aggregates ──────────────────────────────────────────────────────
        .route("/api/v1/stats/total", get(stats::total_inventory))
        .route("/api/v1/stats/total-by-type", get(stats::total_inventory_by_type))
        .route("/api/v1/stats/total-value", get(stats::total_inventory_value))
        .route("/api/v1/stats/expired", get(stats::expired_inventory))
        .route("/api/v1/stats/nearly-expired", get(stats::nearly_expired_inventory))
        .route("/api/v1/stats/stock-by-category", get(stats::stock_by_category))
        .route(
            "/api/v1/stats/stock-by-category/data",
            get(stats::stock_by_category_with_data),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
