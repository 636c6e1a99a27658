use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    api_errors::AppError,
    app_state::AppState,
    catalog::Product,
    errors::StoreError,
    event::EventRecord,
};

pub const EVENT_RECORDED: &str = "Event successfully recorded";
pub const EVENT_FAILED: &str = "Failed to record event";

/// API routes plus the static frontend as fallback.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    api_routes()
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/event-log", post(record_event))
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(product_by_id))
        .route("/healthz", get(healthz))
}

/// Answers 200 or 500 only. The body is parsed leniently, so a malformed
/// payload, or one not sent as `application/json`, is logged with
/// placeholder fields rather than rejected.
async fn record_event(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let record = if is_json(&headers) {
        EventRecord::from_body(&body)
    } else {
        tracing::warn!("Event payload not sent as JSON, logging placeholders");
        EventRecord::default()
    };
    if let Some(agent) = record.agent() {
        tracing::debug!("Event from agent: {}", agent);
    }

    match st.event_log.append(&record).await {
        Ok(receipt) => {
            tracing::info!(
                "Logged event: {} -> {}",
                receipt.line.trim_end(),
                receipt.path.display()
            );
            (StatusCode::OK, EVENT_RECORDED)
        }
        Err(e) => {
            tracing::error!("Error writing log entry: {}", e);
            if let StoreError::Io { source, .. } = &e {
                tracing::error!("Cause: {}", source);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, EVENT_FAILED)
        }
    }
}

/// `application/json`, with or without parameters such as `charset`.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

async fn list_products(State(st): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, AppError> {
    let products = st.catalog.list_products().await.map_err(|e| {
        tracing::warn!("Catalog listing failed: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(products))
}

async fn product_by_id(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, AppError> {
    match st.catalog.product(id).await {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => Err(StoreError::not_found("product", id.to_string()).into()),
        Err(e) => {
            tracing::warn!("Catalog lookup for {} failed: {}", id, e);
            Err(e.into())
        }
    }
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
