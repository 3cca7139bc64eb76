// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API over the scraper.
//!
//! Responses use a uniform envelope: `{ success, message, data }` on
//! success, `{ success: false, message }` on error.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::error::DetailError;
use crate::media::MediaIngestor;
use crate::model::Language;
use crate::search::SearchAggregator;
use crate::tables::{FOOD_CATEGORIES, PRODUCT_CATEGORIES};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SearchAggregator>,
    pub ingestor: Arc<MediaIngestor>,
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/atvr/search", post(handle_search))
        .route("/api/v1/atvr/product/:id", get(handle_product))
        .route("/api/v1/atvr/food-categories", get(handle_food_categories))
        .route("/api/v1/atvr/categories", get(handle_categories))
        .route("/api/v1/media/ingest", post(handle_media_ingest))
        .layer(cors)
        .with_state(state)
}

/// Start the REST server on the given port.
pub async fn start(port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Envelope helpers ─────────────────────────────────────────────────────────

fn success(data: Value, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": message, "data": data })),
    )
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "success": false, "message": message })),
    )
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    #[serde(default)]
    search_term: String,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> impl IntoResponse {
    let term = body.search_term.trim();
    if term.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Search term is required");
    }

    match state.aggregator.search(term).await {
        Ok(products) => {
            let total = products.len();
            success(
                json!({
                    "products": products,
                    "total": total,
                    "searchTerm": term,
                    "language": "both",
                }),
                "Products retrieved successfully from both languages",
            )
        }
        Err(e) if e.is_timeout() => failure(
            StatusCode::REQUEST_TIMEOUT,
            "ATVR website is taking too long to respond. Please try again later.",
        ),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to search ATVR products",
        ),
    }
}

#[derive(Deserialize)]
struct LanguageQuery {
    language: Option<Language>,
}

async fn handle_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> impl IntoResponse {
    let language = query.language.unwrap_or(Language::Is);

    match state.aggregator.product_details(&id, language).await {
        Ok(product) => success(
            json!(product),
            "Product details retrieved successfully",
        ),
        Err(DetailError::NotFound) => failure(StatusCode::NOT_FOUND, "Product not found"),
        Err(DetailError::UpstreamTimeout) => failure(
            StatusCode::REQUEST_TIMEOUT,
            "ATVR website is taking too long to respond. Please try again later.",
        ),
    }
}

async fn handle_food_categories(Query(query): Query<LanguageQuery>) -> impl IntoResponse {
    let language = query.language.unwrap_or(Language::Is);
    let categories: Vec<Value> = FOOD_CATEGORIES
        .iter()
        .map(|(code, names)| {
            json!({
                "code": code,
                "name": match language {
                    Language::Is => names.is,
                    Language::En => names.en,
                },
            })
        })
        .collect();
    success(json!(categories), "Food categories retrieved successfully")
}

async fn handle_categories(Query(query): Query<LanguageQuery>) -> impl IntoResponse {
    let language = query.language.unwrap_or(Language::Is);
    let categories: Vec<Value> = PRODUCT_CATEGORIES
        .iter()
        .map(|(code, names)| {
            json!({
                "code": code,
                "name": match language {
                    Language::Is => names.is,
                    Language::En => names.en,
                },
            })
        })
        .collect();
    success(json!(categories), "Product categories retrieved successfully")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestBody {
    image_url: String,
    product_name: String,
    atvr_product_id: String,
    uploaded_by: Option<String>,
}

async fn handle_media_ingest(
    State(state): State<AppState>,
    Json(body): Json<IngestBody>,
) -> impl IntoResponse {
    if body.image_url.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Image URL is required");
    }

    match state
        .ingestor
        .ingest(
            &body.image_url,
            &body.product_name,
            &body.atvr_product_id,
            body.uploaded_by.as_deref(),
        )
        .await
    {
        Some(media) => success(json!({ "media": media }), "Media uploaded successfully"),
        None => failure(
            StatusCode::BAD_REQUEST,
            "Invalid image file or unsupported format",
        ),
    }
}
