//! HTTP API.
//!
//! Endpoints:
//! - POST /api/search - LLM search
//! - POST /api/direct-search - marketplace search
//! - GET /api/catalog/makes?provider= - vehicle makes
//! - GET /api/catalog/models?make=&provider= - models for a make
//! - GET /api/options - form option tables
//! - GET /health - returns "ok"

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::container::Container;
use crate::{
    DomainError, FormOptions, MakesResponse, ModelsResponse, ProviderChoice, SearchRequest,
    SearchResponse,
};

type AppState = Arc<Container>;

/// A JSON error body with its status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    fn new(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// 400 for bad input, 500 for everything else, message safe to expose.
    fn search(err: &DomainError) -> Self {
        let status = status_for(err);
        Self::new(status, json!(SearchResponse::failure(err.public_message())))
    }

    /// Direct search hides non-input failures behind a generic error.
    fn direct_search(err: &DomainError) -> Self {
        if err.is_client_error() {
            return Self::search(err);
        }
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!(SearchResponse::failure("Search failed").with_details(err.public_message())),
        )
    }

    fn bad_body(rejection: &JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            json!(SearchResponse::failure("Invalid request body").with_details(rejection.body_text())),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn status_for(err: &DomainError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    provider: Option<String>,
    make: Option<String>,
}

pub fn build_app(container: Arc<Container>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health_check))
        .route("/api/search", post(llm_search))
        .route("/api/direct-search", post(direct_search))
        .route("/api/catalog/makes", get(catalog_makes))
        .route("/api/catalog/models", get(catalog_models))
        .route("/api/options", get(form_options))
        .with_state(container)
}

/// Bind and serve until the process is stopped.
pub async fn serve(container: Arc<Container>, port: u16, public: bool) -> anyhow::Result<()> {
    let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
    let addr = SocketAddr::from((host, port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_app(container)).await?;
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    "ok"
}

async fn llm_search(
    State(container): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = body.map_err(|r| ApiError::bad_body(&r))?;

    container
        .llm_search_use_case()
        .execute(request)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("LLM search", &e);
            ApiError::search(&e)
        })
}

async fn direct_search(
    State(container): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = body.map_err(|r| ApiError::bad_body(&r))?;

    container
        .direct_search_use_case()
        .execute(request)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("Direct search", &e);
            ApiError::direct_search(&e)
        })
}

async fn catalog_makes(
    State(container): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let provider = ProviderChoice::from_param(query.provider.as_deref());

    match container.catalog_use_case().list_makes(provider).await {
        Ok(makes) => Json(MakesResponse { makes, error: None }).into_response(),
        Err(e) => {
            log_failure("Makes lookup", &e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MakesResponse {
                    makes: Vec::new(),
                    error: Some("Failed to fetch makes".to_string()),
                }),
            )
                .into_response()
        }
    }
}

async fn catalog_models(
    State(container): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let provider = ProviderChoice::from_param(query.provider.as_deref());
    let make = query.make.unwrap_or_default();

    match container.catalog_use_case().list_models(&make, provider).await {
        Ok(models) => Json(ModelsResponse {
            models,
            error: None,
        })
        .into_response(),
        Err(e) => {
            log_failure("Models lookup", &e);
            let message = if e.is_client_error() {
                e.public_message()
            } else {
                "Failed to fetch models".to_string()
            };
            (
                status_for(&e),
                Json(ModelsResponse {
                    models: Vec::new(),
                    error: Some(message),
                }),
            )
                .into_response()
        }
    }
}

async fn form_options() -> Json<FormOptions> {
    Json(FormOptions::catalogue())
}

fn log_failure(what: &str, err: &DomainError) {
    if err.is_client_error() {
        warn!("{what} rejected: {err}");
    } else {
        error!("{what} failed: {err}");
    }
}
