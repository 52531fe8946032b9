//! Dune Calculator Server - HTTP API
//!
//! Thin transport over `dune-calc-logic`: the catalog is loaded once at
//! startup and shared read-only between handlers; every calculation runs
//! synchronously inside the request.
//!
//! | Route | Method | Response |
//! |-------|--------|----------|
//! | `/` | GET | service banner |
//! | `/health` | GET | `{"status": "healthy"}` |
//! | `/placeables` | GET | catalog listing, in catalog order |
//! | `/calculate` | POST | resource totals, 404 on unknown placeable |

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use dune_calc_logic::calculator::{calculate, CalculationRequest, CalculationResult};
use dune_calc_logic::catalog::{Catalog, CatalogEntry};
use dune_calc_logic::error::{CalcError, CatalogError};
use serde::Serialize;
use tracing::{debug, warn};

pub const SERVICE_NAME: &str = "Dune Placeable Calculator API";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Calc(CalcError::UnknownPlaceable { .. }) => StatusCode::NOT_FOUND,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Build the router with all routes and the CORS layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/placeables", get(list_placeables))
        .route("/calculate", post(calculate_resources))
        .with_state(state)
        .layer(middleware::from_fn(cors_middleware))
}

/// Any origin, any method, any header. Preflight requests never reach a route.
async fn cors_middleware(request: Request<Body>, next: middleware::Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

pub fn apply_cors_headers(headers: &mut HeaderMap) {
    let any = HeaderValue::from_static("*");
    headers.insert("access-control-allow-origin", any.clone());
    headers.insert("access-control-allow-methods", any.clone());
    headers.insert("access-control-allow-headers", any);
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": SERVICE_NAME }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn list_placeables(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.entries().to_vec())
}

pub async fn calculate_resources(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResult>, ApiError> {
    let Json(req) = payload?;
    let result = calculate(&state.catalog, &req).map_err(|e| {
        warn!(error = %e, "calculation rejected");
        e
    })?;

    debug!(
        items = result.items_calculated.len(),
        resources = result.total_resources.len(),
        deep_desert = result.use_deep_desert_cost,
        "calculation complete"
    );
    Ok(Json(result))
}
