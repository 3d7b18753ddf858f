pub mod handlers;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analysis::BatchAnalyzer;
use crate::error::{Error, Result};
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub analyzer: Arc<BatchAnalyzer>,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, analyzer: BatchAnalyzer) -> Self {
        Self {
            storage,
            analyzer: Arc::new(analyzer),
        }
    }
}

pub struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::InvalidInput(rejection.body_text()))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/boards", get(handlers::list_boards).post(handlers::create_board))
        .route("/boards/{id}", delete(handlers::delete_board))
        .route(
            "/boards/{id}/solutions",
            get(handlers::list_solutions).post(handlers::create_solution),
        )
        .route("/boards/{id}/analyze", post(handlers::analyze_board))
        .route("/boards/{id}/kpi", get(handlers::board_kpi))
        .route("/boards/{id}/export/{format}", get(handlers::export_board))
        .route("/solutions/{id}", delete(handlers::delete_solution))
        .route("/solutions/{id}/survey", post(handlers::update_survey))
        .route("/kpi", get(handlers::global_kpi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
