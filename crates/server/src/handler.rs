//! Router and request handlers.
//!
//! Routes:
//! - `GET /` liveness, always 200
//! - `GET /health/ready` readiness, 503 when the dataset does not answer
//! - `GET /city?q=&l=` city search

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, SecondsFormat, Utc};
use cityfind_core::{SearchError, SearchParams, SearchService};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{ApiError, ErrorBody};

const DATA_SOURCE: &str = "https://github.com/dr5hn/countries-states-cities-database";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self { search: Arc::new(search), started_at: Utc::now() }
    }
}

/// Build the application router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    Router::new()
        .route("/", get(status))
        .route("/health/ready", get(ready))
        .route("/city", get(city))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
    message: &'static str,
    data: &'static str,
    started_at: String,
}

async fn status(State(state): State<AppState>) -> Json<StatusBody> {
    Json(StatusBody {
        status: "ok",
        message: "Server is up and running.",
        data: DATA_SOURCE,
        started_at: state.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

async fn ready(State(state): State<AppState>) -> Response {
    match state.search.ready().await {
        Ok(()) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorBody::new(err.code()))).into_response()
        }
    }
}

async fn city(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Response, ApiError> {
    let cities = state.search.search_params(&params).await?;

    let body = serde_json::to_vec(&*cities).map_err(|e| SearchError::SerializationFailure(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
