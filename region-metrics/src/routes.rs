use crate::{
    error::MetricsError,
    extract::JsonBody,
    state::AppState,
    stats::{compute_metrics, MetricsRequest, MetricsResponse},
};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
        },
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, info};

const PREFLIGHT_METHODS: &str = "GET,POST,OPTIONS,PUT,PATCH,DELETE";

pub fn build_router(state: Arc<AppState>, max_request_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root_handler).options(preflight_handler))
        .route("/health", get(health_handler).options(preflight_handler))
        .route(
            "/metrics",
            get(metrics_info_handler)
                .post(metrics_handler)
                .options(preflight_handler),
        )
        .fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(max_request_body_bytes))
        .layer(TraceLayer::new_for_http())
        // Outermost, so 404/405/413 responses get the headers as well.
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state)
}

pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "message": r#"POST /metrics with {"regions":[...],"threshold_ms":180}"#
    }))
}

pub async fn metrics_info_handler() -> impl IntoResponse {
    Json(json!({ "message": "POST JSON to this path" }))
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "rows": state.dataset.len() }))
}

pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<JsonBody<MetricsRequest>, MetricsError>,
) -> Result<Json<MetricsResponse>, MetricsError> {
    let JsonBody(req) = payload.map_err(|err| {
        debug!("Rejected metrics request: {}", err);
        err
    })?;
    debug!(
        "Metrics request for {} region(s), threshold {}ms",
        req.regions.len(),
        req.threshold_ms
    );

    let resp = compute_metrics(state.dataset.rows(), &req.regions, req.threshold_ms)?;
    info!("Computed metrics for {} region(s)", resp.regions.len());
    Ok(Json(resp))
}

pub async fn preflight_handler(State(state): State<Arc<AppState>>) -> Response {
    preflight_response(state.preflight_max_age_secs)
}

/// Unknown paths: OPTIONS is still answered as a preflight, anything else is 404.
pub async fn fallback_handler(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method == Method::OPTIONS {
        return preflight_response(state.preflight_max_age_secs);
    }
    MetricsError::RouteNotFound.into_response()
}

fn preflight_response(max_age_secs: u64) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (ACCESS_CONTROL_ALLOW_METHODS, PREFLIGHT_METHODS.to_string()),
            (ACCESS_CONTROL_ALLOW_HEADERS, "*".to_string()),
            (ACCESS_CONTROL_MAX_AGE, max_age_secs.to_string()),
        ],
    )
        .into_response()
}
