use crate::error::AppError;
use axum::{
    extract::State,
    http::header,
    response::{
        IntoResponse,
        Response,
    },
    routing::get,
    Router,
};
use mongo_exporter_collector::PrometheusSink;
use mongo_exporter_config::HEALTH_PATH;

#[derive(Clone)]
pub struct AppState {
    pub sink: PrometheusSink,
}

/// Serves the sink's registry on `metrics_path` plus a health check on [`HEALTH_PATH`].
pub fn create_router(sink: PrometheusSink, metrics_path: &str) -> Router {
    let state = AppState { sink };

    Router::new()
        .route(HEALTH_PATH, get(healthz))
        .route(metrics_path, get(metrics))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = state.sink.encode()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}
