pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;

use axum::{
    Json, Router,
    extract::Request,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::OpenApi;

use crate::{app_state::AppState, health};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::parse_video, handlers::list_platforms, health::health_check),
    components(schemas(
        dtos::ParseRequest,
        dtos::PlatformInfo,
        crate::upstream::NormalizedVideo,
        crate::upstream::Author,
        crate::upstream::Statistics,
        crate::platform::Platform,
        health::HealthResponse
    )),
    tags(
        (name = "parse", description = "Share-link parsing"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/parse", post(handlers::parse_video))
        .route("/api/v1/platforms", get(handlers::list_platforms))
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
