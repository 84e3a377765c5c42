use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use crate::{
    api::{
        dtos::{ApiResponse, ParseRequest, PlatformInfo},
        errors::ApiError,
        middleware::ApiKey,
    },
    app_state::AppState,
    platform::Platform,
    upstream::NormalizedVideo,
};

#[utoipa::path(
    post,
    path = "/api/v1/parse",
    tag = "parse",
    request_body = ParseRequest,
    params(
        ("X-API-Key" = String, Header, description = "Service API key")
    ),
    responses(
        (status = 200, description = "Envelope {code, message, data} with the normalized video", body = NormalizedVideo),
        (status = 400, description = "Missing url, bad body or unsupported platform"),
        (status = 401, description = "Missing or wrong API key"),
        (status = 404, description = "No known platform for the url"),
        (status = 502, description = "Upstream provider failed or rejected the request")
    )
)]
pub async fn parse_video(
    _key: ApiKey,
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NormalizedVideo>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let url = request.url().ok_or(ApiError::MissingUrl)?;
    let platform = request.platform().map_err(ApiError::UnknownPlatform)?;

    info!(url, platform = ?platform, "parse request");

    let video = state
        .parser
        .parse(url, platform)
        .await
        .map_err(|error| ApiError::Parse {
            error,
            passthrough: state.passthrough_errors,
        })?;

    Ok(Json(ApiResponse::success(video)))
}

#[utoipa::path(
    get,
    path = "/api/v1/platforms",
    tag = "parse",
    responses(
        (status = 200, description = "Envelope whose data lists supported platforms", body = [PlatformInfo])
    )
)]
pub async fn list_platforms() -> Json<ApiResponse<Vec<PlatformInfo>>> {
    let platforms = Platform::ALL
        .into_iter()
        .filter_map(|platform| {
            platform.endpoint().map(|endpoint| PlatformInfo {
                id: platform,
                name: platform.display_name().to_string(),
                endpoint: endpoint.to_string(),
            })
        })
        .collect();

    Json(ApiResponse::success(platforms))
}
