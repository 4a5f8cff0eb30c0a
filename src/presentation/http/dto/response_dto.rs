use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope: `{"success": false, "detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: detail.into(),
        }
    }
}

pub fn error_response(status: StatusCode, detail: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse::new(detail)))
}

pub fn upstream_status(timed_out: bool) -> StatusCode {
    if timed_out {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// User-facing detail for an upstream failure. The raw error text is logged
/// at the handler; the response only names the service and whether it timed
/// out.
pub fn upstream_detail(service: &str, timed_out: bool) -> String {
    if timed_out {
        format!("{} timed out", service)
    } else {
        format!("{} is unavailable", service)
    }
}

/// Root banner: service name, version and a map of the routes it serves.
#[derive(Debug, Serialize)]
pub struct BannerResponseDto {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<EndpointDto>,
}

#[derive(Debug, Serialize)]
pub struct EndpointDto {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}
