use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::CheckHealthUseCase;
use crate::presentation::http::dto::rag_dto::{HealthComponentsDto, HealthResponseDto};
use crate::presentation::http::dto::{ApiResponse, BannerResponseDto, EndpointDto};

pub struct HealthHandler {
    check_health_use_case: Arc<CheckHealthUseCase>,
}

impl HealthHandler {
    pub fn new(check_health_use_case: Arc<CheckHealthUseCase>) -> Self {
        Self { check_health_use_case }
    }

    pub async fn root(State(_handler): State<Arc<HealthHandler>>) -> impl IntoResponse {
        let endpoints = vec![
            EndpointDto {
                method: "POST",
                path: "/upload-pdf",
                description: "Upload a research paper",
            },
            EndpointDto {
                method: "GET",
                path: "/documents",
                description: "List uploaded documents",
            },
            EndpointDto {
                method: "GET",
                path: "/documents/{document_id}",
                description: "Fetch a single document",
            },
            EndpointDto {
                method: "DELETE",
                path: "/documents/{document_id}",
                description: "Delete a document and its chunks",
            },
            EndpointDto {
                method: "POST",
                path: "/documents/{document_id}/summarize",
                description: "Summarize an indexed document",
            },
            EndpointDto {
                method: "POST",
                path: "/documents/{document_id}/questions",
                description: "Suggest questions about a document",
            },
            EndpointDto {
                method: "POST",
                path: "/chat",
                description: "Ask a question over indexed documents",
            },
            EndpointDto {
                method: "GET",
                path: "/health",
                description: "Component health report",
            },
        ];

        (
            StatusCode::OK,
            Json(ApiResponse::success(BannerResponseDto {
                message: "DocMind API".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                endpoints,
            })),
        )
    }

    /// Always 200; degradation is reported in the body so load balancers do
    /// not cycle the service for a downstream outage.
    pub async fn health(State(handler): State<Arc<HealthHandler>>) -> impl IntoResponse {
        let report = handler.check_health_use_case.execute().await;

        let dto = HealthResponseDto {
            status: if report.healthy {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            components: HealthComponentsDto {
                database: report.database.as_str().to_string(),
                pdf_processor: report.pdf_processor.as_str().to_string(),
                rag_pipeline: report.rag_pipeline.as_str().to_string(),
            },
            timestamp: report.checked_at.to_rfc3339(),
        };

        (StatusCode::OK, Json(ApiResponse::success(dto)))
    }
}
