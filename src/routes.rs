use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::ReportError,
    models::{AssessmentRecord, ReportResponse, SubstanceRegisterRecord},
    report::ReportGenerator,
};

#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportGenerator>,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = if self.is_precondition() {
            StatusCode::PRECONDITION_FAILED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/reports/assessment", post(assessment_report))
        .route("/api/reports/register", post(register_report))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

pub async fn assessment_report(
    State(state): State<AppState>,
    Json(record): Json<AssessmentRecord>,
) -> Result<Json<ReportResponse>, ReportError> {
    tracing::info!("🧪 Assessment report requested for: {}", record.substance_name);
    let data_url = state.reports.assessment_pdf(&record).await?;
    Ok(Json(ReportResponse { data_url }))
}

pub async fn register_report(
    State(state): State<AppState>,
    Json(records): Json<Vec<SubstanceRegisterRecord>>,
) -> Result<Json<ReportResponse>, ReportError> {
    tracing::info!("📚 Register report requested for {} substances", records.len());
    let data_url = state.reports.register_pdf(&records).await?;
    Ok(Json(ReportResponse { data_url }))
}
