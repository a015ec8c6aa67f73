use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use airinv_calculation::{BulkEntryRow, CalculationError};
use airinv_models::{EmissionsReport, ValidationStatus};
use airinv_utils::validate_model;
use airinv_validation::ValidationResponse;

use crate::export::CersExporter;
use crate::middleware::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportValidationResponse {
    pub validation_status: ValidationStatus,
    #[serde(flatten)]
    pub result: ValidationResponse,
}

pub async fn validate_report(
    State(state): State<AppState>,
    Json(mut report): Json<EmissionsReport>,
) -> Json<ReportValidationResponse> {
    let result = state.validation.validate_and_set_status(&mut report);
    state.metrics.record_validation(result.is_valid());

    Json(ReportValidationResponse {
        validation_status: report.validation_status,
        result: ValidationResponse::from(&result),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculationFailure {
    pub emission_id: Uuid,
    pub pollutant_code: Option<String>,
    pub field: String,
    pub message: String,
}

impl From<CalculationError> for CalculationFailure {
    fn from(error: CalculationError) -> Self {
        Self {
            emission_id: error.emission_id,
            pollutant_code: error.pollutant_code.clone(),
            field: error.field.path(),
            message: error.message(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecalculateResponse {
    pub report: EmissionsReport,
    pub updated: Vec<Uuid>,
    pub failures: Vec<CalculationFailure>,
}

pub async fn recalculate_report(
    State(state): State<AppState>,
    Json(mut report): Json<EmissionsReport>,
) -> Json<RecalculateResponse> {
    let outcome = state.calculator().recalculate_report(&mut report);
    let attempted = outcome.updated.len() + outcome.failures.len();
    state.metrics.record_calculations(attempted, outcome.failures.len());

    Json(RecalculateResponse {
        report,
        updated: outcome.updated,
        failures: outcome.failures.into_iter().map(CalculationFailure::from).collect(),
    })
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkEntryRequest {
    pub report: EmissionsReport,
    #[validate(length(min = 1))]
    pub rows: Vec<BulkEntryRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkEntryResponse {
    pub rows: Vec<BulkEntryRow>,
}

pub async fn bulk_entry(
    State(state): State<AppState>,
    Json(request): Json<BulkEntryRequest>,
) -> ApiResult<Json<BulkEntryResponse>> {
    validate_model(&request)?;

    let mut report = request.report;
    let rows = state.calculator().bulk_update(&mut report, request.rows);
    let failed = rows.iter().filter(|row| row.calculation_failed).count();
    state.metrics.record_calculations(rows.len(), failed);

    info!(report_id = %report.id, rows = rows.len(), failed, "Bulk entry applied");
    Ok(Json(BulkEntryResponse { rows }))
}

pub async fn export_report(
    State(state): State<AppState>,
    Json(report): Json<EmissionsReport>,
) -> ApiResult<Response> {
    let xml = CersExporter::new(state.policy()).to_xml(&report)?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}
