use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use airinv_models::{Emission, ReportingPeriod};
use airinv_utils::validate_model;

use crate::middleware::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CalculateRequest {
    pub emission: Emission,
    pub period: ReportingPeriod,
    #[validate(range(min = 1900, max = 2100))]
    pub report_year: i16,
}

/// Recomputes one emission's total against its reporting period.
pub async fn calculate_emission(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> ApiResult<Json<Emission>> {
    validate_model(&request)?;

    let outcome = state
        .calculator()
        .calculate_total_emissions(&request.emission, &request.period, request.report_year);
    state.metrics.record_calculations(1, usize::from(outcome.is_err()));

    let emission = outcome?;
    info!(
        emission_id = %emission.id,
        total = ?emission.total_emissions,
        "Emission calculated"
    );
    Ok(Json(emission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use airinv_utils::AppConfig;
    use axum::response::IntoResponse;
    use axum::http::StatusCode;
    use rust_decimal::Decimal;

    fn request(report_year: i16) -> CalculateRequest {
        CalculateRequest {
            emission: Emission {
                pollutant_code: Some("NOX".to_string()),
                calculation_method_code: Some("8".to_string()),
                emissions_factor: Some(Decimal::TWO),
                emissions_factor_text: Some("AP-42".to_string()),
                emissions_numerator_uom: Some("LB".to_string()),
                emissions_denominator_uom: Some("TON".to_string()),
                emissions_uom: Some("LB".to_string()),
                ..Emission::default()
            },
            period: ReportingPeriod {
                calculation_parameter_value: Some(Decimal::from(100)),
                calculation_parameter_uom: Some("TON".to_string()),
                ..ReportingPeriod::default()
            },
            report_year,
        }
    }

    #[test]
    fn test_calculate_factor_emission() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let Json(emission) =
            tokio_test::block_on(calculate_emission(State(state), Json(request(2021)))).unwrap();
        assert_eq!(emission.total_emissions, Some(Decimal::from(200)));
        assert_eq!(emission.calculated_emissions_tons, Some(Decimal::new(1, 1)));
    }

    #[test]
    fn test_report_year_out_of_range() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let error = tokio_test::block_on(calculate_emission(State(state), Json(request(1800)))).unwrap_err();
        assert_eq!(error.0.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_unit_is_unprocessable() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let mut body = request(2021);
        body.emission.emissions_denominator_uom = None;

        let error = tokio_test::block_on(calculate_emission(State(state), Json(body))).unwrap_err();
        assert_eq!(error.0.error_code(), "CALCULATION_ERROR");
        assert!(error.0.field().is_some());
        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
