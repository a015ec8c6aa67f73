pub mod config;
pub mod logging;
pub mod error;
pub mod validation;

pub use config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.calculation.leap_year_aware);
    }

    #[test]
    fn test_error_handling() {
        let error = AirInvError::validation("test_field", "test message");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);

        let error = AirInvError::calculation("emission.totalEmissions", "missing factor");
        assert_eq!(error.http_status_code(), 422);
        let response = ErrorResponse::from(error);
        assert_eq!(response.code, "CALCULATION_ERROR");
        assert_eq!(
            response.details.unwrap()["field"],
            serde_json::json!("emission.totalEmissions")
        );
    }
}
