use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub monitoring: MonitoringConfig,
    pub calculation: CalculationConfig,
    pub validation: ValidationSettings,
    pub reference: ReferenceConfig,
    /// Jurisdiction settings keyed by program system code
    pub jurisdictions: HashMap<String, JurisdictionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub metrics_enabled: bool,
    pub prometheus_namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Significant figures kept on calculated totals
    pub significant_figures: u32,
    /// Decimal places used for totals in the exchange document
    pub export_decimal_places: u32,
    /// Use 366-day years for leap reporting years
    pub leap_year_aware: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Relative difference between a manual total and the calculated one that fails validation
    pub emissions_total_error_tolerance: f64,
    /// Relative difference that produces a warning
    pub emissions_total_warning_tolerance: f64,
    /// Pollutant codes whose sum must not exceed total fluorides
    pub fluoride_family: Vec<String>,
    pub total_fluorides_code: String,
    pub pollutant_pairs: Vec<PollutantPairConfig>,
    /// Allowed difference, in tons, when a pair must be equal
    pub pair_equality_tolerance: f64,
}

/// Magnitude relationship between the summed tons of two pollutant groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollutantPairConfig {
    pub message_key: String,
    pub lhs: Vec<String>,
    pub comparison: PairComparison,
    pub rhs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PairComparison {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReferenceConfig {
    /// JSON reference seed; the built-in standard tables are used when unset
    pub seed_path: Option<String>,
}

/// Settings for one state, local or tribal agency.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct JurisdictionConfig {
    pub contact_email: Option<String>,
    pub eis_program_code: Option<String>,
    /// NAICS types ("primary", "secondary", "tertiary") every facility must report
    pub required_naics_types: Vec<String>,
    pub emissions_total_error_tolerance: Option<f64>,
    pub emissions_total_warning_tolerance: Option<f64>,
    /// Fuel use value, material and UOM are mandatory when the SCC requires fuel use
    pub require_fuel_use_values: bool,
}

impl JurisdictionConfig {
    pub fn has_additional_rules(&self) -> bool {
        !self.required_naics_types.is_empty()
            || self.emissions_total_error_tolerance.is_some()
            || self.emissions_total_warning_tolerance.is_some()
            || self.require_fuel_use_values
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Start with default values
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with AIRINV prefix
            .add_source(Environment::with_prefix("AIRINV").separator("__"));

        config.build()?.try_deserialize()
    }

    pub fn jurisdiction(&self, program_system_code: &str) -> Option<&JurisdictionConfig> {
        self.jurisdictions.get(program_system_code)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_size: 16 * 1024 * 1024, // 16MB
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            file_path: None,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            prometheus_namespace: "airinv".to_string(),
        }
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            significant_figures: 6,
            export_decimal_places: 6,
            leap_year_aware: true,
        }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            emissions_total_error_tolerance: 0.05,
            emissions_total_warning_tolerance: 0.01,
            fluoride_family: vec!["7664393".to_string()],
            total_fluorides_code: "16984488".to_string(),
            pollutant_pairs: default_pollutant_pairs(),
            pair_equality_tolerance: 0.000001,
        }
    }
}

fn pair(key: &str, lhs: &[&str], comparison: PairComparison, rhs: &[&str]) -> PollutantPairConfig {
    PollutantPairConfig {
        message_key: key.to_string(),
        lhs: lhs.iter().map(|c| c.to_string()).collect(),
        comparison,
        rhs: rhs.iter().map(|c| c.to_string()).collect(),
    }
}

/// Particulate matter relationships checked within a reporting period.
pub fn default_pollutant_pairs() -> Vec<PollutantPairConfig> {
    use PairComparison::*;

    vec![
        pair("reportingPeriod.emission.pm10.fil.greater.pri", &["PM10-FIL"], LessOrEqual, &["PM10-PRI"]),
        pair("reportingPeriod.emission.pm25.fil.greater.pri", &["PM25-FIL"], LessOrEqual, &["PM25-PRI"]),
        pair("reportingPeriod.emission.pm10.con.greater.pri", &["PM-CON"], LessOrEqual, &["PM10-PRI"]),
        pair("reportingPeriod.emission.pm25.con.greater.pri", &["PM-CON"], LessOrEqual, &["PM25-PRI"]),
        pair("reportingPeriod.emission.pm10.invalid", &["PM10-FIL", "PM-CON"], Equal, &["PM10-PRI"]),
        pair("reportingPeriod.emission.pm25.invalid", &["PM25-FIL", "PM-CON"], Equal, &["PM25-PRI"]),
        pair("reportingPeriod.emission.pm25.pri.greater.pm10", &["PM25-PRI"], LessOrEqual, &["PM10-PRI"]),
        pair("reportingPeriod.emission.pm25.fil.greater.pm10", &["PM25-FIL"], LessOrEqual, &["PM10-FIL"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.calculation.significant_figures, 6);
        assert_eq!(config.calculation.export_decimal_places, 6);
        assert_eq!(config.validation.pollutant_pairs.len(), 8);
        assert!(config.jurisdictions.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "server": {"port": 9000},
            "jurisdictions": {"GADNR": {"required_naics_types": ["primary", "secondary"]}}
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        let ga = config.jurisdiction("GADNR").unwrap();
        assert!(ga.has_additional_rules());
        assert!(!ga.require_fuel_use_values);
        assert!(config.jurisdiction("DOEE").is_none());
    }

    #[test]
    fn test_pair_comparison_names() {
        let parsed: PairComparison = serde_json::from_str("\"less_or_equal\"").unwrap();
        assert_eq!(parsed, PairComparison::LessOrEqual);
    }
}
