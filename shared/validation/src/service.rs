use tracing::{info, warn};

use airinv_models::{EmissionsReport, ValidationStatus};

use crate::chain::ValidationChain;
use crate::result::ValidationResult;

/// Validates reports and records the outcome on the report itself.
#[derive(Clone)]
pub struct ValidationService {
    chain: ValidationChain,
}

impl ValidationService {
    pub fn new(chain: ValidationChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ValidationChain {
        &self.chain
    }

    /// Read-only validation; the report is left untouched.
    pub fn validate(&self, report: &EmissionsReport) -> ValidationResult {
        self.chain.validate(report)
    }

    pub fn validate_and_set_status(&self, report: &mut EmissionsReport) -> ValidationResult {
        let result = self.chain.validate(report);
        let status = ValidationStatus::from_result(result.is_valid(), result.has_warnings());
        report.validation_status = status;

        if status == ValidationStatus::Failed {
            warn!(
                report_id = %report.id,
                errors = result.error_count(),
                "Report failed validation"
            );
        } else {
            info!(report_id = %report.id, status = %status, "Report validation status updated");
        }

        result
    }
}
