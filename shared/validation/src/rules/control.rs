use rust_decimal::Decimal;

use airinv_models::ValidationField;

use super::{duplicates, is_blank, is_first_duplicate, within, StatusYearCheck};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, ControlTarget};

const STATUS_YEAR: StatusYearCheck<'static> = StatusYearCheck {
    field: ValidationField::ControlStatusYear,
    required_key: "control.statusYear.required",
    range_key: "control.statusYear.range",
};

pub struct ControlRule;

impl ValidationRule<scope::Control> for ControlRule {
    fn name(&self) -> &'static str {
        "federal.control"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &ControlTarget<'_>, findings: &mut Findings) -> bool {
        let facility = target.facility;
        let control = target.control;

        if is_blank(Some(&control.identifier)) {
            findings.error(ValidationField::ControlIdentifier, "control.controlIdentifier.required", &args![]);
        } else if let Some(position) = facility.controls.iter().position(|c| c.id == control.id) {
            let siblings = facility.controls.iter().map(|c| c.identifier.as_str());
            if is_first_duplicate(&control.identifier, siblings, position) {
                findings.error(
                    ValidationField::ControlIdentifier,
                    "control.controlIdentifier.duplicate",
                    &args![control.identifier.trim()],
                );
            }
        }

        STATUS_YEAR.run(ctx, findings, control.status_code.as_deref(), control.status_year);

        if let Some(percent) = control.percent_control {
            if !within(percent, Decimal::ZERO, Decimal::ONE_HUNDRED) {
                findings.error(ValidationField::ControlPercentControl, "control.percentControl.range", &args![]);
            }
        }
        if let Some(percent) = control.percent_capture {
            if !within(percent, Decimal::ZERO, Decimal::ONE_HUNDRED) {
                findings.error(ValidationField::ControlPercentCapture, "control.percentCapture.range", &args![]);
            }
        }

        if is_blank(control.control_measure_code.as_deref()) {
            findings.error(ValidationField::ControlMeasureCode, "control.controlMeasureCode.required", &args![]);
        }

        let (min, max) = (Decimal::from(5), Decimal::new(999, 1));
        for pollutant in &control.pollutants {
            if let Some(reduction) = pollutant.percent_reduction {
                if !within(reduction, min, max) {
                    findings.error(
                        ValidationField::ControlPollutantPercentReduction,
                        "control.controlPollutant.range",
                        &args![pollutant.pollutant_code],
                    );
                }
            }
        }
        for code in duplicates(control.pollutants.iter().map(|p| p.pollutant_code.as_str())) {
            findings.error(ValidationField::ControlPollutant, "control.controlPollutant.duplicate", &args![code]);
        }

        let assigned = facility
            .control_paths
            .iter()
            .flat_map(|path| &path.assignments)
            .any(|assignment| assignment.control_id == Some(control.id));
        if control.is_operating() && !assigned {
            findings.warning(ValidationField::ControlPathWarning, "control.pathWarning", &args![control.identifier]);
        }

        !findings.has_errors()
    }
}
