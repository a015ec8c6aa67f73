use rust_decimal::Decimal;

use airinv_models::status::{is_operating, is_permanently_shutdown};
use airinv_models::{ReleasePoint, ValidationField};

use super::{is_blank, is_first_duplicate, within, StatusYearCheck};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, ReleasePointTarget};

const STATUS_YEAR: StatusYearCheck<'static> = StatusYearCheck {
    field: ValidationField::RpStatusYear,
    required_key: "releasePoint.statusYear.required",
    range_key: "releasePoint.statusYear.range",
};

pub struct ReleasePointRule;

impl ReleasePointRule {
    fn check_stack(&self, release_point: &ReleasePoint, findings: &mut Findings) {
        if let Some(temperature) = release_point.exit_gas_temperature {
            if !(-30..=4000).contains(&temperature) {
                findings.error(ValidationField::RpGasTemperature, "releasePoint.exitGasTemperature.range", &args![]);
            }
        }

        match release_point.stack_height {
            None => findings.error(
                ValidationField::RpStack,
                "releasePoint.stack.required",
                &args![release_point.identifier],
            ),
            Some(height) if !within(height, Decimal::ONE, Decimal::from(1300)) => {
                findings.error(ValidationField::RpStack, "releasePoint.stack.heightRange", &args![])
            }
            Some(_) => {}
        }

        let has_length_width = release_point.stack_length.is_some() && release_point.stack_width.is_some();
        match (release_point.stack_diameter, has_length_width) {
            (None, false) => {
                findings.error(ValidationField::RpStack, "releasePoint.stack.diameterOrLengthWidth", &args![]);
            }
            (Some(_), true) => {
                findings.error(ValidationField::RpStack, "releasePoint.stack.noDiameterAndLengthWidth", &args![]);
            }
            _ => {}
        }

        if let Some(diameter) = release_point.stack_diameter {
            if !within(diameter, Decimal::new(1, 3), Decimal::from(300)) {
                findings.error(ValidationField::RpStack, "releasePoint.stack.diameterRange", &args![]);
            }
            if let Some(height) = release_point.stack_height {
                if diameter >= height {
                    findings.warning(
                        ValidationField::RpStackWarning,
                        "releasePoint.stackWarning.diameterCheck.height",
                        &args![diameter.normalize(), height.normalize()],
                    );
                }
            }
        }
    }

    fn check_fugitive(&self, release_point: &ReleasePoint, findings: &mut Findings) {
        let checks = [
            (release_point.fugitive_height, 0, 500, "releasePoint.fugitive.heightRange"),
            (release_point.fugitive_length, 1, 10_000, "releasePoint.fugitive.lengthRange"),
            (release_point.fugitive_width, 1, 10_000, "releasePoint.fugitive.widthRange"),
            (release_point.fugitive_angle, 0, 89, "releasePoint.fugitive.angleRange"),
        ];
        for (value, min, max, key) in checks {
            if let Some(value) = value {
                if !(min..=max).contains(&value) {
                    findings.error(ValidationField::RpFugitive, key, &args![]);
                }
            }
        }
    }
}

impl ValidationRule<scope::ReleasePoint> for ReleasePointRule {
    fn name(&self) -> &'static str {
        "federal.release_point"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &ReleasePointTarget<'_>, findings: &mut Findings) -> bool {
        let facility = target.facility;
        let release_point = target.release_point;
        let status = release_point.status();

        if is_blank(Some(&release_point.identifier)) {
            findings.error(ValidationField::RpIdentifier, "releasePoint.releasePointIdentifier.required", &args![]);
        } else if let Some(position) = facility.release_points.iter().position(|rp| rp.id == release_point.id) {
            let siblings = facility.release_points.iter().map(|rp| rp.identifier.as_str());
            if is_first_duplicate(&release_point.identifier, siblings, position) {
                findings.error(
                    ValidationField::RpIdentifier,
                    "releasePoint.releasePointIdentifier.duplicate",
                    &args![release_point.identifier.trim()],
                );
            }
        }

        STATUS_YEAR.run(ctx, findings, status, release_point.status_year);

        if is_permanently_shutdown(status) {
            findings.warning(
                ValidationField::RpStatusCode,
                "releasePoint.statusTypeCode.psWarning",
                &args![release_point.identifier],
            );
        }

        if is_operating(status) {
            if release_point.is_fugitive() {
                self.check_fugitive(release_point, findings);
            } else {
                self.check_stack(release_point, findings);
            }
        }

        !findings.has_errors()
    }
}
