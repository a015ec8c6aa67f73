use chrono::{Datelike, Utc};

use airinv_models::ValidationField;
use airinv_utils::is_valid_eis_program_id;

use super::is_blank;
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, ReportTarget};

pub struct ReportRule;

impl ValidationRule<scope::Report> for ReportRule {
    fn name(&self) -> &'static str {
        "federal.report"
    }

    fn validate(&self, _ctx: &ValidationContext<'_>, target: &ReportTarget<'_>, findings: &mut Findings) -> bool {
        let report = target.report;

        let max_year = Utc::now().year() + 1;
        if !(1900..=max_year).contains(&i32::from(report.year)) {
            findings.error(ValidationField::ReportYear, "report.year.range", &args![report.year, max_year]);
        }

        if is_blank(report.program_system_code.as_deref()) {
            findings.error(ValidationField::ReportProgramSystemCode, "report.programSystemCode.required", &args![]);
        }

        if let Some(eis) = report.eis_program_id.as_deref() {
            if !is_valid_eis_program_id(eis) {
                findings.error(ValidationField::ReportEisId, "report.eisProgramId.format", &args![eis]);
            }
        }

        if report.facility_sites.is_empty() {
            findings.error(ValidationField::ReportFacilitySite, "report.facilitySite.required", &args![]);
        }

        !findings.has_errors()
    }
}
