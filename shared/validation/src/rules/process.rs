use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use airinv_models::status::{is_operating, is_permanently_shutdown, is_shutdown};
use airinv_models::{ReleasePointAppt, ValidationField};
use airinv_utils::is_valid_scc_format;

use super::{display_total, is_blank, StatusYearCheck};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, ProcessTarget};

/// Aircraft SCCs that need an engine type.
pub const AIRCRAFT_SCCS: [&str; 6] = [
    "2275001000",
    "2275020000",
    "2275050011",
    "2275050012",
    "2275060011",
    "2275060012",
];

const STATUS_YEAR: StatusYearCheck<'static> = StatusYearCheck {
    field: ValidationField::ProcessStatusYear,
    required_key: "emissionsProcess.statusYear.required",
    range_key: "emissionsProcess.statusYear.range",
};

pub struct EmissionsProcessRule;

impl EmissionsProcessRule {
    fn check_apportionment(&self, target: &ProcessTarget<'_>, findings: &mut Findings) {
        let facility = target.facility;
        let process = target.process;
        let operating = is_operating(process.status());

        let mut by_release_point: HashMap<Uuid, Vec<&ReleasePointAppt>> = HashMap::new();
        let mut order = Vec::new();
        for appt in &process.release_point_appts {
            let entry = by_release_point.entry(appt.release_point_id).or_default();
            if entry.is_empty() {
                order.push(appt.release_point_id);
            }
            entry.push(appt);
        }

        for release_point_id in order {
            let Some(release_point) = facility.release_point(release_point_id) else {
                findings.error(ValidationField::ProcessRp, "emissionsProcess.releasePointAppts.invalid", &args![]);
                continue;
            };

            if by_release_point[&release_point_id].len() > 1 {
                findings.error(
                    ValidationField::ProcessRp,
                    "emissionsProcess.releasePointAppts.duplicate",
                    &args![release_point.identifier],
                );
            }

            if operating && !is_operating(release_point.status()) {
                findings.error(
                    ValidationField::ProcessRp,
                    "emissionsProcess.releasePointAppts.statusTypeCode",
                    &args![release_point.identifier, release_point.status().unwrap_or("none")],
                );
            }
        }

        for appt in &process.release_point_appts {
            if appt.percent < Decimal::ONE || appt.percent > Decimal::ONE_HUNDRED {
                let identifier = facility
                    .release_point(appt.release_point_id)
                    .map(|rp| rp.identifier.clone())
                    .unwrap_or_else(|| appt.release_point_id.to_string());
                findings.error(
                    ValidationField::ProcessRpPercent,
                    "emissionsProcess.releasePointAppts.percent.range",
                    &args![identifier],
                );
            }
        }

        if operating {
            if process.release_point_appts.is_empty() {
                findings.error(ValidationField::ProcessRp, "emissionsProcess.releasePointAppts.required", &args![]);
            } else {
                let total = process.total_apportionment();
                if total != Some(Decimal::ONE_HUNDRED) {
                    findings.error(
                        ValidationField::ProcessRpPercent,
                        "emissionsProcess.releasePointAppts.percent.total",
                        &args![display_total(total)],
                    );
                }
            }
        }
    }

    fn check_scc(&self, ctx: &ValidationContext<'_>, target: &ProcessTarget<'_>, findings: &mut Findings) {
        let process = target.process;
        let Some(code) = process.scc_code.as_deref().filter(|c| !c.trim().is_empty()) else {
            findings.error(ValidationField::ProcessInfoScc, "emissionsProcess.information.scc.required", &args![]);
            return;
        };
        if !is_valid_scc_format(code) {
            findings.error(ValidationField::ProcessInfoScc, "emissionsProcess.information.scc.format", &args![code]);
            return;
        }

        match ctx.reference.scc(code, ctx.all_records()) {
            None => {
                findings.error(ValidationField::ProcessInfoScc, "emissionsProcess.information.scc.invalid", &args![code]);
            }
            Some(scc) if scc.is_expired_for(ctx.report_year) => {
                let last = scc.last_inventory_year.map(|y| y.to_string()).unwrap_or_default();
                findings.error(
                    ValidationField::ProcessInfoScc,
                    "emissionsProcess.information.scc.expired",
                    &args![code, last],
                );
            }
            Some(scc) if scc.is_retired_for(ctx.report_year) => {
                let retired = scc.retired_year.map(|y| y.to_string()).unwrap_or_default();
                findings.warning(
                    ValidationField::ProcessInfoScc,
                    "emissionsProcess.information.scc.retired",
                    &args![code, retired],
                );
            }
            Some(_) => {}
        }

        if AIRCRAFT_SCCS.contains(&code) && is_blank(process.aircraft_engine_code.as_deref()) {
            findings.error(ValidationField::ProcessAircraftCode, "emissionsProcess.aircraftCode.required", &args![code]);
        }
    }

    fn check_status(&self, ctx: &ValidationContext<'_>, target: &ProcessTarget<'_>, findings: &mut Findings) {
        let unit = target.unit;
        let process = target.process;
        let status = process.status();

        match status {
            None => {
                findings.error(
                    ValidationField::ProcessStatusCode,
                    "emissionsProcess.statusTypeCode.required",
                    &args![process.identifier],
                );
                return;
            }
            Some(code) if !ctx.is_known_status(Some(code)) => {
                findings.error(ValidationField::ProcessStatusCode, "emissionsProcess.statusTypeCode.invalid", &args![code]);
                return;
            }
            Some(_) => {}
        }

        STATUS_YEAR.run(ctx, findings, status, process.status_year);

        let landfill = target.facility.is_landfill();
        if let (Some(process_year), Some(unit_year)) = (process.status_year, unit.status_year) {
            if is_operating(status) && is_operating(unit.status()) && !landfill && process_year < unit_year {
                findings.error(
                    ValidationField::ProcessStatusYear,
                    "emissionsProcess.statusYear.beforeUnitYear",
                    &args![unit.identifier],
                );
            }
        }

        if is_permanently_shutdown(process.previous_year_status_code.as_deref()) && !is_permanently_shutdown(status) {
            findings.error(ValidationField::ProcessStatusCode, "emissionsProcess.statusTypeCode.psPreviousYear", &args![]);
        }

        if process.previous_year_status_code.is_none() && is_shutdown(status) {
            findings.error(
                ValidationField::ProcessStatusCode,
                "emissionsProcess.statusTypeCode.newShutdown",
                &args![process.identifier],
            );
        }
    }
}

impl ValidationRule<scope::Process> for EmissionsProcessRule {
    fn name(&self) -> &'static str {
        "federal.emissions_process"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &ProcessTarget<'_>, findings: &mut Findings) -> bool {
        let process = target.process;

        if is_blank(Some(&process.identifier)) {
            findings.error(ValidationField::ProcessIdentifier, "emissionsProcess.processIdentifier.required", &args![]);
        }

        self.check_apportionment(target, findings);
        self.check_scc(ctx, target, findings);
        self.check_status(ctx, target, findings);

        if is_operating(process.status()) {
            for _ in process.reporting_periods.iter().filter(|p| p.emissions.is_empty()) {
                findings.error(
                    ValidationField::ProcessPeriodEmission,
                    "emissionsProcess.emission.required",
                    &args![process.identifier],
                );
            }
        }

        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::target::ValidationTarget;
    use airinv_models::{
        Emission, EmissionsProcess, EmissionsReport, EmissionsUnit, FacilitySite, ReleasePoint, ReportingPeriod,
        SccCode,
    };
    use airinv_utils::ValidationSettings;

    fn facility_with(process: EmissionsProcess, release_points: Vec<ReleasePoint>) -> FacilitySite {
        let mut unit = EmissionsUnit::new("B-1");
        unit.processes.push(process);
        let mut facility = FacilitySite::new("Plant");
        facility.release_points = release_points;
        facility.emissions_units.push(unit);
        facility
    }

    fn run_with(reference: &airinv_models::InMemoryReferenceData, facility: &FacilitySite) -> Findings {
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(reference, &settings, &report);
        let unit = &facility.emissions_units[0];
        let target = ProcessTarget {
            facility,
            unit,
            process: &unit.processes[0],
        };
        let mut findings = Findings::new(target.details());
        EmissionsProcessRule.validate(&ctx, &target, &mut findings);
        findings
    }

    fn run(facility: &FacilitySite) -> Findings {
        run_with(&fixtures::reference(), facility)
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    fn operating_process(stack: &ReleasePoint) -> EmissionsProcess {
        let mut process = EmissionsProcess::new("P-1", "10200303");
        process
            .release_point_appts
            .push(ReleasePointAppt::new(stack.id, Decimal::ONE_HUNDRED));
        process.reporting_periods.push(ReportingPeriod {
            emissions: vec![Emission::with_tons("CO", Decimal::ONE)],
            ..ReportingPeriod::default()
        });
        process
    }

    #[test]
    fn test_operating_process_passes() {
        let stack = ReleasePoint::fugitive("RP-1");
        let facility = facility_with(operating_process(&stack), vec![stack]);
        assert!(run(&facility).is_empty());
    }

    #[test]
    fn test_apportionment_rules() {
        let stack = ReleasePoint::fugitive("RP-1");
        let mut shut = ReleasePoint::fugitive("RP-2");
        shut.status_code = Some("PS".to_string());

        let mut process = operating_process(&stack);
        process.release_point_appts = vec![
            ReleasePointAppt::new(stack.id, Decimal::new(30, 0)),
            ReleasePointAppt::new(stack.id, Decimal::new(30, 0)),
            ReleasePointAppt::new(shut.id, Decimal::new(5, 1)),
        ];

        let facility = facility_with(process, vec![stack, shut]);
        assert_eq!(
            keys(&run(&facility)),
            vec![
                "emissionsProcess.releasePointAppts.duplicate",
                "emissionsProcess.releasePointAppts.statusTypeCode",
                "emissionsProcess.releasePointAppts.percent.range",
                "emissionsProcess.releasePointAppts.percent.total",
            ]
        );
    }

    #[test]
    fn test_overflowing_apportionment_reported_as_total() {
        let stack = ReleasePoint::fugitive("RP-1");
        let other = ReleasePoint::fugitive("RP-2");

        let mut process = operating_process(&stack);
        process.release_point_appts = vec![
            ReleasePointAppt::new(stack.id, Decimal::MAX),
            ReleasePointAppt::new(other.id, Decimal::MAX),
        ];

        let facility = facility_with(process, vec![stack, other]);
        let findings = run(&facility);
        assert_eq!(
            keys(&findings),
            vec![
                "emissionsProcess.releasePointAppts.percent.range",
                "emissionsProcess.releasePointAppts.percent.range",
                "emissionsProcess.releasePointAppts.percent.total",
            ]
        );
        assert_eq!(findings.entries()[2].field, ValidationField::ProcessRpPercent);
    }

    #[test]
    fn test_operating_process_needs_release_point() {
        let stack = ReleasePoint::fugitive("RP-1");
        let mut process = operating_process(&stack);
        process.release_point_appts.clear();
        let facility = facility_with(process, vec![stack]);
        assert_eq!(keys(&run(&facility)), vec!["emissionsProcess.releasePointAppts.required"]);
    }

    #[test]
    fn test_scc_checks() {
        let mut expired = SccCode::new("30100101", false);
        expired.last_inventory_year = Some(2019);
        let mut retired = SccCode::new("30100102", false);
        retired.retired_year = Some(2020);
        let reference = fixtures::reference().with_scc(expired).with_scc(retired);

        let stack = ReleasePoint::fugitive("RP-1");
        let mut process = operating_process(&stack);
        process.scc_code = Some("30100101".to_string());
        let facility = facility_with(process, vec![stack.clone()]);
        assert_eq!(keys(&run_with(&reference, &facility)), vec!["emissionsProcess.information.scc.expired"]);

        let mut process = operating_process(&stack);
        process.scc_code = Some("30100102".to_string());
        let facility = facility_with(process, vec![stack.clone()]);
        let findings = run_with(&reference, &facility);
        assert_eq!(keys(&findings), vec!["emissionsProcess.information.scc.retired"]);
        assert!(!findings.has_errors());

        let mut process = operating_process(&stack);
        process.scc_code = Some("99999999".to_string());
        let facility = facility_with(process, vec![stack]);
        assert_eq!(keys(&run(&facility)), vec!["emissionsProcess.information.scc.invalid"]);
    }

    #[test]
    fn test_malformed_scc() {
        let stack = ReleasePoint::fugitive("RP-1");
        let mut process = operating_process(&stack);
        process.scc_code = Some("102-0303".to_string());
        let facility = facility_with(process, vec![stack]);
        let findings = run(&facility);
        assert_eq!(keys(&findings), vec!["emissionsProcess.information.scc.format"]);
        assert_eq!(findings.entries()[0].field, ValidationField::ProcessInfoScc);
    }

    #[test]
    fn test_aircraft_scc_needs_engine() {
        let stack = ReleasePoint::fugitive("RP-1");
        let mut process = operating_process(&stack);
        process.scc_code = Some("2275001000".to_string());
        let facility = facility_with(process, vec![stack]);
        assert_eq!(keys(&run(&facility)), vec!["emissionsProcess.aircraftCode.required"]);
    }

    #[test]
    fn test_status_rules() {
        let stack = ReleasePoint::fugitive("RP-1");
        let mut process = operating_process(&stack);
        process.previous_year_status_code = Some("PS".to_string());
        process.status_year = Some(2010);
        let mut facility = facility_with(process, vec![stack]);
        facility.emissions_units[0].status_year = Some(2015);

        assert_eq!(
            keys(&run(&facility)),
            vec![
                "emissionsProcess.statusYear.beforeUnitYear",
                "emissionsProcess.statusTypeCode.psPreviousYear",
            ]
        );
    }

    #[test]
    fn test_period_without_emissions() {
        let stack = ReleasePoint::fugitive("RP-1");
        let mut process = operating_process(&stack);
        process.reporting_periods[0].emissions.clear();
        let facility = facility_with(process, vec![stack]);
        assert_eq!(keys(&run(&facility)), vec!["emissionsProcess.emission.required"]);
    }
}
