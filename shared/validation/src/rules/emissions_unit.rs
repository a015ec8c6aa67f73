use airinv_models::status::{
    is_permanently_shutdown, is_shutdown, STATUS_PERMANENTLY_SHUTDOWN, STATUS_TEMPORARILY_SHUTDOWN,
};
use airinv_models::ValidationField;

use super::{is_blank, is_first_duplicate, StatusYearCheck};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, UnitTarget};

pub struct EmissionsUnitRule;

const STATUS_YEAR: StatusYearCheck<'static> = StatusYearCheck {
    field: ValidationField::EmissionsUnitStatusYear,
    required_key: "emissionsUnit.statusYear.required",
    range_key: "emissionsUnit.statusYear.range",
};

impl ValidationRule<scope::Unit> for EmissionsUnitRule {
    fn name(&self) -> &'static str {
        "federal.emissions_unit"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &UnitTarget<'_>, findings: &mut Findings) -> bool {
        let facility = target.facility;
        let unit = target.unit;
        let status = unit.status();

        if is_blank(Some(&unit.identifier)) {
            findings.error(ValidationField::EmissionsUnitIdentifier, "emissionsUnit.unitIdentifier.required", &args![]);
        } else if let Some(position) = facility.emissions_units.iter().position(|u| u.id == unit.id) {
            let siblings = facility.emissions_units.iter().map(|u| u.identifier.as_str());
            if is_first_duplicate(&unit.identifier, siblings, position) {
                findings.error(
                    ValidationField::EmissionsUnitIdentifier,
                    "emissionsUnit.unitIdentifier.duplicate",
                    &args![unit.identifier.trim()],
                );
            }
        }

        match status {
            None => {
                findings.error(
                    ValidationField::EmissionsUnitStatusCode,
                    "emissionsUnit.statusTypeCode.required",
                    &args![unit.identifier],
                );
                return false;
            }
            Some(code) if !ctx.is_known_status(Some(code)) => {
                findings.error(
                    ValidationField::EmissionsUnitStatusCode,
                    "emissionsUnit.statusTypeCode.invalid",
                    &args![unit.identifier, code],
                );
                return false;
            }
            Some(_) => {}
        }

        STATUS_YEAR.run(ctx, findings, status, unit.status_year);

        // Landfill units keep reporting processes after the unit shuts down.
        if !facility.is_landfill() {
            match status {
                Some(STATUS_TEMPORARILY_SHUTDOWN) => {
                    for process in unit.processes.iter().filter(|p| !is_shutdown(p.status())) {
                        findings.error(
                            ValidationField::EmissionsUnitStatusCode,
                            "emissionsUnit.statusTypeCode.tsProcess",
                            &args![unit.identifier, process.identifier],
                        );
                    }
                }
                Some(STATUS_PERMANENTLY_SHUTDOWN) => {
                    for process in unit.processes.iter().filter(|p| !is_permanently_shutdown(p.status())) {
                        findings.error(
                            ValidationField::EmissionsUnitStatusCode,
                            "emissionsUnit.statusTypeCode.psProcess",
                            &args![unit.identifier, process.identifier],
                        );
                    }
                }
                _ => {}
            }
        }

        if is_permanently_shutdown(status) {
            findings.warning(
                ValidationField::EmissionsUnitStatusCode,
                "emissionsUnit.statusTypeCode.psWarning",
                &args![unit.identifier],
            );
        }

        if unit.previous_year_status_code.is_none() && is_shutdown(status) {
            findings.error(
                ValidationField::EmissionsUnitStatusCode,
                "emissionsUnit.statusTypeCode.newShutdown",
                &args![unit.identifier],
            );
        }

        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::target::ValidationTarget;
    use airinv_models::{EmissionsProcess, EmissionsReport, EmissionsUnit, FacilitySite};
    use airinv_utils::ValidationSettings;

    fn run(facility: &FacilitySite, index: usize) -> Findings {
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(&reference, &settings, &report);
        let target = UnitTarget {
            facility,
            unit: &facility.emissions_units[index],
        };
        let mut findings = Findings::new(target.details());
        EmissionsUnitRule.validate(&ctx, &target, &mut findings);
        findings
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    fn shut_down_unit(status: &str, process_status: &str) -> EmissionsUnit {
        let mut unit = EmissionsUnit::new("B-1");
        unit.status_code = Some(status.to_string());
        unit.status_year = Some(2020);
        unit.previous_year_status_code = Some("OP".to_string());
        let mut process = EmissionsProcess::new("P-1", "10200303");
        process.status_code = Some(process_status.to_string());
        unit.processes.push(process);
        unit
    }

    #[test]
    fn test_operating_unit_passes() {
        let mut facility = FacilitySite::new("Plant");
        facility.emissions_units.push(EmissionsUnit::new("B-1"));
        assert!(run(&facility, 0).is_empty());
    }

    #[test]
    fn test_unknown_status() {
        let mut facility = FacilitySite::new("Plant");
        let mut unit = EmissionsUnit::new("B-1");
        unit.status_code = Some("XX".to_string());
        facility.emissions_units.push(unit);
        assert_eq!(keys(&run(&facility, 0)), vec!["emissionsUnit.statusTypeCode.invalid"]);
    }

    #[test]
    fn test_ts_unit_requires_shutdown_processes() {
        let mut facility = FacilitySite::new("Plant");
        facility.emissions_units.push(shut_down_unit("TS", "OP"));
        assert_eq!(keys(&run(&facility, 0)), vec!["emissionsUnit.statusTypeCode.tsProcess"]);

        let mut facility = FacilitySite::new("Plant");
        facility.emissions_units.push(shut_down_unit("TS", "PS"));
        assert!(run(&facility, 0).is_empty());
    }

    #[test]
    fn test_ps_unit_warns_and_requires_ps_processes() {
        let mut facility = FacilitySite::new("Plant");
        facility.emissions_units.push(shut_down_unit("PS", "TS"));
        assert_eq!(
            keys(&run(&facility, 0)),
            vec!["emissionsUnit.statusTypeCode.psProcess", "emissionsUnit.statusTypeCode.psWarning"]
        );
    }

    #[test]
    fn test_landfill_exempt_from_process_checks() {
        let mut facility = FacilitySite::new("Landfill");
        facility.source_type_code = Some("104".to_string());
        facility.emissions_units.push(shut_down_unit("TS", "OP"));
        assert!(run(&facility, 0).is_empty());
    }

    #[test]
    fn test_new_unit_already_shut_down() {
        let mut facility = FacilitySite::new("Plant");
        let mut unit = shut_down_unit("TS", "TS");
        unit.previous_year_status_code = None;
        facility.emissions_units.push(unit);
        assert_eq!(keys(&run(&facility, 0)), vec!["emissionsUnit.statusTypeCode.newShutdown"]);
    }

    #[test]
    fn test_duplicate_identifier_reported_once() {
        let mut facility = FacilitySite::new("Plant");
        facility.emissions_units.push(EmissionsUnit::new("B-1"));
        facility.emissions_units.push(EmissionsUnit::new("b-1"));
        assert_eq!(keys(&run(&facility, 0)), vec!["emissionsUnit.unitIdentifier.duplicate"]);
        assert!(run(&facility, 1).is_empty());
    }
}
