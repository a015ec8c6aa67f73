//! Extra rules a program system (state or local agency) layers on top of the
//! federal set. Built from `JurisdictionConfig` when the registry is created.

use airinv_models::status::is_shutdown;
use airinv_models::{EmissionsReport, ValidationField};
use airinv_utils::ValidationSettings;

use super::emission::EmissionTolerance;
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::result::Severity;
use crate::target::{scope, EmissionTarget, FacilityTarget, PeriodTarget, ReportTarget, ValidationTarget};

/// Periods of every process that still operates, across all facilities.
fn operating_periods(report: &EmissionsReport) -> impl Iterator<Item = PeriodTarget<'_>> {
    report.facility_sites.iter().flat_map(|facility| {
        facility.emissions_units.iter().flat_map(move |unit| {
            unit.processes
                .iter()
                .filter(|process| !is_shutdown(process.status()))
                .flat_map(move |process| {
                    process.reporting_periods.iter().map(move |period| PeriodTarget {
                        facility,
                        unit,
                        process,
                        period,
                    })
                })
        })
    })
}

pub struct RequiredNaicsTypesRule {
    program_system_code: String,
    types: Vec<String>,
}

impl RequiredNaicsTypesRule {
    pub fn new(program_system_code: &str, types: &[String]) -> Self {
        Self {
            program_system_code: program_system_code.to_string(),
            types: types.iter().map(|t| t.trim().to_lowercase()).collect(),
        }
    }
}

impl ValidationRule<scope::Facility> for RequiredNaicsTypesRule {
    fn name(&self) -> &'static str {
        "jurisdiction.required_naics_types"
    }

    fn validate(&self, _ctx: &ValidationContext<'_>, target: &FacilityTarget<'_>, findings: &mut Findings) -> bool {
        for required in &self.types {
            let present = target
                .facility
                .naics
                .iter()
                .any(|naics| naics.naics_type.to_string() == *required);
            if !present {
                findings.error(
                    ValidationField::FacilityNaics,
                    "facilitysite.naics.type.required",
                    &args![required, self.program_system_code],
                );
            }
        }

        !findings.has_errors()
    }
}

/// Re-checks manual totals against tighter jurisdiction tolerances. Only
/// findings more severe than the federal outcome are reported, so nothing is
/// flagged twice.
pub struct JurisdictionToleranceRule {
    jurisdiction: EmissionTolerance,
    federal: EmissionTolerance,
}

impl JurisdictionToleranceRule {
    pub fn new(error: Option<f64>, warning: Option<f64>, settings: &ValidationSettings) -> Self {
        Self {
            jurisdiction: EmissionTolerance::from_fractions(
                error.unwrap_or(settings.emissions_total_error_tolerance),
                warning.unwrap_or(settings.emissions_total_warning_tolerance),
            ),
            federal: EmissionTolerance::from_fractions(
                settings.emissions_total_error_tolerance,
                settings.emissions_total_warning_tolerance,
            ),
        }
    }
}

fn rank(severity: Option<Severity>) -> u8 {
    match severity {
        None => 0,
        Some(Severity::Warning) => 1,
        Some(Severity::Error) => 2,
    }
}

impl ValidationRule<scope::Report> for JurisdictionToleranceRule {
    fn name(&self) -> &'static str {
        "jurisdiction.emission_tolerance"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &ReportTarget<'_>, findings: &mut Findings) -> bool {
        for period in operating_periods(target.report) {
            for emission in &period.period.emissions {
                let emission_target = EmissionTarget {
                    unit: period.unit,
                    process: period.process,
                    period: period.period,
                    emission,
                };

                let Some(outcome) = self.jurisdiction.assess(ctx, &emission_target) else {
                    continue;
                };
                let federal = self.federal.assess(ctx, &emission_target).map(|f| f.severity);
                if rank(Some(outcome.severity)) > rank(federal) {
                    outcome.record(findings, emission_target.details());
                }
            }
        }

        !findings.has_errors()
    }
}

/// Jurisdictions that collect fuel use for every SCC flagged as fuel-burning.
pub struct FuelUseRequiredRule {
    program_system_code: String,
}

impl FuelUseRequiredRule {
    pub fn new(program_system_code: &str) -> Self {
        Self {
            program_system_code: program_system_code.to_string(),
        }
    }
}

impl ValidationRule<scope::Report> for FuelUseRequiredRule {
    fn name(&self) -> &'static str {
        "jurisdiction.fuel_use_required"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &ReportTarget<'_>, findings: &mut Findings) -> bool {
        for period in operating_periods(target.report) {
            let Some(scc_code) = period.process.scc_code.as_deref() else {
                continue;
            };
            let requires_fuel = ctx
                .reference
                .scc(scc_code, ctx.all_records())
                .map_or(false, |scc| scc.fuel_use_required);

            // Partially reported fuel use is already a federal finding.
            if requires_fuel && !period.period.has_fuel_use() {
                let details = period.details();
                let description = details.describe();
                findings.error_at(
                    details,
                    ValidationField::PeriodFuelUseValues,
                    "reportingPeriod.fuelUseValues.sccRequired",
                    &args![scc_code, description],
                );
            }
        }

        tracing::debug!(
            program_system_code = %self.program_system_code,
            findings = findings.len(),
            "Fuel use requirement checked"
        );
        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use airinv_models::{
        Emission, EmissionsProcess, EmissionsUnit, FacilityNaics, FacilitySite, NaicsType, ReportingPeriod,
    };
    use rust_decimal::Decimal;

    fn report_with(process: EmissionsProcess) -> EmissionsReport {
        let mut unit = EmissionsUnit::new("B-1");
        unit.processes.push(process);
        let mut facility = FacilitySite::new("Plant");
        facility.emissions_units.push(unit);
        let mut report = EmissionsReport::new(2021, "GADNR");
        report.facility_sites.push(facility);
        report
    }

    fn run_report(rule: &dyn ValidationRule<scope::Report>, report: &EmissionsReport) -> Findings {
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let ctx = fixtures::context(&reference, &settings, report);
        let target = ReportTarget { report };
        let mut findings = Findings::new(target.details());
        rule.validate(&ctx, &target, &mut findings);
        findings
    }

    fn manual_emission(total: i64) -> Emission {
        Emission {
            pollutant_code: Some("NOX".to_string()),
            calculation_method_code: Some("8".to_string()),
            emissions_factor: Some(Decimal::TWO),
            emissions_factor_text: Some("AP-42".to_string()),
            emissions_numerator_uom: Some("LB".to_string()),
            emissions_denominator_uom: Some("TON".to_string()),
            emissions_uom: Some("LB".to_string()),
            total_manual_entry: true,
            total_emissions: Some(Decimal::from(total)),
            calculation_comment: Some("CEMS".to_string()),
            ..Emission::default()
        }
    }

    fn process_with(emission: Emission) -> EmissionsProcess {
        let mut process = EmissionsProcess::new("P-1", "10200303");
        process.reporting_periods.push(ReportingPeriod {
            calculation_parameter_value: Some(Decimal::from(100)),
            calculation_parameter_uom: Some("TON".to_string()),
            emissions: vec![emission],
            ..ReportingPeriod::default()
        });
        process
    }

    #[test]
    fn test_required_naics_types() {
        let rule = RequiredNaicsTypesRule::new("GADNR", &["Primary".to_string(), "secondary".to_string()]);
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let mut report = EmissionsReport::new(2021, "GADNR");
        let mut facility = FacilitySite::new("Plant");
        facility.naics.push(FacilityNaics::new("562212", NaicsType::Primary));
        report.facility_sites.push(facility);
        let ctx = fixtures::context(&reference, &settings, &report);

        let target = FacilityTarget {
            report: &report,
            facility: &report.facility_sites[0],
        };
        let mut findings = Findings::new(target.details());
        assert!(!rule.validate(&ctx, &target, &mut findings));
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings.entries()[0].message,
            "A secondary NAICS code is required for facilities reporting to GADNR."
        );
    }

    #[test]
    fn test_stricter_tolerance_escalates() {
        let settings = ValidationSettings::default();
        let rule = JurisdictionToleranceRule::new(Some(0.01), Some(0.001), &settings);

        // 3% off: federal warning, jurisdiction error.
        let findings = run_report(&rule, &report_with(process_with(manual_emission(206))));
        assert_eq!(findings.len(), 1);
        assert!(findings.has_errors());
        assert_eq!(findings.entries()[0].field, ValidationField::EmissionTotalEmissions);

        // 0.5% off: federal silent, jurisdiction warning.
        let findings = run_report(&rule, &report_with(process_with(manual_emission(201))));
        assert_eq!(findings.len(), 1);
        assert!(!findings.has_errors());

        // 10% off: already a federal error, nothing added.
        assert!(run_report(&rule, &report_with(process_with(manual_emission(220)))).is_empty());
    }

    #[test]
    fn test_fuel_use_required() {
        let rule = FuelUseRequiredRule::new("GADNR");

        let mut process = process_with(Emission::with_tons("CO", Decimal::ONE));
        process.scc_code = Some("10200302".to_string());
        let findings = run_report(&rule, &report_with(process.clone()));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.entries()[0].field, ValidationField::PeriodFuelUseValues);

        process.status_code = Some("TS".to_string());
        assert!(run_report(&rule, &report_with(process)).is_empty());

        let other = process_with(Emission::with_tons("CO", Decimal::ONE));
        assert!(run_report(&rule, &report_with(other)).is_empty());
    }
}
