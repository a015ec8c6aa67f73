use rust_decimal::Decimal;

use airinv_models::status::is_shutdown;
use airinv_models::{ReportingPeriod, ValidationField};

use super::{duplicates, is_blank};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, PeriodTarget};

/// Period rules only run for processes that still operate.
pub(crate) fn period_applies(target: &PeriodTarget<'_>) -> bool {
    !is_shutdown(target.process.status())
}

pub struct ReportingPeriodRule;

impl ReportingPeriodRule {
    fn check_throughput(&self, ctx: &ValidationContext<'_>, period: &ReportingPeriod, findings: &mut Findings) {
        match period.operating_type_code.as_deref() {
            code if is_blank(code) => {
                findings.error(
                    ValidationField::PeriodOperatingTypeCode,
                    "reportingPeriod.operatingTypeCode.required",
                    &args![],
                );
            }
            Some(code) if ctx.reference.operating_type(code).is_none() => {
                findings.error(
                    ValidationField::PeriodOperatingTypeCode,
                    "reportingPeriod.operatingTypeCode.invalid",
                    &args![code],
                );
            }
            _ => {}
        }

        match period.calculation_parameter_value {
            None => findings.error(
                ValidationField::PeriodCalcValue,
                "reportingPeriod.calculationParameterValue.required",
                &args![],
            ),
            Some(value) if value < Decimal::ZERO => findings.error(
                ValidationField::PeriodCalcValue,
                "reportingPeriod.calculationParameterValue.min",
                &args![],
            ),
            Some(_) => {}
        }

        match period.calculation_material_code.as_deref() {
            code if is_blank(code) => {
                findings.error(
                    ValidationField::PeriodCalcMaterialCode,
                    "reportingPeriod.calculationMaterialCode.required",
                    &args![],
                );
            }
            Some(code) if ctx.reference.calculation_material(code).is_none() => {
                findings.error(
                    ValidationField::PeriodCalcMaterialCode,
                    "reportingPeriod.calculationMaterialCode.invalid",
                    &args![code],
                );
            }
            _ => {}
        }

        match period.calculation_parameter_type_code.as_deref() {
            code if is_blank(code) => {
                findings.error(
                    ValidationField::PeriodCalcTypeCode,
                    "reportingPeriod.calculationParameterTypeCode.required",
                    &args![],
                );
            }
            Some(code) if ctx.reference.calculation_parameter_type(code).is_none() => {
                findings.error(
                    ValidationField::PeriodCalcTypeCode,
                    "reportingPeriod.calculationParameterTypeCode.invalid",
                    &args![code],
                );
            }
            _ => {}
        }

        match period.calculation_parameter_uom.as_deref() {
            code if is_blank(code) => {
                findings.error(
                    ValidationField::PeriodCalcUom,
                    "reportingPeriod.calculationParameterUom.required",
                    &args![],
                );
            }
            Some(code) => match ctx.reference.unit_of_measure(code, ctx.all_records()) {
                None => findings.error(
                    ValidationField::PeriodCalcUom,
                    "reportingPeriod.calculationParameterUom.invalid",
                    &args![code],
                ),
                Some(uom) if uom.legacy => findings.error(
                    ValidationField::PeriodCalcUom,
                    "reportingPeriod.calculationParameterUom.legacy",
                    &args![code],
                ),
                Some(_) => {}
            },
            None => {}
        }
    }

    fn check_fuel_use(&self, ctx: &ValidationContext<'_>, target: &PeriodTarget<'_>, findings: &mut Findings) {
        let period = target.period;

        if period.has_fuel_use() && !period.has_complete_fuel_use() {
            findings.error(ValidationField::PeriodFuelUseValues, "reportingPeriod.fuelUseValues.required", &args![]);
        }

        let fuel_uom = match period.fuel_use_uom.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(code) => match ctx.reference.unit_of_measure(code, ctx.all_records()) {
                None => {
                    findings.error(ValidationField::PeriodFuelUom, "reportingPeriod.fuelUseUom.invalid", &args![code]);
                    None
                }
                Some(uom) => {
                    if uom.legacy {
                        findings.error(
                            ValidationField::PeriodFuelUom,
                            "reportingPeriod.fuelUseUom.legacy",
                            &args![uom.code],
                        );
                    }
                    Some(uom)
                }
            },
            None => None,
        };

        let Some(scc_code) = target.process.scc_code.as_deref() else {
            return;
        };
        let requires_fuel = ctx
            .reference
            .scc(scc_code, ctx.all_records())
            .map_or(false, |scc| scc.fuel_use_required);
        if !requires_fuel {
            return;
        }
        let Some(entry) = ctx.reference.fuel_use_scc(scc_code) else {
            return;
        };

        // One finding at most: a wrong material makes the unit check moot.
        if let Some(material) = period.fuel_use_material_code.as_deref() {
            if material != entry.calculation_material_code {
                findings.error(
                    ValidationField::PeriodSccFuelMaterial,
                    "reportingPeriod.fuelUseMaterial.required",
                    &args![scc_code, entry.calculation_material_code, material],
                );
                return;
            }
        }

        if let Some(uom) = &fuel_uom {
            if uom.fuel_use_type.is_some() && !entry.accepts_fuel_use_type(uom.fuel_use_type.as_deref()) {
                findings.error(
                    ValidationField::PeriodSccFuelMaterial,
                    "reportingPeriod.fuelUseMaterial.uom",
                    &args![scc_code, uom.code, entry.fuel_use_types.join(" or ")],
                );
            }
        }
    }
}

impl ValidationRule<scope::Period> for ReportingPeriodRule {
    fn name(&self) -> &'static str {
        "federal.reporting_period"
    }

    fn applies(&self, _ctx: &ValidationContext<'_>, target: &PeriodTarget<'_>) -> bool {
        period_applies(target)
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &PeriodTarget<'_>, findings: &mut Findings) -> bool {
        let period = target.period;

        self.check_throughput(ctx, period, findings);

        let description = findings.details().describe();
        for code in duplicates(period.emissions.iter().filter_map(|e| e.pollutant())) {
            findings.error(
                ValidationField::PeriodEmission,
                "reportingPeriod.emission.duplicate",
                &args![code, description],
            );
        }

        self.check_fuel_use(ctx, target, findings);

        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::target::ValidationTarget;
    use airinv_models::{Emission, EmissionsProcess, EmissionsReport, EmissionsUnit, FacilitySite};
    use airinv_utils::ValidationSettings;

    fn complete_period() -> ReportingPeriod {
        ReportingPeriod {
            operating_type_code: Some("R".to_string()),
            calculation_parameter_value: Some(Decimal::new(1500, 0)),
            calculation_material_code: Some("226".to_string()),
            calculation_parameter_type_code: Some("I".to_string()),
            calculation_parameter_uom: Some("TON".to_string()),
            emissions: vec![Emission::with_tons("CO", Decimal::ONE)],
            ..ReportingPeriod::default()
        }
    }

    fn run(scc: &str, period: ReportingPeriod) -> Findings {
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(&reference, &settings, &report);

        let facility = FacilitySite::new("Plant");
        let unit = EmissionsUnit::new("B-1");
        let mut process = EmissionsProcess::new("P-1", scc);
        process.reporting_periods.push(period);
        let target = PeriodTarget {
            facility: &facility,
            unit: &unit,
            process: &process,
            period: &process.reporting_periods[0],
        };
        let mut findings = Findings::new(target.details());
        ReportingPeriodRule.validate(&ctx, &target, &mut findings);
        findings
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    #[test]
    fn test_complete_period_passes() {
        assert!(run("10200303", complete_period()).is_empty());
    }

    #[test]
    fn test_throughput_checks() {
        let period = ReportingPeriod {
            operating_type_code: Some("Z".to_string()),
            calculation_parameter_value: Some(Decimal::new(-1, 0)),
            calculation_material_code: None,
            calculation_parameter_type_code: Some("Q".to_string()),
            calculation_parameter_uom: Some("E3TON".to_string()),
            ..complete_period()
        };
        assert_eq!(
            keys(&run("10200303", period)),
            vec![
                "reportingPeriod.operatingTypeCode.invalid",
                "reportingPeriod.calculationParameterValue.min",
                "reportingPeriod.calculationMaterialCode.required",
                "reportingPeriod.calculationParameterTypeCode.invalid",
                "reportingPeriod.calculationParameterUom.legacy",
            ]
        );
    }

    #[test]
    fn test_zero_throughput_allowed() {
        let period = ReportingPeriod {
            calculation_parameter_value: Some(Decimal::ZERO),
            calculation_parameter_type_code: Some("O".to_string()),
            ..complete_period()
        };
        assert!(run("10200303", period).is_empty());
    }

    #[test]
    fn test_unknown_fuel_uom() {
        let period = ReportingPeriod {
            fuel_use_value: Some(Decimal::TEN),
            fuel_use_material_code: Some("100".to_string()),
            fuel_use_uom: Some("NOPE".to_string()),
            ..complete_period()
        };
        let findings = run("10200303", period);
        assert_eq!(keys(&findings), vec!["reportingPeriod.fuelUseUom.invalid"]);
        assert_eq!(findings.entries()[0].field, ValidationField::PeriodFuelUom);
    }

    #[test]
    fn test_duplicate_pollutant_reported_once_per_code() {
        let mut period = complete_period();
        period.emissions.push(Emission::with_tons("CO", Decimal::TWO));
        period.emissions.push(Emission::with_tons("CO", Decimal::TEN));
        let findings = run("10200303", period);
        assert_eq!(keys(&findings), vec!["reportingPeriod.emission.duplicate"]);
        assert!(findings.entries()[0].message.contains("Emission Process: P-1"));
    }

    #[test]
    fn test_partial_fuel_use() {
        let period = ReportingPeriod {
            fuel_use_value: Some(Decimal::TEN),
            ..complete_period()
        };
        assert_eq!(keys(&run("10200303", period)), vec!["reportingPeriod.fuelUseValues.required"]);
    }

    #[test]
    fn test_fuel_material_mismatch_single_error() {
        let period = ReportingPeriod {
            fuel_use_value: Some(Decimal::TEN),
            fuel_use_material_code: Some("209".to_string()),
            fuel_use_uom: Some("TON".to_string()),
            ..complete_period()
        };
        let findings = run("10200302", period);
        assert_eq!(keys(&findings), vec!["reportingPeriod.fuelUseMaterial.required"]);
        assert_eq!(findings.entries()[0].field, ValidationField::PeriodSccFuelMaterial);
    }

    #[test]
    fn test_fuel_uom_type_mismatch() {
        let period = ReportingPeriod {
            fuel_use_value: Some(Decimal::TEN),
            fuel_use_material_code: Some("100".to_string()),
            fuel_use_uom: Some("E6FT3".to_string()),
            ..complete_period()
        };
        assert_eq!(keys(&run("10200302", period.clone())), vec!["reportingPeriod.fuelUseMaterial.uom"]);

        // Same values are fine for an SCC without a fuel requirement.
        assert!(run("10200303", period).is_empty());
    }

    #[test]
    fn test_matching_fuel_use_passes() {
        let period = ReportingPeriod {
            fuel_use_value: Some(Decimal::TEN),
            fuel_use_material_code: Some("100".to_string()),
            fuel_use_uom: Some("MMBTU".to_string()),
            ..complete_period()
        };
        assert!(run("10200302", period).is_empty());
    }
}
