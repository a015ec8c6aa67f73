use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use airinv_calculation::Formula;
use airinv_models::status::is_shutdown;
use airinv_models::{CalculationMethod, Emission, UnitOfMeasure, ValidationField};
use airinv_utils::ValidationSettings;

use super::is_blank;
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::result::{Severity, ValidationDetails};
use crate::target::{scope, EmissionTarget, ValidationTarget};

/// Radionuclides are reported in curies.
pub const RADIONUCLIDE_POLLUTANT: &str = "605";
pub const CURIE_UOM: &str = "CURIE";
/// Engineering judgment totals need an explanation.
pub const ENGINEERING_JUDGMENT_METHOD: &str = "2";

const ASH_VARIABLE: &str = "A";
const SULFUR_VARIABLE: &str = "SU";

/// Allowed gap between a manually entered total and the calculated one, as
/// fractions of the calculated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionTolerance {
    pub error: Decimal,
    pub warning: Decimal,
}

/// Outcome of a tolerance comparison that exceeded at least the warning level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceFinding {
    pub severity: Severity,
    pub provided: Decimal,
    pub calculated: Decimal,
    pub tolerance: Decimal,
}

impl ToleranceFinding {
    pub fn record(&self, findings: &mut Findings, details: ValidationDetails) {
        let percent = (self.tolerance * Decimal::ONE_HUNDRED).normalize();
        let args = args![self.provided.normalize(), self.calculated.normalize(), percent];
        match self.severity {
            Severity::Error => findings.error_at(
                details,
                ValidationField::EmissionTotalEmissions,
                "emission.totalEmissions.tolerance",
                &args,
            ),
            Severity::Warning => findings.warning_at(
                details,
                ValidationField::EmissionTotalEmissions,
                "emission.totalEmissions.tolerance",
                &args,
            ),
        }
    }
}

impl EmissionTolerance {
    pub fn from_fractions(error: f64, warning: f64) -> Self {
        Self {
            error: Decimal::from_f64(error).unwrap_or(Decimal::ZERO),
            warning: Decimal::from_f64(warning).unwrap_or(Decimal::ZERO),
        }
    }

    /// Compares a manual total against the factor-based calculation. Emissions
    /// without a manual total and factor, or whose calculation fails, are skipped.
    pub fn assess(&self, ctx: &ValidationContext<'_>, target: &EmissionTarget<'_>) -> Option<ToleranceFinding> {
        let emission = target.emission;
        if !emission.total_manual_entry || !has_factor(emission) {
            return None;
        }
        let provided = emission.total_emissions?;
        let raw = ctx.calculator.raw_total(emission, target.period, ctx.report_year).ok()?;
        let calculated = ctx.calculator.policy().apply(raw.total);
        let Some(difference) = calculated.checked_sub(provided).map(|d| d.abs()) else {
            return Some(ToleranceFinding {
                severity: Severity::Error,
                provided,
                calculated,
                tolerance: self.error,
            });
        };

        // An overflowing limit is larger than any representable difference.
        let exceeds = |tolerance: Decimal| {
            calculated
                .checked_mul(tolerance)
                .is_some_and(|limit| difference > limit.abs())
        };
        let (severity, tolerance) = if exceeds(self.error) {
            (Severity::Error, self.error)
        } else if exceeds(self.warning) {
            (Severity::Warning, self.warning)
        } else {
            return None;
        };

        Some(ToleranceFinding {
            severity,
            provided,
            calculated,
            tolerance,
        })
    }
}

fn has_factor(emission: &Emission) -> bool {
    emission.emissions_factor.is_some() || emission.uses_formula()
}

pub struct EmissionRule {
    tolerance: EmissionTolerance,
}

impl EmissionRule {
    pub fn new(tolerance: EmissionTolerance) -> Self {
        Self { tolerance }
    }

    pub fn from_settings(settings: &ValidationSettings) -> Self {
        Self::new(EmissionTolerance::from_fractions(
            settings.emissions_total_error_tolerance,
            settings.emissions_total_warning_tolerance,
        ))
    }

    fn check_pollutant(&self, ctx: &ValidationContext<'_>, emission: &Emission, findings: &mut Findings) {
        let Some(code) = emission.pollutant().filter(|c| !c.trim().is_empty()) else {
            findings.error(ValidationField::EmissionPollutant, "emission.pollutant.required", &args![]);
            return;
        };

        match ctx.reference.pollutant(code, ctx.all_records()) {
            None => findings.error(ValidationField::EmissionPollutant, "emission.pollutant.invalid", &args![code]),
            Some(pollutant) if pollutant.is_legacy_for(ctx.report_year) => {
                let last = pollutant.last_inventory_year.map(|y| y.to_string()).unwrap_or_default();
                findings.error(ValidationField::EmissionPollutant, "pollutant.legacy", &args![code, last]);
            }
            Some(_) => {}
        }

        if code == RADIONUCLIDE_POLLUTANT && emission.emissions_uom.as_deref() != Some(CURIE_UOM) {
            findings.error(ValidationField::EmissionCurieUom, "emission.emissionsCurieUom.required", &args![code]);
        }
    }

    fn check_method(
        &self,
        ctx: &ValidationContext<'_>,
        emission: &Emission,
        findings: &mut Findings,
    ) -> Option<CalculationMethod> {
        let Some(code) = emission.calculation_method_code.as_deref().filter(|c| !c.trim().is_empty()) else {
            findings.error(ValidationField::EmissionCalcMethod, "emission.emissionsCalcMethodCode.required", &args![]);
            return None;
        };
        let Some(method) = ctx.reference.calculation_method(code) else {
            findings.error(ValidationField::EmissionCalcMethod, "emission.emissionsCalcMethodCode.invalid", &args![code]);
            return None;
        };

        if method.total_direct_entry {
            if method.code == ENGINEERING_JUDGMENT_METHOD && is_blank(emission.comments.as_deref()) {
                findings.error(
                    ValidationField::EmissionComments,
                    "emission.comments.required.method",
                    &args![method.description],
                );
            }
            if emission.emissions_factor.is_some() {
                findings.error(
                    ValidationField::EmissionFactor,
                    "emission.emissionsFactor.banned.method",
                    &args![method.description],
                );
            }
        } else {
            if !has_factor(emission) {
                findings.error(
                    ValidationField::EmissionFactor,
                    "emission.emissionsFactor.required.method",
                    &args![method.description],
                );
            }
            if is_blank(emission.emissions_factor_text.as_deref()) {
                findings.error(
                    ValidationField::EmissionFactorText,
                    "emission.emissionsFactorText.required.emissionsFactor",
                    &args![method.description],
                );
            }
        }

        if method.control_indicator {
            if let Some(control) = emission.overall_control_percent.filter(|c| !c.is_zero()) {
                findings.error(
                    ValidationField::EmissionControlPercent,
                    "emission.controlPercent.invalid",
                    &args![method.code, control.normalize()],
                );
            }
        }

        Some(method)
    }

    /// Resolves a unit code, recording unknown and legacy codes against `field`.
    fn lookup_uom(
        &self,
        ctx: &ValidationContext<'_>,
        code: &str,
        field: ValidationField,
        (invalid_key, legacy_key): (&str, &str),
        findings: &mut Findings,
    ) -> Option<UnitOfMeasure> {
        let Some(uom) = ctx.reference.unit_of_measure(code, ctx.all_records()) else {
            findings.error(field, invalid_key, &args![code]);
            return None;
        };
        if uom.legacy {
            findings.error(field, legacy_key, &args![uom.code]);
        }
        Some(uom)
    }

    fn check_units(&self, ctx: &ValidationContext<'_>, target: &EmissionTarget<'_>, findings: &mut Findings) {
        let emission = target.emission;

        let emission_uom = match emission.emissions_uom.as_deref() {
            code if is_blank(code) => {
                findings.error(ValidationField::EmissionUom, "emission.emissionsUom.required", &args![]);
                None
            }
            Some(code) => self.lookup_uom(
                ctx,
                code,
                ValidationField::EmissionUom,
                ("emission.emissionsUom.invalid", "emission.emissionsUom.legacy"),
                findings,
            ),
            None => None,
        };

        if !has_factor(emission) {
            if emission.emissions_numerator_uom.is_some() {
                findings.error(
                    ValidationField::EmissionNumeratorUom,
                    "emission.emissionsNumeratorUom.banned.emissionsFactor",
                    &args![],
                );
            }
            if emission.emissions_denominator_uom.is_some() {
                findings.error(
                    ValidationField::EmissionDenominatorUom,
                    "emission.emissionsDenominatorUom.banned.emissionsFactor",
                    &args![],
                );
            }
            return;
        }

        if let Some(factor) = emission.emissions_factor {
            if factor <= Decimal::ZERO {
                findings.error(ValidationField::EmissionFactor, "emission.emissionsFactor.range", &args![]);
            }
        }

        let numerator = match emission.emissions_numerator_uom.as_deref() {
            Some(code) if !code.trim().is_empty() => self.lookup_uom(
                ctx,
                code,
                ValidationField::EmissionNumeratorUom,
                ("emission.emissionsNumeratorUom.invalid", "emission.emissionsNumeratorUom.legacy"),
                findings,
            ),
            _ => {
                findings.error(
                    ValidationField::EmissionNumeratorUom,
                    "emission.emissionsNumeratorUom.required.emissionsFactor",
                    &args![],
                );
                None
            }
        };

        let denominator = match emission.emissions_denominator_uom.as_deref() {
            Some(code) if !code.trim().is_empty() => self.lookup_uom(
                ctx,
                code,
                ValidationField::EmissionDenominatorUom,
                ("emission.emissionsDenominatorUom.invalid", "emission.emissionsDenominatorUom.legacy"),
                findings,
            ),
            _ => {
                findings.error(
                    ValidationField::EmissionDenominatorUom,
                    "emission.emissionsDenominatorUom.required.emissionsFactor",
                    &args![],
                );
                None
            }
        };

        if let (Some(numerator), Some(emission_uom)) = (&numerator, &emission_uom) {
            if numerator.unit_type != emission_uom.unit_type {
                findings.error(
                    ValidationField::EmissionNumeratorUom,
                    "emission.emissionsNumeratorUom.mismatch",
                    &args![numerator.code, emission_uom.code],
                );
            }
        }

        let period_uom = target
            .period
            .calculation_parameter_uom
            .as_deref()
            .and_then(|code| ctx.reference.unit_of_measure(code, ctx.all_records()));
        if let (Some(denominator), Some(period_uom)) = (&denominator, &period_uom) {
            if denominator.unit_type != period_uom.unit_type {
                findings.error(
                    ValidationField::EmissionDenominatorUom,
                    "emission.emissionsDenominatorUom.mismatch",
                    &args![denominator.code, period_uom.code],
                );
            }
        }
    }

    fn check_formula(&self, emission: &Emission, findings: &mut Findings) {
        if !emission.uses_formula() {
            if !emission.variables.is_empty() {
                findings.error(
                    ValidationField::EmissionFormulaVariable,
                    "emission.formula.variable.invalid",
                    &args![],
                );
            }
            return;
        }

        let source = emission.emissions_factor_formula.as_deref().unwrap_or_default();
        match Formula::parse(source) {
            Err(e) => findings.error(ValidationField::EmissionFormulaVariable, "emission.formula.invalid", &args![source, e]),
            Ok(formula) => {
                let missing = formula.missing_variables(&emission.bindings());
                if !missing.is_empty() {
                    findings.error(
                        ValidationField::EmissionFormulaVariable,
                        "emission.formula.variable.missing",
                        &args![missing.join(", ")],
                    );
                }
            }
        }

        let bounded = [
            (ASH_VARIABLE, Decimal::new(1, 2), Decimal::from(30), "emission.formula.variable.ashRange"),
            (SULFUR_VARIABLE, Decimal::new(1, 5), Decimal::TEN, "emission.formula.variable.sulfurRange"),
        ];
        for (code, min, max, key) in bounded {
            if let Some(value) = emission.variable(code).and_then(|v| v.value) {
                if value < min || value > max {
                    findings.error(ValidationField::EmissionFormulaVariable, key, &args![]);
                }
            }
        }
    }
}

impl ValidationRule<scope::Emission> for EmissionRule {
    fn name(&self) -> &'static str {
        "federal.emission"
    }

    fn applies(&self, _ctx: &ValidationContext<'_>, target: &EmissionTarget<'_>) -> bool {
        !is_shutdown(target.process.status())
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &EmissionTarget<'_>, findings: &mut Findings) -> bool {
        let emission = target.emission;

        self.check_pollutant(ctx, emission, findings);
        self.check_method(ctx, emission, findings);
        self.check_units(ctx, target, findings);
        self.check_formula(emission, findings);

        match emission.total_emissions {
            None => findings.error(ValidationField::EmissionTotalEmissions, "emission.totalEmissions.required", &args![]),
            Some(total) if total < Decimal::ZERO => {
                findings.error(ValidationField::EmissionTotalEmissions, "emission.totalEmissions.range", &args![])
            }
            Some(_) => {}
        }

        if let Some(control) = emission.overall_control_percent {
            if control < Decimal::ZERO || control >= Decimal::ONE_HUNDRED {
                findings.error(ValidationField::EmissionControlPercent, "emission.controlPercent.range", &args![]);
            }
        }

        if emission.total_manual_entry && has_factor(emission) {
            if is_blank(emission.calculation_comment.as_deref()) {
                findings.error(
                    ValidationField::EmissionCalcDescription,
                    "emission.calculationDescription.required",
                    &args![],
                );
            }
        }

        // Skip tolerance once the inputs are known to be bad.
        if !findings.has_errors() {
            if let Some(outcome) = self.tolerance.assess(ctx, target) {
                outcome.record(findings, target.details());
            }
        }

        !findings.has_errors()
    }
}
