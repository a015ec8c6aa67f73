//! Emission totals from throughput, emission factors and unit conversions.

use std::collections::HashMap;

use airinv_models::{
    Emission, EmissionsReport, LegacyFilter, ReferenceData, ReportingPeriod, UnitOfMeasure,
    ValidationField,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CalculationError, CalculationErrorKind, CalculationResult};
use crate::formula::FormulaEvaluator;
use crate::precision::PrecisionPolicy;
use crate::units::{UnitConversion, SHORT_TON};

/// Unrounded result of a factor-based calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCalculation {
    pub emission_factor: Decimal,
    pub total: Decimal,
}

/// Outcome of a whole-report recalculation. Failures do not stop the batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub updated: Vec<Uuid>,
    pub failures: Vec<CalculationError>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One row of the bulk emissions entry screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkEntryRow {
    pub emission_id: Uuid,
    pub emissions_factor: Option<Decimal>,
    pub total_emissions: Option<Decimal>,
    #[serde(default)]
    pub calculated_emissions_tons: Option<Decimal>,
    #[serde(default)]
    pub calculation_failed: bool,
    #[serde(default)]
    pub calculation_failure_message: Option<String>,
}

impl BulkEntryRow {
    fn fail(&mut self, message: impl Into<String>) {
        self.calculation_failed = true;
        self.calculation_failure_message = Some(message.into());
    }
}

pub struct EmissionCalculator<'a> {
    reference: &'a dyn ReferenceData,
    policy: PrecisionPolicy,
    formulas: FormulaEvaluator,
    leap_year_aware: bool,
}

impl<'a> EmissionCalculator<'a> {
    pub fn new(reference: &'a dyn ReferenceData) -> Self {
        Self {
            reference,
            policy: PrecisionPolicy::default(),
            formulas: FormulaEvaluator::new(),
            leap_year_aware: true,
        }
    }

    pub fn with_policy(mut self, policy: PrecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_leap_year_aware(mut self, leap_year_aware: bool) -> Self {
        self.leap_year_aware = leap_year_aware;
        self
    }

    pub fn policy(&self) -> PrecisionPolicy {
        self.policy
    }

    pub fn reference(&self) -> &'a dyn ReferenceData {
        self.reference
    }

    pub fn units_for(&self, report_year: i16) -> UnitConversion {
        UnitConversion::for_report_year(report_year, self.leap_year_aware)
    }

    fn error(
        emission: &Emission,
        field: ValidationField,
        kind: impl Into<CalculationErrorKind>,
    ) -> CalculationError {
        CalculationError {
            emission_id: emission.id,
            pollutant_code: emission.pollutant_code.clone(),
            field,
            kind: kind.into(),
        }
    }

    fn unit(
        &self,
        emission: &Emission,
        code: Option<&str>,
        field: ValidationField,
    ) -> CalculationResult<UnitOfMeasure> {
        let code = code.ok_or_else(|| Self::error(emission, field, CalculationErrorKind::MissingInput))?;
        self.reference
            .unit_of_measure(code, LegacyFilter::All)
            .ok_or_else(|| {
                Self::error(emission, field, CalculationErrorKind::UnknownUnit(code.to_string()))
            })
    }

    /// Manual totals and direct-entry methods keep the user's figure.
    pub fn is_direct_entry(&self, emission: &Emission) -> bool {
        emission.total_manual_entry
            || emission
                .calculation_method_code
                .as_deref()
                .and_then(|code| self.reference.calculation_method(code))
                .map_or(false, |method| method.total_direct_entry)
    }

    /// The stored factor, or the formula result when the emission uses one.
    pub fn emission_factor(&self, emission: &Emission) -> CalculationResult<Decimal> {
        if emission.uses_formula() {
            let formula = emission.emissions_factor_formula.as_deref().unwrap_or_default();
            return self
                .formulas
                .evaluate(formula, &emission.bindings())
                .map_err(|e| Self::error(emission, ValidationField::EmissionFormulaVariable, e));
        }

        emission.emissions_factor.ok_or_else(|| {
            Self::error(emission, ValidationField::EmissionFactor, CalculationErrorKind::MissingInput)
        })
    }

    /// Factor × throughput, converted into the emission's unit and reduced by
    /// the overall control percent. No rounding is applied.
    pub fn raw_total(
        &self,
        emission: &Emission,
        period: &ReportingPeriod,
        report_year: i16,
    ) -> CalculationResult<RawCalculation> {
        let period_uom = self.unit(
            emission,
            period.calculation_parameter_uom.as_deref(),
            ValidationField::PeriodCalcUom,
        )?;
        let emission_uom = self.unit(
            emission,
            emission.emissions_uom.as_deref(),
            ValidationField::EmissionUom,
        )?;
        let numerator = self.unit(
            emission,
            emission.emissions_numerator_uom.as_deref(),
            ValidationField::EmissionNumeratorUom,
        )?;
        let denominator = self.unit(
            emission,
            emission.emissions_denominator_uom.as_deref(),
            ValidationField::EmissionDenominatorUom,
        )?;

        if period_uom.unit_type != denominator.unit_type {
            return Err(Self::error(
                emission,
                ValidationField::EmissionDenominatorUom,
                CalculationErrorKind::UnitTypeMismatch {
                    from: period_uom.unit_type,
                    to: denominator.unit_type,
                },
            ));
        }
        if emission_uom.unit_type != numerator.unit_type {
            return Err(Self::error(
                emission,
                ValidationField::EmissionNumeratorUom,
                CalculationErrorKind::UnitTypeMismatch {
                    from: numerator.unit_type,
                    to: emission_uom.unit_type,
                },
            ));
        }

        let emission_factor = self.emission_factor(emission)?;
        let throughput = period.calculation_parameter_value.ok_or_else(|| {
            Self::error(emission, ValidationField::PeriodCalcValue, CalculationErrorKind::MissingInput)
        })?;

        let overflow = |field| Self::error(emission, field, CalculationErrorKind::Overflow);
        let units = self.units_for(report_year);

        let mut total = emission_factor
            .checked_mul(throughput)
            .ok_or_else(|| overflow(ValidationField::EmissionTotalEmissions))?;

        if period_uom.code != denominator.code {
            let factor = units
                .factor(&period_uom.calculation_variable, &denominator.calculation_variable)
                .map_err(|e| Self::error(emission, ValidationField::EmissionDenominatorUom, e))?;
            total = total
                .checked_mul(factor)
                .ok_or_else(|| overflow(ValidationField::EmissionDenominatorUom))?;
        }

        if numerator.code != emission_uom.code {
            let factor = units
                .factor(&numerator.calculation_variable, &emission_uom.calculation_variable)
                .map_err(|e| Self::error(emission, ValidationField::EmissionNumeratorUom, e))?;
            total = total
                .checked_mul(factor)
                .ok_or_else(|| overflow(ValidationField::EmissionNumeratorUom))?;
        }

        if let Some(control) = emission.overall_control_percent {
            total = (Decimal::ONE_HUNDRED - control)
                .checked_mul(total)
                .and_then(|t| t.checked_div(Decimal::ONE_HUNDRED))
                .ok_or_else(|| overflow(ValidationField::EmissionControlPercent))?;
        }

        Ok(RawCalculation {
            emission_factor,
            total,
        })
    }

    /// `total` expressed in short tons, or `None` when the emission is not
    /// reported in a mass unit.
    pub fn emissions_tons(
        &self,
        emission: &Emission,
        total: Decimal,
        report_year: i16,
    ) -> CalculationResult<Option<Decimal>> {
        let uom = self.unit(emission, emission.emissions_uom.as_deref(), ValidationField::EmissionUom)?;
        let units = self.units_for(report_year);
        if !units.is_mass(&uom.calculation_variable) {
            return Ok(None);
        }

        let tons = units
            .convert(total, &uom.calculation_variable, SHORT_TON)
            .map_err(|e| Self::error(emission, ValidationField::EmissionUom, e))?;
        Ok(Some(self.policy.apply(tons)))
    }

    /// Returns the emission with its total, factor and ton figures recomputed.
    pub fn calculate_total_emissions(
        &self,
        emission: &Emission,
        period: &ReportingPeriod,
        report_year: i16,
    ) -> CalculationResult<Emission> {
        let mut updated = emission.clone();

        if self.is_direct_entry(emission) {
            let total = emission.total_emissions.ok_or_else(|| {
                Self::error(
                    emission,
                    ValidationField::EmissionTotalEmissions,
                    CalculationErrorKind::MissingInput,
                )
            })?;
            let total = self.policy.apply(total);
            updated.total_emissions = Some(total);
            updated.calculated_emissions_tons = self.emissions_tons(emission, total, report_year)?;
            return Ok(updated);
        }

        let raw = self.raw_total(emission, period, report_year)?;
        let total = self.policy.apply(raw.total);

        if emission.uses_formula() {
            updated.emissions_factor = Some(raw.emission_factor);
        }
        updated.total_emissions = Some(total);
        updated.calculated_emissions_tons = self.emissions_tons(emission, total, report_year)?;

        debug!(
            emission_id = %emission.id,
            pollutant = emission.pollutant().unwrap_or_default(),
            total = %total,
            "Calculated emission total"
        );
        Ok(updated)
    }

    /// Recalculates every emission in the report in place.
    pub fn recalculate_report(&self, report: &mut EmissionsReport) -> BatchOutcome {
        let year = report.year;
        let report_id = report.id;
        let mut outcome = BatchOutcome::default();

        for period in periods_mut(report) {
            for index in 0..period.emissions.len() {
                match self.calculate_total_emissions(&period.emissions[index], period, year) {
                    Ok(updated) => {
                        outcome.updated.push(updated.id);
                        period.emissions[index] = updated;
                    }
                    Err(error) => {
                        warn!(
                            report_id = %report_id,
                            emission_id = %error.emission_id,
                            error = %error,
                            "Emission calculation failed"
                        );
                        outcome.failures.push(error);
                    }
                }
            }
        }

        info!(
            report_id = %report_id,
            updated = outcome.updated.len(),
            failed = outcome.failures.len(),
            "Recalculated report emissions"
        );
        outcome
    }

    /// Refreshes only the ton figures from the stored totals.
    pub fn recalculate_emission_tons(&self, report: &mut EmissionsReport) -> BatchOutcome {
        let year = report.year;
        let mut outcome = BatchOutcome::default();

        for period in periods_mut(report) {
            for emission in period.emissions.iter_mut() {
                let Some(total) = emission.total_emissions else {
                    continue;
                };
                match self.emissions_tons(emission, total, year) {
                    Ok(tons) => {
                        emission.calculated_emissions_tons = tons;
                        outcome.updated.push(emission.id);
                    }
                    Err(error) => {
                        warn!(emission_id = %error.emission_id, error = %error, "Ton conversion failed");
                        outcome.failures.push(error);
                    }
                }
            }
        }

        outcome
    }

    /// Applies bulk-entry rows to the report and recalculates the touched
    /// emissions. Rows come back with the computed figures, or flagged as
    /// failed with the reason; a failed row leaves its emission untouched.
    pub fn bulk_update(
        &self,
        report: &mut EmissionsReport,
        rows: Vec<BulkEntryRow>,
    ) -> Vec<BulkEntryRow> {
        let year = report.year;
        let mut rows = rows;
        let index: HashMap<Uuid, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.emission_id, i))
            .collect();
        let mut matched = vec![false; rows.len()];

        for period in periods_mut(report) {
            for position in 0..period.emissions.len() {
                let Some(&row_index) = index.get(&period.emissions[position].id) else {
                    continue;
                };
                matched[row_index] = true;
                let row = &mut rows[row_index];
                row.calculation_failed = false;
                row.calculation_failure_message = None;

                let mut candidate = period.emissions[position].clone();
                if self.is_direct_entry(&candidate) {
                    if row.total_emissions.is_some() {
                        candidate.total_emissions = row.total_emissions;
                    }
                } else if row.emissions_factor.is_some() {
                    candidate.emissions_factor = row.emissions_factor;
                }

                match self.calculate_total_emissions(&candidate, period, year) {
                    Ok(updated) => {
                        row.emissions_factor = updated.emissions_factor;
                        row.total_emissions = updated.total_emissions;
                        row.calculated_emissions_tons = updated.calculated_emissions_tons;
                        period.emissions[position] = updated;
                    }
                    Err(error) => {
                        warn!(emission_id = %error.emission_id, error = %error, "Bulk entry row failed");
                        row.fail(error.message());
                    }
                }
            }
        }

        for (row, found) in rows.iter_mut().zip(matched) {
            if !found {
                row.fail(format!("Emission {} not found in report", row.emission_id));
            }
        }

        rows
    }
}

fn periods_mut(report: &mut EmissionsReport) -> impl Iterator<Item = &mut ReportingPeriod> {
    report
        .facility_sites
        .iter_mut()
        .flat_map(|site| site.emissions_units.iter_mut())
        .flat_map(|unit| unit.processes.iter_mut())
        .flat_map(|process| process.reporting_periods.iter_mut())
}
