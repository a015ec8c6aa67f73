//! Pollutant emissions reported for a reporting period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit of measure code for short tons.
pub const UOM_TONS: &str = "TON";

/// One pollutant's reported quantity for a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Emission {
    pub id: Uuid,
    pub pollutant_code: Option<String>,
    pub total_emissions: Option<Decimal>,
    pub emissions_uom: Option<String>,
    pub emissions_factor: Option<Decimal>,
    pub emissions_factor_text: Option<String>,
    #[serde(default)]
    pub formula_indicator: bool,
    pub emissions_factor_formula: Option<String>,
    #[serde(default)]
    pub variables: Vec<EmissionFormulaVariable>,
    pub emissions_numerator_uom: Option<String>,
    pub emissions_denominator_uom: Option<String>,
    pub calculation_method_code: Option<String>,
    #[serde(default)]
    pub total_manual_entry: bool,
    pub overall_control_percent: Option<Decimal>,
    pub comments: Option<String>,
    pub calculation_comment: Option<String>,
    /// Total converted to short tons by the calculator.
    pub calculated_emissions_tons: Option<Decimal>,
}

impl Default for Emission {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            pollutant_code: None,
            total_emissions: None,
            emissions_uom: None,
            emissions_factor: None,
            emissions_factor_text: None,
            formula_indicator: false,
            emissions_factor_formula: None,
            variables: Vec::new(),
            emissions_numerator_uom: None,
            emissions_denominator_uom: None,
            calculation_method_code: None,
            total_manual_entry: false,
            overall_control_percent: None,
            comments: None,
            calculation_comment: None,
            calculated_emissions_tons: None,
        }
    }
}

impl Emission {
    pub fn new(pollutant_code: impl Into<String>) -> Self {
        Self {
            pollutant_code: Some(pollutant_code.into()),
            ..Self::default()
        }
    }

    /// Convenience constructor for a total reported directly in tons.
    pub fn with_tons(pollutant_code: impl Into<String>, tons: Decimal) -> Self {
        Self {
            pollutant_code: Some(pollutant_code.into()),
            total_emissions: Some(tons),
            emissions_uom: Some(UOM_TONS.to_string()),
            total_manual_entry: true,
            calculated_emissions_tons: Some(tons),
            ..Self::default()
        }
    }

    pub fn pollutant(&self) -> Option<&str> {
        self.pollutant_code.as_deref()
    }

    pub fn uses_formula(&self) -> bool {
        self.formula_indicator && self.emissions_factor_formula.is_some()
    }

    /// Tons used for cross-pollutant comparisons. Falls back to the reported total
    /// when it is already expressed in tons.
    pub fn reported_tons(&self) -> Option<Decimal> {
        self.calculated_emissions_tons.or_else(|| {
            match self.emissions_uom.as_deref() {
                Some(UOM_TONS) => self.total_emissions,
                _ => None,
            }
        })
    }

    pub fn variable(&self, code: &str) -> Option<&EmissionFormulaVariable> {
        self.variables.iter().find(|v| v.code == code)
    }

    /// Formula variable bindings with a value present.
    pub fn bindings(&self) -> Vec<(String, Decimal)> {
        self.variables
            .iter()
            .filter_map(|v| v.value.map(|value| (v.code.clone(), value)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionFormulaVariable {
    pub code: String,
    pub value: Option<Decimal>,
}

impl EmissionFormulaVariable {
    pub fn new(code: impl Into<String>, value: Decimal) -> Self {
        Self {
            code: code.into(),
            value: Some(value),
        }
    }
}
