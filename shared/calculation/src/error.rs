use airinv_models::ValidationField;
use thiserror::Error;
use uuid::Uuid;

use crate::formula::FormulaError;
use crate::units::ConversionError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationErrorKind {
    #[error("value is required")]
    MissingInput,

    #[error("unit of measure '{0}' not found")]
    UnknownUnit(String),

    #[error("unit type {from} does not match {to}")]
    UnitTypeMismatch { from: String, to: String },

    #[error("formula: {0}")]
    Formula(#[from] FormulaError),

    #[error("conversion: {0}")]
    Conversion(#[from] ConversionError),

    #[error("calculated value is out of range")]
    Overflow,
}

/// A failed calculation, naming the emission and the field at fault.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Emission {emission_id} ({}): {field}: {kind}", .pollutant_code.as_deref().unwrap_or("unknown pollutant"))]
pub struct CalculationError {
    pub emission_id: Uuid,
    pub pollutant_code: Option<String>,
    pub field: ValidationField,
    #[source]
    pub kind: CalculationErrorKind,
}

impl CalculationError {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

pub type CalculationResult<T> = Result<T, CalculationError>;
