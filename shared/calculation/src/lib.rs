//! # Air Inventory Calculation
//!
//! Emission totals for the report tree:
//!
//! - [`UnitConversion`]: dimensional conversion between unit-of-measure formulas
//! - [`FormulaEvaluator`]: user-entered emission factor formulas
//! - [`PrecisionPolicy`]: significant-figure and export rounding
//! - [`EmissionCalculator`]: factor × throughput with conversions, control
//!   reduction and ton normalization; batch and bulk-entry variants
//!
//! Everything here is synchronous and holds no mutable state; reference data is
//! borrowed for the lifetime of a calculator.

pub mod calculator;
pub mod error;
pub mod formula;
pub mod precision;
pub mod units;

pub use calculator::{BatchOutcome, BulkEntryRow, EmissionCalculator, RawCalculation};
pub use error::{CalculationError, CalculationErrorKind, CalculationResult};
pub use formula::{extract_variable_codes, Formula, FormulaError, FormulaEvaluator};
pub use precision::{
    format_export, round_decimal_places, set_significant_figures, PrecisionPolicy,
    EMISSIONS_SIGNIFICANT_FIGURES, EXPORT_DECIMAL_PLACES,
};
pub use units::{is_leap_year, ConversionError, Dimension, Quantity, UnitConversion, SHORT_TON};
