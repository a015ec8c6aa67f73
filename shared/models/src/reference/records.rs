//! Reference-data records resolved from codes carried on the report tree.

use serde::{Deserialize, Serialize};

/// Unit of measure with the dimensional formula used by unit conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitOfMeasure {
    pub code: String,
    pub description: String,
    /// Physical quantity, e.g. "MASS", "VOLUME", "ENERGY"
    pub unit_type: String,
    /// Dimensional formula, e.g. "[lb]" or "[gal]/[h]"
    pub calculation_variable: String,
    #[serde(default)]
    pub legacy: bool,
    /// Fuel use category when the unit may be used for fuel use, e.g. "liquid"
    pub fuel_use_type: Option<String>,
}

impl UnitOfMeasure {
    pub fn new(
        code: impl Into<String>,
        unit_type: impl Into<String>,
        calculation_variable: impl Into<String>,
    ) -> Self {
        let code = code.into();
        Self {
            description: code.clone(),
            code,
            unit_type: unit_type.into(),
            calculation_variable: calculation_variable.into(),
            legacy: false,
            fuel_use_type: None,
        }
    }

    pub fn with_fuel_use_type(mut self, fuel_use_type: impl Into<String>) -> Self {
        self.fuel_use_type = Some(fuel_use_type.into());
        self
    }

    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pollutant {
    pub code: String,
    pub name: String,
    /// Last inventory year the pollutant may be reported for
    pub last_inventory_year: Option<i16>,
}

impl Pollutant {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            last_inventory_year: None,
        }
    }

    pub fn is_legacy_for(&self, year: i16) -> bool {
        matches!(self.last_inventory_year, Some(last) if last < year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationMaterial {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub fuel_use_material: bool,
}

impl CalculationMaterial {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            fuel_use_material: false,
        }
    }
}

/// Calculation method code and the behavior flags the calculator and rules key on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationMethod {
    pub code: String,
    pub description: String,
    /// Totals are entered directly; no emission factor applies.
    #[serde(default)]
    pub total_direct_entry: bool,
    #[serde(default)]
    pub epa_emission_factor: bool,
    /// Factor already accounts for controls, so no control percent may be given.
    #[serde(default)]
    pub control_indicator: bool,
}

impl CalculationMethod {
    pub fn direct_entry(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            total_direct_entry: true,
            epa_emission_factor: false,
            control_indicator: false,
        }
    }

    pub fn factor(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            total_direct_entry: false,
            epa_emission_factor: true,
            control_indicator: false,
        }
    }
}

/// Source classification code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SccCode {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub fuel_use_required: bool,
    pub last_inventory_year: Option<i16>,
    /// Retirement year; retired codes are still accepted with a warning.
    pub retired_year: Option<i16>,
}

impl SccCode {
    pub fn new(code: impl Into<String>, fuel_use_required: bool) -> Self {
        let code = code.into();
        Self {
            description: code.clone(),
            code,
            fuel_use_required,
            last_inventory_year: None,
            retired_year: None,
        }
    }

    pub fn is_expired_for(&self, year: i16) -> bool {
        matches!(self.last_inventory_year, Some(last) if last < year)
    }

    pub fn is_retired_for(&self, year: i16) -> bool {
        matches!(self.retired_year, Some(retired) if retired <= year)
    }
}

/// Fuel-use reporting requirement keyed by SCC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelUseScc {
    pub scc_code: String,
    pub calculation_material_code: String,
    /// Accepted fuel use categories for the UOM
    pub fuel_use_types: Vec<String>,
}

impl FuelUseScc {
    pub fn new(scc_code: impl Into<String>, material: impl Into<String>, fuel_use_types: &str) -> Self {
        Self {
            scc_code: scc_code.into(),
            calculation_material_code: material.into(),
            fuel_use_types: fuel_use_types
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn accepts_fuel_use_type(&self, fuel_use_type: Option<&str>) -> bool {
        match fuel_use_type {
            Some(t) => self.fuel_use_types.iter().any(|accepted| accepted == t),
            None => false,
        }
    }
}

/// Generic code/description record: operating statuses, operating types,
/// calculation parameter types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeRecord {
    pub code: String,
    pub description: String,
    pub last_inventory_year: Option<i16>,
}

impl CodeRecord {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            last_inventory_year: None,
        }
    }

    pub fn is_legacy_for(&self, year: i16) -> bool {
        matches!(self.last_inventory_year, Some(last) if last < year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NaicsCode {
    pub code: String,
    pub description: String,
    pub last_inventory_year: Option<i16>,
    /// Replacement codes for a retired NAICS
    #[serde(default)]
    pub map_to: Vec<String>,
}

impl NaicsCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            last_inventory_year: None,
            map_to: Vec::new(),
        }
    }

    pub fn is_legacy_for(&self, year: i16) -> bool {
        matches!(self.last_inventory_year, Some(last) if last < year)
    }
}
