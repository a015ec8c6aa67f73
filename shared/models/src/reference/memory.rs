//! In-memory reference tables, loadable from a JSON seed.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::records::*;
use super::{LegacyFilter, ReferenceData};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read reference seed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid reference seed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of every reference table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSeed {
    pub units_of_measure: Vec<UnitOfMeasure>,
    pub pollutants: Vec<Pollutant>,
    pub calculation_materials: Vec<CalculationMaterial>,
    pub calculation_methods: Vec<CalculationMethod>,
    pub calculation_parameter_types: Vec<CodeRecord>,
    pub operating_types: Vec<CodeRecord>,
    pub operating_statuses: Vec<CodeRecord>,
    pub scc_codes: Vec<SccCode>,
    pub fuel_use_sccs: Vec<FuelUseScc>,
    pub naics_codes: Vec<NaicsCode>,
    pub formula_variables: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    units: HashMap<String, UnitOfMeasure>,
    pollutants: HashMap<String, Pollutant>,
    materials: HashMap<String, CalculationMaterial>,
    methods: HashMap<String, CalculationMethod>,
    parameter_types: HashMap<String, CodeRecord>,
    operating_types: HashMap<String, CodeRecord>,
    operating_statuses: HashMap<String, CodeRecord>,
    sccs: HashMap<String, SccCode>,
    fuel_use_sccs: HashMap<String, FuelUseScc>,
    naics: HashMap<String, NaicsCode>,
    formula_variables: Vec<String>,
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: ReferenceSeed) -> Self {
        let mut data = Self::new();
        for unit in seed.units_of_measure {
            data = data.with_unit(unit);
        }
        for pollutant in seed.pollutants {
            data = data.with_pollutant(pollutant);
        }
        for material in seed.calculation_materials {
            data = data.with_material(material);
        }
        for method in seed.calculation_methods {
            data = data.with_method(method);
        }
        for record in seed.calculation_parameter_types {
            data = data.with_parameter_type(record);
        }
        for record in seed.operating_types {
            data = data.with_operating_type(record);
        }
        for record in seed.operating_statuses {
            data = data.with_operating_status(record);
        }
        for scc in seed.scc_codes {
            data = data.with_scc(scc);
        }
        for entry in seed.fuel_use_sccs {
            data = data.with_fuel_use_scc(entry);
        }
        for naics in seed.naics_codes {
            data = data.with_naics(naics);
        }
        data.formula_variables = seed.formula_variables;
        data
    }

    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        let seed: ReferenceSeed = serde_json::from_str(json)?;
        Ok(Self::from_seed(seed))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), units = data.units.len(), sccs = data.sccs.len(), "Loaded reference seed");
        Ok(data)
    }

    pub fn with_unit(mut self, unit: UnitOfMeasure) -> Self {
        self.units.insert(unit.code.clone(), unit);
        self
    }

    pub fn with_pollutant(mut self, pollutant: Pollutant) -> Self {
        self.pollutants.insert(pollutant.code.clone(), pollutant);
        self
    }

    pub fn with_material(mut self, material: CalculationMaterial) -> Self {
        self.materials.insert(material.code.clone(), material);
        self
    }

    pub fn with_method(mut self, method: CalculationMethod) -> Self {
        self.methods.insert(method.code.clone(), method);
        self
    }

    pub fn with_parameter_type(mut self, record: CodeRecord) -> Self {
        self.parameter_types.insert(record.code.clone(), record);
        self
    }

    pub fn with_operating_type(mut self, record: CodeRecord) -> Self {
        self.operating_types.insert(record.code.clone(), record);
        self
    }

    pub fn with_operating_status(mut self, record: CodeRecord) -> Self {
        self.operating_statuses.insert(record.code.clone(), record);
        self
    }

    pub fn with_scc(mut self, scc: SccCode) -> Self {
        self.sccs.insert(scc.code.clone(), scc);
        self
    }

    pub fn with_fuel_use_scc(mut self, entry: FuelUseScc) -> Self {
        self.fuel_use_sccs.insert(entry.scc_code.clone(), entry);
        self
    }

    pub fn with_naics(mut self, naics: NaicsCode) -> Self {
        self.naics.insert(naics.code.clone(), naics);
        self
    }

    pub fn with_formula_variable(mut self, code: impl Into<String>) -> Self {
        self.formula_variables.push(code.into());
        self
    }

    /// Baseline tables covering the common units, statuses and methods.
    pub fn standard() -> Self {
        let units = [
            UnitOfMeasure::new("TON", "MASS", "sTon").with_fuel_use_type("solid"),
            UnitOfMeasure::new("LB", "MASS", "[lb]").with_fuel_use_type("solid"),
            UnitOfMeasure::new("KG", "MASS", "[kg]"),
            UnitOfMeasure::new("G", "MASS", "[g]"),
            UnitOfMeasure::new("MTON", "MASS", "[t]"),
            UnitOfMeasure::new("E3LB", "MASS", "[lb]*1000"),
            UnitOfMeasure::new("GAL", "VOLUME", "[gal]").with_fuel_use_type("liquid"),
            UnitOfMeasure::new("E3GAL", "VOLUME", "[gal]*1000").with_fuel_use_type("liquid"),
            UnitOfMeasure::new("E6GAL", "VOLUME", "[gal]*1000000").with_fuel_use_type("liquid"),
            UnitOfMeasure::new("BBL", "VOLUME", "[bbl]").with_fuel_use_type("liquid"),
            UnitOfMeasure::new("FT3", "VOLUME", "ft3").with_fuel_use_type("gas"),
            UnitOfMeasure::new("E3FT3", "VOLUME", "ft3*1000").with_fuel_use_type("gas"),
            UnitOfMeasure::new("E6FT3", "VOLUME", "ft3*1000000").with_fuel_use_type("gas"),
            UnitOfMeasure::new("M3", "VOLUME", "[m3]"),
            UnitOfMeasure::new("BTU", "ENERGY", "btu").with_fuel_use_type("energy"),
            UnitOfMeasure::new("MMBTU", "ENERGY", "btu*1000000").with_fuel_use_type("energy"),
            UnitOfMeasure::new("THERM", "ENERGY", "[therm]").with_fuel_use_type("energy"),
            UnitOfMeasure::new("MWH", "ENERGY", "[MWh]"),
            UnitOfMeasure::new("HP", "POWER", "hp"),
            UnitOfMeasure::new("MW", "POWER", "w*1000000"),
            UnitOfMeasure::new("MMBTUHR", "POWER", "btu*1000000/[h]"),
            UnitOfMeasure::new("HR", "TIME", "[h]"),
            UnitOfMeasure::new("DAY", "TIME", "[day]"),
            UnitOfMeasure::new("YR", "TIME", "year"),
            UnitOfMeasure::new("CURIE", "RADIOACTIVITY", "[Ci]"),
            UnitOfMeasure::new("E3TON", "MASS", "sTon*1000").legacy(),
        ];

        let pollutants = [
            Pollutant::new("CO", "Carbon Monoxide"),
            Pollutant::new("NOX", "Nitrogen Oxides"),
            Pollutant::new("SO2", "Sulfur Dioxide"),
            Pollutant::new("VOC", "Volatile Organic Compounds"),
            Pollutant::new("NH3", "Ammonia"),
            Pollutant::new("PM10-FIL", "PM10 Filterable"),
            Pollutant::new("PM10-PRI", "PM10 Primary (Filt + Cond)"),
            Pollutant::new("PM25-FIL", "PM2.5 Filterable"),
            Pollutant::new("PM25-PRI", "PM2.5 Primary (Filt + Cond)"),
            Pollutant::new("PM-CON", "PM Condensible"),
            Pollutant::new("7664393", "Hydrogen Fluoride"),
            Pollutant::new("16984488", "Fluoride"),
            Pollutant::new("605", "Radionuclides (Including Radon)"),
        ];

        let methods = [
            CalculationMethod::direct_entry("1", "Continuous Emission Monitoring System"),
            CalculationMethod::direct_entry("2", "Engineering Judgment"),
            CalculationMethod::direct_entry("3", "Material Balance"),
            CalculationMethod::direct_entry("4", "Stack Test (no Emission Factor)"),
            CalculationMethod::factor("8", "USEPA Emission Factor (no Control Efficiency used)"),
            CalculationMethod {
                control_indicator: true,
                ..CalculationMethod::factor("9", "USEPA Emission Factor (pre-control) plus Control Efficiency")
            },
            CalculationMethod::factor("10", "Site-Specific Emission Factor (no Control Efficiency used)"),
        ];

        let mut data = Self::new();
        for unit in units {
            data = data.with_unit(unit);
        }
        for pollutant in pollutants {
            data = data.with_pollutant(pollutant);
        }
        for method in methods {
            data = data.with_method(method);
        }

        data.with_material(CalculationMaterial::new("226", "Waste"))
            .with_material(CalculationMaterial {
                fuel_use_material: true,
                ..CalculationMaterial::new("100", "Natural Gas")
            })
            .with_material(CalculationMaterial {
                fuel_use_material: true,
                ..CalculationMaterial::new("209", "Distillate Oil")
            })
            .with_parameter_type(CodeRecord::new("I", "Input"))
            .with_parameter_type(CodeRecord::new("O", "Output"))
            .with_parameter_type(CodeRecord::new("E", "Existing"))
            .with_operating_type(CodeRecord::new("R", "Routine"))
            .with_operating_type(CodeRecord::new("S", "Startup/Shutdown"))
            .with_operating_status(CodeRecord::new("OP", "Operating"))
            .with_operating_status(CodeRecord::new("TS", "Temporarily Shutdown"))
            .with_operating_status(CodeRecord::new("PS", "Permanently Shutdown"))
            .with_operating_status(CodeRecord::new("ONRE", "Operating but not reporting"))
            .with_scc(SccCode::new("10200302", true))
            .with_scc(SccCode::new("10200303", false))
            .with_scc(SccCode::new("2275001000", false))
            .with_fuel_use_scc(FuelUseScc::new("10200302", "100", "energy,liquid"))
            .with_naics(NaicsCode::new("562212", "Solid Waste Landfill"))
            .with_naics(NaicsCode::new("221112", "Fossil Fuel Electric Power Generation"))
            .with_naics(NaicsCode::new("332811", "Metal Heat Treating"))
            .with_formula_variable("A")
            .with_formula_variable("SU")
            .with_formula_variable("S")
            .with_formula_variable("HHV")
            .with_formula_variable("CE")
    }
}

impl ReferenceData for InMemoryReferenceData {
    fn unit_of_measure(&self, code: &str, filter: LegacyFilter) -> Option<UnitOfMeasure> {
        self.units
            .get(code)
            .filter(|unit| filter.admits(unit.legacy, None))
            .cloned()
    }

    fn pollutant(&self, code: &str, filter: LegacyFilter) -> Option<Pollutant> {
        self.pollutants
            .get(code)
            .filter(|p| filter.admits(false, p.last_inventory_year))
            .cloned()
    }

    fn calculation_material(&self, code: &str) -> Option<CalculationMaterial> {
        self.materials.get(code).cloned()
    }

    fn calculation_method(&self, code: &str) -> Option<CalculationMethod> {
        self.methods.get(code).cloned()
    }

    fn calculation_parameter_type(&self, code: &str) -> Option<CodeRecord> {
        self.parameter_types.get(code).cloned()
    }

    fn operating_type(&self, code: &str) -> Option<CodeRecord> {
        self.operating_types.get(code).cloned()
    }

    fn operating_status(&self, code: &str) -> Option<CodeRecord> {
        self.operating_statuses.get(code).cloned()
    }

    fn scc(&self, code: &str, filter: LegacyFilter) -> Option<SccCode> {
        self.sccs
            .get(code)
            .filter(|scc| filter.admits(false, scc.last_inventory_year))
            .cloned()
    }

    fn fuel_use_scc(&self, scc_code: &str) -> Option<FuelUseScc> {
        self.fuel_use_sccs.get(scc_code).cloned()
    }

    fn naics(&self, code: &str, filter: LegacyFilter) -> Option<NaicsCode> {
        self.naics
            .get(code)
            .filter(|n| filter.admits(false, n.last_inventory_year))
            .cloned()
    }

    fn formula_variable_codes(&self) -> Vec<String> {
        self.formula_variables.clone()
    }
}
