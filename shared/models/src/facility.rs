//! Facility site and the collections it owns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::control::{Control, ControlPath};
use crate::emissions_unit::EmissionsUnit;
use crate::release_point::ReleasePoint;

/// One physical site within a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilitySite {
    pub id: Uuid,
    pub eis_program_id: Option<String>,
    pub name: String,
    pub status_code: Option<String>,
    pub status_year: Option<i16>,
    /// Facility source type, e.g. "104" for landfills
    pub source_type_code: Option<String>,
    #[serde(default)]
    pub naics: Vec<FacilityNaics>,
    #[serde(default)]
    pub contacts: Vec<FacilityContact>,
    #[serde(default)]
    pub emissions_units: Vec<EmissionsUnit>,
    #[serde(default)]
    pub release_points: Vec<ReleasePoint>,
    #[serde(default)]
    pub controls: Vec<Control>,
    #[serde(default)]
    pub control_paths: Vec<ControlPath>,
}

impl Default for FacilitySite {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            eis_program_id: None,
            name: String::new(),
            status_code: Some(crate::status::STATUS_OPERATING.to_string()),
            status_year: None,
            source_type_code: None,
            naics: Vec::new(),
            contacts: Vec::new(),
            emissions_units: Vec::new(),
            release_points: Vec::new(),
            controls: Vec::new(),
            control_paths: Vec::new(),
        }
    }
}

impl FacilitySite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn release_point(&self, id: Uuid) -> Option<&ReleasePoint> {
        self.release_points.iter().find(|rp| rp.id == id)
    }

    pub fn control(&self, id: Uuid) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn control_path(&self, id: Uuid) -> Option<&ControlPath> {
        self.control_paths.iter().find(|p| p.id == id)
    }

    pub fn is_landfill(&self) -> bool {
        self.source_type_code.as_deref() == Some(crate::status::FACILITY_SOURCE_LANDFILL)
    }

    pub fn primary_naics(&self) -> impl Iterator<Item = &FacilityNaics> {
        self.naics.iter().filter(|n| n.naics_type == NaicsType::Primary)
    }
}

/// NAICS code reported for a facility
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacilityNaics {
    pub code: String,
    pub naics_type: NaicsType,
}

impl FacilityNaics {
    pub fn new(code: impl Into<String>, naics_type: NaicsType) -> Self {
        Self { code: code.into(), naics_type }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NaicsType {
    Primary,
    Secondary,
    Tertiary,
}

impl std::fmt::Display for NaicsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Tertiary => write!(f, "tertiary"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FacilityContact {
    pub contact_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
