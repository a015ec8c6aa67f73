//! # Air Inventory Domain Models
//!
//! Entity tree for annual air emissions reports plus the reference data the
//! calculation and validation engines resolve codes against.
//!
//! ## Report tree
//!
//! - **EmissionsReport**: year-stamped submission owning facility sites
//! - **FacilitySite**: units, release points, controls, control paths, NAICS
//! - **EmissionsUnit** → **EmissionsProcess** → **ReportingPeriod** → **Emission**
//! - **ControlPath** / **ControlAssignment**: id-linked graph, see [`ControlPathGraph`]
//!
//! ## Reference data
//!
//! [`ReferenceData`] resolves pollutant, unit-of-measure, material, SCC,
//! operating-status and NAICS codes. The tree stores codes only.

pub mod control;
pub mod emission;
pub mod emissions_unit;
pub mod facility;
pub mod field;
pub mod period;
pub mod process;
pub mod reference;
pub mod release_point;
pub mod report;
pub mod status;

#[cfg(test)]
pub mod property_tests;

pub use control::{Control, ControlAssignment, ControlPath, ControlPathGraph, ControlPollutant};
pub use emission::{Emission, EmissionFormulaVariable, UOM_TONS};
pub use emissions_unit::EmissionsUnit;
pub use facility::{FacilityContact, FacilityNaics, FacilitySite, NaicsType};
pub use field::ValidationField;
pub use period::{OperatingDetail, ReportingPeriod};
pub use process::{EmissionsProcess, ReleasePointAppt};
pub use reference::{
    CachedReferenceData, CalculationMaterial, CalculationMethod, CodeRecord, FuelUseScc,
    InMemoryReferenceData, LegacyFilter, NaicsCode, Pollutant, ReferenceData, ReferenceSeed,
    SccCode, UnitOfMeasure,
};
pub use release_point::ReleasePoint;
pub use report::{EmissionsReport, ReportStatus, ValidationStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_report_creation() {
        let report = EmissionsReport::new(2021, "GADNR");
        assert_eq!(report.year, 2021);
        assert_eq!(report.status, ReportStatus::InProgress);
        assert_eq!(report.validation_status, ValidationStatus::Unvalidated);
        assert_eq!(report.emission_count(), 0);
    }

    #[test]
    fn test_report_status_transitions() {
        let mut report = EmissionsReport::default();
        assert!(report.transition_to(ReportStatus::Accepted).is_err());
        assert!(report.transition_to(ReportStatus::Submitted).is_ok());
        assert!(report.transition_to(ReportStatus::UnderReview).is_ok());
        assert!(report.transition_to(ReportStatus::Rejected).is_ok());
        assert!(report.status.is_terminal());
        assert!(report.transition_to(ReportStatus::InProgress).is_ok());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(ReportStatus::from_str("under-review"), Some(ReportStatus::UnderReview));
        assert_eq!(ReportStatus::from_str("APPROVED"), Some(ReportStatus::Accepted));
        assert_eq!(ReportStatus::from_str("unknown"), None);
        assert_eq!(ReportStatus::UnderReview.to_string(), "under_review");
    }

    #[test]
    fn test_validation_status_from_result() {
        assert_eq!(ValidationStatus::from_result(true, false), ValidationStatus::Passed);
        assert_eq!(ValidationStatus::from_result(true, true), ValidationStatus::PassedWarnings);
        assert_eq!(ValidationStatus::from_result(false, true), ValidationStatus::Failed);
        assert!(!ValidationStatus::Failed.allows_submission());
    }

    #[test]
    fn test_emission_reported_tons() {
        let tons = Emission::with_tons("CO", Decimal::new(15, 1));
        assert_eq!(tons.reported_tons(), Some(Decimal::new(15, 1)));

        let mut pounds = Emission::new("CO");
        pounds.total_emissions = Some(Decimal::from(3000));
        pounds.emissions_uom = Some("LB".to_string());
        assert_eq!(pounds.reported_tons(), None);

        pounds.calculated_emissions_tons = Some(Decimal::new(15, 1));
        assert_eq!(pounds.reported_tons(), Some(Decimal::new(15, 1)));
    }

    #[test]
    fn test_emission_bindings_skip_empty_values() {
        let mut emission = Emission::new("SO2");
        emission.variables.push(EmissionFormulaVariable::new("SU", Decimal::new(5, 1)));
        emission.variables.push(EmissionFormulaVariable { code: "A".to_string(), value: None });
        assert_eq!(emission.bindings(), vec![("SU".to_string(), Decimal::new(5, 1))]);
    }

    #[test]
    fn test_report_deserializes_with_defaults() {
        let json = r#"{
            "id": "7a1c3a36-39a2-4d3a-9f53-4f0f3c4a0c11",
            "eis_program_id": null,
            "year": 2020,
            "program_system_code": "GADNR"
        }"#;
        let report: EmissionsReport = serde_json::from_str(json).unwrap();
        assert!(report.facility_sites.is_empty());
        assert_eq!(report.status, ReportStatus::InProgress);
    }
}
