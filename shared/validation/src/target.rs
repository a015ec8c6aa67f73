//! Scoped views of the report tree handed to rules.
//!
//! Each target borrows the entity under validation plus the parents a rule
//! needs for cross-field checks. Parents are references, never copies.

use airinv_models::{
    Control, ControlPath, ControlPathGraph, Emission, EmissionsProcess, EmissionsReport,
    EmissionsUnit, FacilitySite, OperatingDetail, ReleasePoint, ReportingPeriod,
};

use crate::result::{EntityType, ValidationDetails};

pub trait ValidationTarget {
    fn details(&self) -> ValidationDetails;
}

/// Binds an entity type to its target view. Rule sets and rules are keyed on these.
pub trait Entity: 'static {
    const TYPE: EntityType;
    type Target<'t>: ValidationTarget;
}

pub mod scope {
    use super::*;

    pub struct Report;
    pub struct Facility;
    pub struct Unit;
    pub struct Process;
    pub struct Period;
    pub struct Detail;
    pub struct Emission;
    pub struct ReleasePoint;
    pub struct Control;
    pub struct ControlPath;

    impl Entity for Report {
        const TYPE: EntityType = EntityType::Report;
        type Target<'t> = ReportTarget<'t>;
    }

    impl Entity for Facility {
        const TYPE: EntityType = EntityType::FacilitySite;
        type Target<'t> = FacilityTarget<'t>;
    }

    impl Entity for Unit {
        const TYPE: EntityType = EntityType::EmissionsUnit;
        type Target<'t> = UnitTarget<'t>;
    }

    impl Entity for Process {
        const TYPE: EntityType = EntityType::EmissionsProcess;
        type Target<'t> = ProcessTarget<'t>;
    }

    impl Entity for Period {
        const TYPE: EntityType = EntityType::ReportingPeriod;
        type Target<'t> = PeriodTarget<'t>;
    }

    impl Entity for Detail {
        const TYPE: EntityType = EntityType::OperatingDetail;
        type Target<'t> = OperatingDetailTarget<'t>;
    }

    impl Entity for Emission {
        const TYPE: EntityType = EntityType::Emission;
        type Target<'t> = EmissionTarget<'t>;
    }

    impl Entity for ReleasePoint {
        const TYPE: EntityType = EntityType::ReleasePoint;
        type Target<'t> = ReleasePointTarget<'t>;
    }

    impl Entity for Control {
        const TYPE: EntityType = EntityType::Control;
        type Target<'t> = ControlTarget<'t>;
    }

    impl Entity for ControlPath {
        const TYPE: EntityType = EntityType::ControlPath;
        type Target<'t> = ControlPathTarget<'t>;
    }
}

fn unit_label(unit: &EmissionsUnit) -> String {
    format!("Emission Unit: {}", unit.identifier)
}

fn process_label(process: &EmissionsProcess) -> String {
    format!("Emission Process: {}", process.identifier)
}

#[derive(Clone, Copy)]
pub struct ReportTarget<'a> {
    pub report: &'a EmissionsReport,
}

impl ValidationTarget for ReportTarget<'_> {
    fn details(&self) -> ValidationDetails {
        let details = ValidationDetails::new(EntityType::Report, self.report.id)
            .with_identifier(self.report.year.to_string());
        match &self.report.eis_program_id {
            Some(eis) => details.with_parent(format!("EIS Program ID: {}", eis)),
            None => details,
        }
    }
}

#[derive(Clone, Copy)]
pub struct FacilityTarget<'a> {
    pub report: &'a EmissionsReport,
    pub facility: &'a FacilitySite,
}

impl ValidationTarget for FacilityTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::FacilitySite, self.facility.id)
            .with_identifier(self.facility.name.clone())
    }
}

#[derive(Clone, Copy)]
pub struct UnitTarget<'a> {
    pub facility: &'a FacilitySite,
    pub unit: &'a EmissionsUnit,
}

impl ValidationTarget for UnitTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::EmissionsUnit, self.unit.id).with_identifier(unit_label(self.unit))
    }
}

#[derive(Clone, Copy)]
pub struct ProcessTarget<'a> {
    pub facility: &'a FacilitySite,
    pub unit: &'a EmissionsUnit,
    pub process: &'a EmissionsProcess,
}

impl ValidationTarget for ProcessTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::EmissionsProcess, self.process.id)
            .with_parent(unit_label(self.unit))
            .with_identifier(process_label(self.process))
    }
}

#[derive(Clone, Copy)]
pub struct PeriodTarget<'a> {
    pub facility: &'a FacilitySite,
    pub unit: &'a EmissionsUnit,
    pub process: &'a EmissionsProcess,
    pub period: &'a ReportingPeriod,
}

impl<'a> PeriodTarget<'a> {
    pub fn process_target(&self) -> ProcessTarget<'a> {
        ProcessTarget {
            facility: self.facility,
            unit: self.unit,
            process: self.process,
        }
    }
}

impl ValidationTarget for PeriodTarget<'_> {
    fn details(&self) -> ValidationDetails {
        // Periods have no identifier of their own; findings point at the parent process.
        ValidationDetails::new(EntityType::ReportingPeriod, self.period.id)
            .with_parent(unit_label(self.unit))
            .with_identifier(process_label(self.process))
    }
}

#[derive(Clone, Copy)]
pub struct OperatingDetailTarget<'a> {
    pub unit: &'a EmissionsUnit,
    pub process: &'a EmissionsProcess,
    pub period: &'a ReportingPeriod,
    pub detail: &'a OperatingDetail,
}

impl ValidationTarget for OperatingDetailTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::OperatingDetail, self.period.id)
            .with_parent(unit_label(self.unit))
            .with_identifier(process_label(self.process))
    }
}

#[derive(Clone, Copy)]
pub struct EmissionTarget<'a> {
    pub unit: &'a EmissionsUnit,
    pub process: &'a EmissionsProcess,
    pub period: &'a ReportingPeriod,
    pub emission: &'a Emission,
}

impl ValidationTarget for EmissionTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::Emission, self.emission.id)
            .with_parent(unit_label(self.unit))
            .with_parent(process_label(self.process))
            .with_identifier(format!("Pollutant: {}", self.emission.pollutant().unwrap_or("unknown")))
    }
}

#[derive(Clone, Copy)]
pub struct ReleasePointTarget<'a> {
    pub facility: &'a FacilitySite,
    pub release_point: &'a ReleasePoint,
}

impl ValidationTarget for ReleasePointTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::ReleasePoint, self.release_point.id)
            .with_identifier(format!("Release Point: {}", self.release_point.identifier))
    }
}

#[derive(Clone, Copy)]
pub struct ControlTarget<'a> {
    pub facility: &'a FacilitySite,
    pub control: &'a Control,
}

impl ValidationTarget for ControlTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::Control, self.control.id)
            .with_identifier(format!("Control: {}", self.control.identifier))
    }
}

#[derive(Clone, Copy)]
pub struct ControlPathTarget<'a> {
    pub facility: &'a FacilitySite,
    pub path: &'a ControlPath,
    pub graph: &'a ControlPathGraph,
}

impl ValidationTarget for ControlPathTarget<'_> {
    fn details(&self) -> ValidationDetails {
        ValidationDetails::new(EntityType::ControlPath, self.path.id)
            .with_identifier(format!("Control Path: {}", self.path.identifier))
    }
}
