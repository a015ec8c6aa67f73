//! Dotted field paths used to route findings back to form fields.

use serde::{Serialize, Serializer};

const PERIOD: &str = "report.facilitySite.emissionsUnit.emissionsProcess.reportingPeriod";

/// Every field a validation finding or calculation error can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationField {
    ReportYear,
    ReportEisId,
    ReportProgramSystemCode,
    ReportFacilitySite,

    FacilityEisId,
    FacilityStatus,
    FacilityStatusYear,
    FacilityNaics,
    FacilityContact,
    FacilityEmailAddress,

    EmissionsUnitIdentifier,
    EmissionsUnitStatusCode,
    EmissionsUnitStatusYear,
    EmissionsUnitProcess,

    ProcessIdentifier,
    ProcessRp,
    ProcessRpPercent,
    ProcessInfoScc,
    ProcessAircraftCode,
    ProcessPeriodEmission,
    ProcessStatusCode,
    ProcessStatusYear,

    PeriodOperatingTypeCode,
    PeriodCalcValue,
    PeriodCalcMaterialCode,
    PeriodCalcTypeCode,
    PeriodCalcUom,
    PeriodFuelUseValues,
    PeriodSccFuelMaterial,
    PeriodFuelUom,
    PeriodEmission,

    DetailAvgHoursPerDay,
    DetailAvgDaysPerWeek,
    DetailAvgWeeksPerPeriod,
    DetailActualHoursPerPeriod,
    DetailPercentWinter,
    DetailPercentSpring,
    DetailPercentSummer,
    DetailPercentFall,
    DetailPercents,

    EmissionPollutant,
    EmissionCalcMethod,
    EmissionComments,
    EmissionCalcDescription,
    EmissionFactor,
    EmissionFactorText,
    EmissionTotalEmissions,
    EmissionControlPercent,
    EmissionUom,
    EmissionCurieUom,
    EmissionNumeratorUom,
    EmissionDenominatorUom,
    EmissionFormulaVariable,

    RpIdentifier,
    RpStatusCode,
    RpStatusYear,
    RpGasTemperature,
    RpStack,
    RpStackWarning,
    RpFugitive,

    ControlIdentifier,
    ControlStatusCode,
    ControlStatusYear,
    ControlPercentControl,
    ControlPercentCapture,
    ControlMeasureCode,
    ControlPollutant,
    ControlPollutantPercentReduction,
    ControlPathWarning,

    ControlPathIdentifier,
    ControlPathAssignment,
    ControlPathSequenceNumber,
    ControlPathNoControlDevice,
    ControlPathPercentControl,
    ControlPathCycle,
}

impl ValidationField {
    pub fn path(&self) -> String {
        use ValidationField::*;

        let period_field = |name: &str| format!("{}.{}", PERIOD, name);

        match self {
            ReportYear => "report.year".to_string(),
            ReportEisId => "report.eisProgramId".to_string(),
            ReportProgramSystemCode => "report.programSystemCode".to_string(),
            ReportFacilitySite => "report.facilitySite".to_string(),

            FacilityEisId => "report.facilitySite.eisProgramId".to_string(),
            FacilityStatus => "report.facilitySite.status".to_string(),
            FacilityStatusYear => "report.facilitySite.statusYear".to_string(),
            FacilityNaics => "report.facilitySite.naics".to_string(),
            FacilityContact => "report.facilitySite.contacts".to_string(),
            FacilityEmailAddress => "report.facilitySite.contacts.emailAddress".to_string(),

            EmissionsUnitIdentifier => "report.facilitySite.emissionsUnit.unitIdentifier".to_string(),
            EmissionsUnitStatusCode => "report.facilitySite.emissionsUnit.statusTypeCode".to_string(),
            EmissionsUnitStatusYear => "report.facilitySite.emissionsUnit.statusYear".to_string(),
            EmissionsUnitProcess => "report.facilitySite.emissionsUnit.emissionsProcess".to_string(),

            ProcessIdentifier => "report.facilitySite.emissionsUnit.emissionsProcess.processIdentifier".to_string(),
            ProcessRp => "report.facilitySite.emissionsUnit.emissionsProcess.releasePointAppts.required".to_string(),
            ProcessRpPercent => "report.facilitySite.emissionsUnit.emissionsProcess.releasePointAppts.percent".to_string(),
            ProcessInfoScc => "report.facilitySite.emissionsUnit.emissionsProcess.information.scc".to_string(),
            ProcessAircraftCode => "report.facilitySite.emissionsUnit.emissionsProcess.aircraftCode".to_string(),
            ProcessPeriodEmission => "report.facilitySite.emissionsUnit.emissionsProcess.emission".to_string(),
            ProcessStatusCode => "report.facilitySite.emissionsUnit.emissionsProcess.statusTypeCode".to_string(),
            ProcessStatusYear => "report.facilitySite.emissionsUnit.emissionsProcess.statusYear".to_string(),

            PeriodOperatingTypeCode => period_field("operatingTypeCode"),
            PeriodCalcValue => period_field("calculationParameterValue"),
            PeriodCalcMaterialCode => period_field("calculationMaterialCode"),
            PeriodCalcTypeCode => period_field("calculationParameterTypeCode"),
            PeriodCalcUom => period_field("calculationParameterUom"),
            PeriodFuelUseValues => period_field("fuelUseValues"),
            PeriodSccFuelMaterial => period_field("fuelUseMaterial"),
            PeriodFuelUom => period_field("fuelUseUom"),
            PeriodEmission => period_field("emission"),

            DetailAvgHoursPerDay => period_field("operatingDetail.avgHoursPerDay"),
            DetailAvgDaysPerWeek => period_field("operatingDetail.avgDaysPerWeek"),
            DetailAvgWeeksPerPeriod => period_field("operatingDetail.avgWeeksPerPeriod"),
            DetailActualHoursPerPeriod => period_field("operatingDetail.actualHoursPerPeriod"),
            DetailPercentWinter => period_field("operatingDetail.percentWinter"),
            DetailPercentSpring => period_field("operatingDetail.percentSpring"),
            DetailPercentSummer => period_field("operatingDetail.percentSummer"),
            DetailPercentFall => period_field("operatingDetail.percentFall"),
            DetailPercents => period_field("operatingDetail.percents"),

            EmissionPollutant => period_field("emission.pollutant"),
            EmissionCalcMethod => period_field("emission.emissionsCalcMethodCode"),
            EmissionComments => period_field("emission.comments"),
            EmissionCalcDescription => period_field("emission.calculationDescription"),
            EmissionFactor => period_field("emission.emissionsFactor"),
            EmissionFactorText => period_field("emission.emissionsFactorText"),
            EmissionTotalEmissions => period_field("emission.totalEmissions"),
            EmissionControlPercent => period_field("emission.controlPercent"),
            EmissionUom => period_field("emission.emissionsUomCode"),
            EmissionCurieUom => period_field("emission.emissionsCurieUom"),
            EmissionNumeratorUom => period_field("emission.emissionsNumeratorUom"),
            EmissionDenominatorUom => period_field("emission.emissionsDenominatorUom"),
            EmissionFormulaVariable => period_field("emission.formula.variable"),

            RpIdentifier => "report.facilitySite.releasePoint.releasePointIdentifier".to_string(),
            RpStatusCode => "report.facilitySite.releasePoint.statusTypeCode".to_string(),
            RpStatusYear => "report.facilitySite.releasePoint.statusYear".to_string(),
            RpGasTemperature => "report.facilitySite.releasePoint.exitGasTemperature".to_string(),
            RpStack => "report.facilitySite.releasePoint.stack".to_string(),
            RpStackWarning => "report.facilitySite.releasePoint.stackWarning".to_string(),
            RpFugitive => "report.facilitySite.releasePoint.fugitive".to_string(),

            ControlIdentifier => "report.facilitySite.control.controlIdentifier".to_string(),
            ControlStatusCode => "report.facilitySite.control.statusTypeCode".to_string(),
            ControlStatusYear => "report.facilitySite.control.statusYear".to_string(),
            ControlPercentControl => "report.facilitySite.control.percentControl".to_string(),
            ControlPercentCapture => "report.facilitySite.control.percentCapture".to_string(),
            ControlMeasureCode => "report.facilitySite.control.controlMeasureCode".to_string(),
            ControlPollutant => "report.facilitySite.control.controlPollutant".to_string(),
            ControlPollutantPercentReduction => "report.facilitySite.control.controlPollutant.percentReduction".to_string(),
            ControlPathWarning => "report.facilitySite.control.pathWarning".to_string(),

            ControlPathIdentifier => "report.facilitySite.controlPath.controlPathIdentifier".to_string(),
            ControlPathAssignment => "report.facilitySite.controlPath.assignment".to_string(),
            ControlPathSequenceNumber => "report.facilitySite.controlPath.sequenceNumber".to_string(),
            ControlPathNoControlDevice => "report.facilitySite.controlPath.notAssigned".to_string(),
            ControlPathPercentControl => "report.facilitySite.controlPath.percentControl".to_string(),
            ControlPathCycle => "report.facilitySite.controlPath.cycle".to_string(),
        }
    }
}

impl std::fmt::Display for ValidationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl Serialize for ValidationField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
