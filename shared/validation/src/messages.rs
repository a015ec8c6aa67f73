//! Message catalogue
//!
//! Rules record a message key plus positional arguments. Templates use `{0}`,
//! `{1}`, ... placeholders; a key missing from the catalogue renders as the key
//! followed by its arguments.

use std::collections::HashMap;
use std::sync::OnceLock;

const TEMPLATES: &[(&str, &str)] = &[
    // report
    ("report.year.range", "Report year {0} must be between 1900 and {1}."),
    ("report.programSystemCode.required", "Program System Code is required."),
    ("report.eisProgramId.format", "EIS Program ID {0} is not a valid EIS identifier."),
    ("report.facilitySite.required", "The report must contain at least one facility site."),
    // facility site
    ("facilitysite.status.required", "Facility Site Operating Status is required."),
    ("facilitysite.status.invalid", "Facility Site Operating Status {0} is not valid."),
    ("facilitysite.statusYear.required", "Operating Status Year is required when the facility status is {0}."),
    ("facilitysite.status.range", "Facility Site Operating Status Year must be between 1900 and {0}."),
    ("facilitysite.eisProgramId.format", "Facility EIS Program ID {0} is not a valid EIS identifier."),
    ("facilitysite.naics.required", "At least one NAICS code must be reported for the facility."),
    ("facilitysite.naics.format", "NAICS code {0} must be six digits."),
    ("facilitysite.naics.invalid", "NAICS code {0} is not valid."),
    ("facilitysite.naics.legacy", "NAICS code {0} is no longer valid. Select a current NAICS code."),
    ("facilitysite.naics.legacy.map", "NAICS code {0} is no longer valid. Use {1} instead."),
    ("facilitysite.naics.duplicate", "NAICS code {0} is reported more than once."),
    ("facilitysite.naics.primary.required", "Exactly one primary NAICS code must be reported; found {0}."),
    ("facilitysite.naics.type.required", "A {0} NAICS code is required for facilities reporting to {1}."),
    ("facilitySite.contacts.emailAddress.requiredFormat", "Email address {0} for contact {1} is not in a valid format."),
    // emissions unit
    ("emissionsUnit.unitIdentifier.required", "Emissions Unit Identifier is required."),
    ("emissionsUnit.unitIdentifier.duplicate", "Emissions Unit Identifier {0} is used by more than one unit."),
    ("emissionsUnit.statusTypeCode.required", "Operating Status is required for Emissions Unit {0}."),
    ("emissionsUnit.statusTypeCode.invalid", "Operating Status {1} of Emissions Unit {0} is not valid."),
    ("emissionsUnit.statusYear.required", "Operating Status Year is required when the Emissions Unit status is {0}."),
    ("emissionsUnit.statusYear.range", "Emissions Unit Operating Status Year must be between 1900 and {0}."),
    ("emissionsUnit.statusTypeCode.tsProcess", "Emissions Unit {0} is Temporarily Shutdown, so Process {1} must be Temporarily or Permanently Shutdown."),
    ("emissionsUnit.statusTypeCode.psProcess", "Emissions Unit {0} is Permanently Shutdown, so Process {1} must be Permanently Shutdown."),
    ("emissionsUnit.statusTypeCode.psWarning", "Emissions Unit {0} is Permanently Shutdown and will not be copied forward into future reports."),
    ("emissionsUnit.statusTypeCode.newShutdown", "Emissions Unit {0} is new to this report and may not already be shut down."),
    // emissions process
    ("emissionsProcess.processIdentifier.required", "Emissions Process Identifier is required."),
    ("emissionsProcess.releasePointAppts.duplicate", "Release Point {0} is apportioned to this process more than once."),
    ("emissionsProcess.releasePointAppts.statusTypeCode", "Release Point {0} has status {1}; only operating release points may be apportioned to an operating process."),
    ("emissionsProcess.releasePointAppts.invalid", "A release point apportionment references a release point that does not exist in the facility."),
    ("emissionsProcess.releasePointAppts.percent.range", "Apportionment to Release Point {0} must be between 1 and 100 percent."),
    ("emissionsProcess.releasePointAppts.percent.total", "Release point apportionments must total 100 percent; found {0}."),
    ("emissionsProcess.releasePointAppts.required", "An operating process must be apportioned to at least one release point."),
    ("emissionsProcess.information.scc.required", "SCC is required."),
    ("emissionsProcess.information.scc.format", "SCC {0} must be 8 or 10 digits."),
    ("emissionsProcess.information.scc.invalid", "SCC {0} is not valid."),
    ("emissionsProcess.information.scc.expired", "SCC {0} could only be reported through {1}."),
    ("emissionsProcess.information.scc.retired", "SCC {0} was retired in {1}; consider a current SCC."),
    ("emissionsProcess.aircraftCode.required", "Aircraft Engine Type is required for SCC {0}."),
    ("emissionsProcess.statusTypeCode.required", "Operating Status is required for Emissions Process {0}."),
    ("emissionsProcess.statusTypeCode.invalid", "Operating Status {0} is not valid."),
    ("emissionsProcess.statusTypeCode.psPreviousYear", "The process was Permanently Shutdown last year and must remain Permanently Shutdown."),
    ("emissionsProcess.statusTypeCode.newShutdown", "Process {0} is new to this report and may not already be shut down."),
    ("emissionsProcess.statusYear.required", "Operating Status Year is required when the process status is {0}."),
    ("emissionsProcess.statusYear.range", "Process Operating Status Year must be between 1900 and {0}."),
    ("emissionsProcess.statusYear.beforeUnitYear", "Process Operating Status Year may not precede the status year of Emissions Unit {0}."),
    ("emissionsProcess.emission.required", "Operating process {0} must report at least one emission for each reporting period."),
    // reporting period
    ("reportingPeriod.operatingTypeCode.required", "Operating Type is required."),
    ("reportingPeriod.operatingTypeCode.invalid", "Operating Type {0} is not valid."),
    ("reportingPeriod.calculationParameterValue.required", "Throughput Value is required."),
    ("reportingPeriod.calculationParameterValue.min", "Throughput Value must be greater than or equal to 0."),
    ("reportingPeriod.calculationMaterialCode.required", "Throughput Material is required."),
    ("reportingPeriod.calculationMaterialCode.invalid", "Throughput Material {0} is not valid."),
    ("reportingPeriod.calculationParameterTypeCode.required", "Throughput Parameter Type is required."),
    ("reportingPeriod.calculationParameterTypeCode.invalid", "Throughput Parameter Type {0} is not valid."),
    ("reportingPeriod.calculationParameterUom.required", "Throughput Unit of Measure is required."),
    ("reportingPeriod.calculationParameterUom.invalid", "Throughput Unit of Measure {0} is not valid."),
    ("reportingPeriod.calculationParameterUom.legacy", "Throughput Unit of Measure {0} is no longer valid."),
    ("reportingPeriod.emission.duplicate", "Pollutant {0} is reported more than once for {1}."),
    ("reportingPeriod.emission.pm10.fil.greater.pri", "PM10 Filterable ({0} tons) should not exceed PM10 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm25.fil.greater.pri", "PM2.5 Filterable ({0} tons) should not exceed PM2.5 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm10.con.greater.pri", "PM Condensible ({0} tons) should not exceed PM10 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm25.con.greater.pri", "PM Condensible ({0} tons) should not exceed PM2.5 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm10.invalid", "PM10 Filterable plus PM Condensible ({0} tons) should equal PM10 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm25.invalid", "PM2.5 Filterable plus PM Condensible ({0} tons) should equal PM2.5 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm25.pri.greater.pm10", "PM2.5 Primary ({0} tons) should not exceed PM10 Primary ({1} tons) for {2}."),
    ("reportingPeriod.emission.pm25.fil.greater.pm10", "PM2.5 Filterable ({0} tons) should not exceed PM10 Filterable ({1} tons) for {2}."),
    ("reportingPeriod.emission.hf.greater.fluorides", "Fluoride compounds ({0} tons) should not exceed total Fluorides ({1} tons) for {2}."),
    ("reportingPeriod.fuelUseMaterial.required", "Fuel Material {2} does not match Fuel Material {1} required for SCC {0}."),
    ("reportingPeriod.fuelUseMaterial.uom", "Fuel Unit of Measure {1} is not a valid {2} unit for SCC {0}."),
    ("reportingPeriod.fuelUseUom.invalid", "Fuel Unit of Measure {0} is not valid."),
    ("reportingPeriod.fuelUseUom.legacy", "Fuel Unit of Measure {0} is no longer valid."),
    ("reportingPeriod.fuelUseValues.required", "Fuel Value, Fuel Material and Fuel Unit of Measure must all be reported together."),
    ("reportingPeriod.fuelUseValues.sccRequired", "SCC {0} requires fuel use reporting for {1}."),
    // operating detail
    ("operatingDetail.avgHoursPerDay.range", "Average Hours per Day must be between 0 and 24."),
    ("operatingDetail.avgDaysPerWeek.range", "Average Days per Week must be between 0 and 7."),
    ("operatingDetail.avgWeeksPerPeriod.range", "Average Weeks per Period must be between 0 and 52."),
    ("operatingDetail.actualHoursPerPeriod.range", "Actual Hours per Period must be between 0 and 8784."),
    ("operatingDetail.percent.range", "{0} Percent must be between 0 and 100."),
    ("operatingDetail.percent.required", "{0} Percent is required when any seasonal percent is reported."),
    ("operatingDetail.percent.total", "Seasonal percents must total 100; found {0}."),
    // emission
    ("emission.pollutant.required", "Pollutant is required."),
    ("emission.pollutant.invalid", "Pollutant {0} is not valid."),
    ("pollutant.legacy", "Pollutant {0} may not be reported after {1}."),
    ("emission.emissionsCalcMethodCode.required", "Calculation Method is required."),
    ("emission.emissionsCalcMethodCode.invalid", "Calculation Method {0} is not valid."),
    ("emission.comments.required.method", "Comments are required when the Calculation Method is {0}."),
    ("emission.emissionsFactor.banned.method", "An Emission Factor may not be entered for Calculation Method {0}."),
    ("emission.emissionsFactor.required.method", "An Emission Factor is required for Calculation Method {0}."),
    ("emission.emissionsFactor.range", "Emission Factor must be greater than 0."),
    ("emission.emissionsFactorText.required.emissionsFactor", "Emission Factor Description is required for Calculation Method {0}."),
    ("emission.emissionsUom.required", "Emissions Unit of Measure is required."),
    ("emission.emissionsUom.invalid", "Emissions Unit of Measure {0} is not valid."),
    ("emission.emissionsUom.legacy", "Emissions Unit of Measure {0} is no longer valid."),
    ("emission.emissionsNumeratorUom.required.emissionsFactor", "Emission Factor Numerator Unit of Measure is required."),
    ("emission.emissionsNumeratorUom.banned.emissionsFactor", "Emission Factor Numerator Unit of Measure may not be entered without an Emission Factor."),
    ("emission.emissionsNumeratorUom.invalid", "Emission Factor Numerator Unit of Measure {0} is not valid."),
    ("emission.emissionsNumeratorUom.legacy", "Emission Factor Numerator Unit of Measure {0} is no longer valid."),
    ("emission.emissionsNumeratorUom.mismatch", "Emission Factor Numerator Unit of Measure {0} is not the same type of unit as the Emissions Unit of Measure {1}."),
    ("emission.emissionsDenominatorUom.required.emissionsFactor", "Emission Factor Denominator Unit of Measure is required."),
    ("emission.emissionsDenominatorUom.banned.emissionsFactor", "Emission Factor Denominator Unit of Measure may not be entered without an Emission Factor."),
    ("emission.emissionsDenominatorUom.invalid", "Emission Factor Denominator Unit of Measure {0} is not valid."),
    ("emission.emissionsDenominatorUom.legacy", "Emission Factor Denominator Unit of Measure {0} is no longer valid."),
    ("emission.emissionsDenominatorUom.mismatch", "Emission Factor Denominator Unit of Measure {0} is not the same type of unit as the Throughput Unit of Measure {1}."),
    ("emission.formula.invalid", "Emission Factor formula {0} is not valid: {1}"),
    ("emission.formula.variable.invalid", "Formula variables may only be reported with an Emission Factor formula."),
    ("emission.formula.variable.missing", "Missing value for formula variable(s): {0}."),
    ("emission.formula.variable.ashRange", "Ash content (A) must be between 0.01 and 30 percent."),
    ("emission.formula.variable.sulfurRange", "Sulfur content (SU) must be between 0.00001 and 10 percent."),
    ("emission.totalEmissions.required", "Total Emissions are required."),
    ("emission.totalEmissions.range", "Total Emissions must be greater than or equal to 0."),
    ("emission.totalEmissions.tolerance", "Total Emissions {0} differ from the calculated value {1} by more than {2} percent."),
    ("emission.emissionsCurieUom.required", "Emissions for pollutant {0} must be reported in Curies."),
    ("emission.controlPercent.range", "Overall Control Percent must be at least 0 and less than 100."),
    ("emission.controlPercent.invalid", "Overall Control Percent may not be reported for Calculation Method {0}, which already accounts for controls."),
    ("emission.calculationDescription.required", "A calculation description is required when total emissions are entered for a factor-based method."),
    // release point
    ("releasePoint.releasePointIdentifier.required", "Release Point Identifier is required."),
    ("releasePoint.releasePointIdentifier.duplicate", "Release Point Identifier {0} is used by more than one release point."),
    ("releasePoint.statusYear.required", "Operating Status Year is required when the release point status is {0}."),
    ("releasePoint.statusYear.range", "Release Point Operating Status Year must be between 1900 and {0}."),
    ("releasePoint.statusTypeCode.psWarning", "Release Point {0} is Permanently Shutdown and will not be copied forward into future reports."),
    ("releasePoint.exitGasTemperature.range", "Exit Gas Temperature must be between -30 and 4000 degrees Fahrenheit."),
    ("releasePoint.stack.required", "Stack Height is required for operating stack {0}."),
    ("releasePoint.stack.heightRange", "Stack Height must be between 1 and 1300 feet."),
    ("releasePoint.stack.diameterOrLengthWidth", "Either a Stack Diameter or a Stack Width and Length is required."),
    ("releasePoint.stack.noDiameterAndLengthWidth", "Stack Diameter may not be reported together with Stack Width and Length."),
    ("releasePoint.stack.diameterRange", "Stack Diameter must be between 0.001 and 300 feet."),
    ("releasePoint.stackWarning.diameterCheck.height", "Stack Diameter {0} is not smaller than Stack Height {1}."),
    ("releasePoint.fugitive.heightRange", "Fugitive Height must be between 0 and 500 feet."),
    ("releasePoint.fugitive.lengthRange", "Fugitive Length must be between 1 and 10000 feet."),
    ("releasePoint.fugitive.widthRange", "Fugitive Width must be between 1 and 10000 feet."),
    ("releasePoint.fugitive.angleRange", "Fugitive Angle must be between 0 and 89 degrees."),
    // control
    ("control.controlIdentifier.required", "Control Identifier is required."),
    ("control.controlIdentifier.duplicate", "Control Identifier {0} is used by more than one control."),
    ("control.statusYear.required", "Operating Status Year is required when the control status is {0}."),
    ("control.statusYear.range", "Control Operating Status Year must be between 1900 and {0}."),
    ("control.percentControl.range", "Percent Control Effectiveness must be between 0 and 100."),
    ("control.percentCapture.range", "Percent Capture Efficiency must be between 0 and 100."),
    ("control.controlMeasureCode.required", "Control Measure is required."),
    ("control.controlPollutant.range", "Percent Reduction for pollutant {0} must be between 5 and 99.9."),
    ("control.controlPollutant.duplicate", "Pollutant {0} is reported more than once for this control."),
    ("control.pathWarning", "Control {0} is operating but is not assigned to any control path."),
    // control path
    ("controlPath.controlPathIdentifier.required", "Control Path Identifier is required."),
    ("controlPath.controlPathIdentifier.duplicate", "Control Path Identifier {0} is used by more than one control path."),
    ("controlPath.cycle", "Control paths form a cycle: {0}."),
    ("controlPath.assignment.percentApportionment.range", "Percent Apportionment of assignment {0} must be between 0.1 and 100."),
    ("controlPath.assignment.sequenceNumber.duplicate", "Sequence Number {0} is used more than once in this path."),
    ("controlPath.assignment.target", "Assignment {0} must reference exactly one control or child path."),
    ("controlPath.assignment.control.invalid", "Assignment {0} references a control that does not exist in the facility."),
    ("controlPath.assignment.controlPath.invalid", "Assignment {0} references a control path that does not exist in the facility."),
    ("controlPath.notAssigned", "Control Path {0} does not lead to any control device."),
    ("controlPath.percentControl.range", "Path Percent Control must be between 0 and 100."),
];

fn catalogue() -> &'static HashMap<&'static str, &'static str> {
    static CATALOGUE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOGUE.get_or_init(|| TEMPLATES.iter().copied().collect())
}

pub fn template(key: &str) -> Option<&'static str> {
    catalogue().get(key).copied()
}

pub fn contains(key: &str) -> bool {
    template(key).is_some()
}

/// Substitutes `{n}` with `args[n]`. Placeholders without an argument are left as is.
pub fn format_template(template: &str, args: &[String]) -> String {
    let mut rendered = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        rendered = rendered.replace(&format!("{{{}}}", i), arg);
    }
    rendered
}

pub fn render(key: &str, args: &[String]) -> String {
    match template(key) {
        Some(template) => format_template(template, args),
        None if args.is_empty() => key.to_string(),
        None => format!("{}: {}", key, args.join(", ")),
    }
}
