//! Exchange document
//!
//! Maps a report tree to the registry's XML exchange format. Totals are written
//! with the export rounding of [`PrecisionPolicy`]; each process carries a
//! control approach summarizing the operating controls on its control paths.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use airinv_calculation::{round_decimal_places, PrecisionPolicy};
use airinv_models::{
    Control, ControlPathGraph, Emission, EmissionsProcess, EmissionsReport, EmissionsUnit, FacilitySite,
    ReleasePoint, ReportingPeriod,
};

const CONTROL_APPROACH_DECIMAL_PLACES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "CERS", rename_all = "PascalCase")]
pub struct CersDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_system_code: Option<String>,
    pub emissions_year: i16,
    pub facility_site: Vec<FacilitySiteXml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FacilitySiteXml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_identifier: Option<String>,
    pub facility_site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_site_status_code: Option<String>,
    #[serde(rename = "FacilityNAICS")]
    pub facility_naics: Vec<NaicsXml>,
    pub emissions_unit: Vec<EmissionsUnitXml>,
    pub release_point: Vec<ReleasePointXml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NaicsXml {
    #[serde(rename = "NAICSCode")]
    pub naics_code: String,
    #[serde(rename = "NAICSCodeType")]
    pub naics_code_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmissionsUnitXml {
    pub unit_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_status_code: Option<String>,
    pub unit_emissions_process: Vec<ProcessXml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessXml {
    pub emissions_process_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_classification_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_control_approach: Option<ControlApproachXml>,
    pub reporting_period: Vec<ReportingPeriodXml>,
    pub release_point_apportionment: Vec<ApportionmentXml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlApproachXml {
    pub control_approach_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_control_approach_effectiveness: Option<String>,
    pub control_measure: Vec<ControlMeasureXml>,
    pub control_pollutant: Vec<ControlPollutantXml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlMeasureXml {
    pub control_measure_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlPollutantXml {
    pub pollutant_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_control_measures_reduction_efficiency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportingPeriodXml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_period_type_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission_operating_type_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_parameter_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_parameter_unit_of_measure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_material_code: Option<String>,
    pub reporting_period_emissions: Vec<EmissionXml>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmissionXml {
    pub pollutant_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_emissions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissions_unit_of_measure_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission_factor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission_calculation_method_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissions_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleasePointXml {
    pub release_point_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_point_type_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_point_status_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApportionmentXml {
    pub release_point_identifier: String,
    pub average_percent_emissions: String,
}

pub struct CersExporter {
    policy: PrecisionPolicy,
}

impl CersExporter {
    pub fn new(policy: PrecisionPolicy) -> Self {
        Self { policy }
    }

    pub fn to_xml(&self, report: &EmissionsReport) -> Result<String, quick_xml::DeError> {
        let xml = quick_xml::se::to_string(&self.document(report))?;
        debug!(report_id = %report.id, bytes = xml.len(), "Exchange document written");
        Ok(xml)
    }

    pub fn document(&self, report: &EmissionsReport) -> CersDocument {
        CersDocument {
            program_system_code: report.program_system_code.clone(),
            emissions_year: report.year,
            facility_site: report.facility_sites.iter().map(|f| self.facility(f)).collect(),
        }
    }

    fn facility(&self, facility: &FacilitySite) -> FacilitySiteXml {
        let graph = ControlPathGraph::build(&facility.control_paths);

        FacilitySiteXml {
            facility_identifier: facility.eis_program_id.clone(),
            facility_site_name: facility.name.clone(),
            facility_site_status_code: facility.status_code.clone(),
            facility_naics: facility
                .naics
                .iter()
                .map(|naics| NaicsXml {
                    naics_code: naics.code.clone(),
                    naics_code_type: naics.naics_type.to_string().to_uppercase(),
                })
                .collect(),
            emissions_unit: facility
                .emissions_units
                .iter()
                .map(|unit| self.unit(facility, &graph, unit))
                .collect(),
            release_point: facility.release_points.iter().map(release_point).collect(),
        }
    }

    fn unit(&self, facility: &FacilitySite, graph: &ControlPathGraph, unit: &EmissionsUnit) -> EmissionsUnitXml {
        EmissionsUnitXml {
            unit_identifier: unit.identifier.clone(),
            unit_description: unit.description.clone(),
            unit_status_code: unit.status_code.clone(),
            unit_emissions_process: unit
                .processes
                .iter()
                .map(|process| self.process(facility, graph, process))
                .collect(),
        }
    }

    fn process(&self, facility: &FacilitySite, graph: &ControlPathGraph, process: &EmissionsProcess) -> ProcessXml {
        ProcessXml {
            emissions_process_identifier: process.identifier.clone(),
            source_classification_code: process.scc_code.clone(),
            process_status_code: process.status_code.clone(),
            process_control_approach: control_approach(facility, graph, process),
            reporting_period: process.reporting_periods.iter().map(|p| self.period(p)).collect(),
            release_point_apportionment: process
                .release_point_appts
                .iter()
                .filter_map(|appt| {
                    let release_point = facility.release_point(appt.release_point_id)?;
                    Some(ApportionmentXml {
                        release_point_identifier: release_point.identifier.clone(),
                        average_percent_emissions: appt.percent.normalize().to_string(),
                    })
                })
                .collect(),
        }
    }

    fn period(&self, period: &ReportingPeriod) -> ReportingPeriodXml {
        ReportingPeriodXml {
            reporting_period_type_code: period.period_type_code.clone(),
            emission_operating_type_code: period.operating_type_code.clone(),
            calculation_parameter_value: period.calculation_parameter_value.map(|v| v.normalize().to_string()),
            calculation_parameter_unit_of_measure: period.calculation_parameter_uom.clone(),
            calculation_material_code: period.calculation_material_code.clone(),
            reporting_period_emissions: period.emissions.iter().map(|e| self.emission(e)).collect(),
        }
    }

    fn emission(&self, emission: &Emission) -> EmissionXml {
        EmissionXml {
            pollutant_code: emission.pollutant().unwrap_or_default().to_string(),
            total_emissions: emission.total_emissions.map(|total| self.policy.format_for_export(total)),
            emissions_unit_of_measure_code: emission.emissions_uom.clone(),
            emission_factor: emission.emissions_factor.map(|ef| ef.normalize().to_string()),
            emission_calculation_method_code: emission.calculation_method_code.clone(),
            emissions_comment: emission.comments.clone(),
        }
    }
}

fn release_point(release_point: &ReleasePoint) -> ReleasePointXml {
    ReleasePointXml {
        release_point_identifier: release_point.identifier.clone(),
        release_point_type_code: release_point.type_code.clone(),
        release_point_status_code: release_point.status_code.clone(),
    }
}

fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(round_decimal_places(
        sum / Decimal::from(values.len()),
        CONTROL_APPROACH_DECIMAL_PLACES,
    ))
}

/// Operating controls reachable from the process's apportionments, averaged
/// into one approach. Omitted unless it names at least one measure and one
/// pollutant.
fn control_approach(
    facility: &FacilitySite,
    graph: &ControlPathGraph,
    process: &EmissionsProcess,
) -> Option<ControlApproachXml> {
    let mut seen = HashSet::new();
    let controls: Vec<&Control> = process
        .release_point_appts
        .iter()
        .filter_map(|appt| appt.control_path_id)
        .flat_map(|path_id| graph.descendant_controls(path_id))
        .filter(|id: &Uuid| seen.insert(*id))
        .filter_map(|id| facility.control(id))
        .filter(|control| control.is_operating())
        .collect();

    if controls.is_empty() {
        return None;
    }

    let percents: Vec<Decimal> = controls.iter().filter_map(|c| c.percent_control).collect();

    let mut measures: Vec<&str> = Vec::new();
    for code in controls.iter().filter_map(|c| c.control_measure_code.as_deref()) {
        if !measures.contains(&code) {
            measures.push(code);
        }
    }

    let mut reductions: Vec<(&str, Vec<Decimal>)> = Vec::new();
    for pollutant in controls.iter().flat_map(|c| &c.pollutants) {
        let code = pollutant.pollutant_code.as_str();
        let position = match reductions.iter().position(|(c, _)| *c == code) {
            Some(position) => position,
            None => {
                reductions.push((code, Vec::new()));
                reductions.len() - 1
            }
        };
        if let Some(percent) = pollutant.percent_reduction {
            reductions[position].1.push(percent);
        }
    }

    if measures.is_empty() || reductions.is_empty() {
        debug!(process = %process.identifier, "Control approach omitted");
        return None;
    }

    Some(ControlApproachXml {
        control_approach_description: controls
            .iter()
            .map(|c| c.identifier.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        percent_control_approach_effectiveness: average(&percents).map(|p| p.normalize().to_string()),
        control_measure: measures
            .into_iter()
            .map(|code| ControlMeasureXml {
                control_measure_code: code.to_string(),
            })
            .collect(),
        control_pollutant: reductions
            .into_iter()
            .map(|(code, values)| ControlPollutantXml {
                pollutant_code: code.to_string(),
                percent_control_measures_reduction_efficiency: average(&values).map(|p| p.normalize().to_string()),
            })
            .collect(),
    })
}
