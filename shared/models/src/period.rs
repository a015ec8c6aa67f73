//! Reporting periods, their throughput, and operating details.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::emission::Emission;

/// A time slice of a process with its throughput and emissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportingPeriod {
    pub id: Uuid,
    /// "A" for annual, "O3D" for ozone season, ...
    pub period_type_code: Option<String>,
    pub operating_type_code: Option<String>,
    pub calculation_parameter_value: Option<Decimal>,
    pub calculation_material_code: Option<String>,
    pub calculation_parameter_type_code: Option<String>,
    pub calculation_parameter_uom: Option<String>,
    pub fuel_use_value: Option<Decimal>,
    pub fuel_use_material_code: Option<String>,
    pub fuel_use_uom: Option<String>,
    pub heat_content_value: Option<Decimal>,
    pub heat_content_uom: Option<String>,
    #[serde(default)]
    pub operating_details: Vec<OperatingDetail>,
    #[serde(default)]
    pub emissions: Vec<Emission>,
}

impl Default for ReportingPeriod {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            period_type_code: Some("A".to_string()),
            operating_type_code: None,
            calculation_parameter_value: None,
            calculation_material_code: None,
            calculation_parameter_type_code: None,
            calculation_parameter_uom: None,
            fuel_use_value: None,
            fuel_use_material_code: None,
            fuel_use_uom: None,
            heat_content_value: None,
            heat_content_uom: None,
            operating_details: Vec::new(),
            emissions: Vec::new(),
        }
    }
}

impl ReportingPeriod {
    pub fn has_fuel_use(&self) -> bool {
        self.fuel_use_value.is_some()
            || self.fuel_use_material_code.is_some()
            || self.fuel_use_uom.is_some()
    }

    pub fn has_complete_fuel_use(&self) -> bool {
        self.fuel_use_value.is_some()
            && self.fuel_use_material_code.is_some()
            && self.fuel_use_uom.is_some()
    }

    pub fn emission(&self, id: Uuid) -> Option<&Emission> {
        self.emissions.iter().find(|e| e.id == id)
    }
}

/// Weekly and seasonal activity breakdown of a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OperatingDetail {
    pub avg_hours_per_day: Option<Decimal>,
    pub avg_days_per_week: Option<Decimal>,
    pub avg_weeks_per_period: Option<i16>,
    pub actual_hours_per_period: Option<i32>,
    pub percent_winter: Option<Decimal>,
    pub percent_spring: Option<Decimal>,
    pub percent_summer: Option<Decimal>,
    pub percent_fall: Option<Decimal>,
}

impl OperatingDetail {
    /// Seasonal percents in winter, spring, summer, fall order.
    pub fn seasonal_percents(&self) -> [Option<Decimal>; 4] {
        [
            self.percent_winter,
            self.percent_spring,
            self.percent_summer,
            self.percent_fall,
        ]
    }

    pub fn has_seasonal_percents(&self) -> bool {
        self.seasonal_percents().iter().any(Option::is_some)
    }

    /// Sum of the reported seasonal percents. None when none were reported or
    /// the sum overflows.
    pub fn seasonal_total(&self) -> Option<Decimal> {
        if !self.has_seasonal_percents() {
            return None;
        }
        self.seasonal_percents()
            .iter()
            .flatten()
            .try_fold(Decimal::ZERO, |total, percent| total.checked_add(*percent))
    }
}
