//! Emissions processes and their release point apportionment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::period::ReportingPeriod;

/// Specific activity on a unit, classified by its SCC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionsProcess {
    pub id: Uuid,
    pub identifier: String,
    pub scc_code: Option<String>,
    pub aircraft_engine_code: Option<String>,
    pub status_code: Option<String>,
    pub status_year: Option<i16>,
    pub previous_year_status_code: Option<String>,
    #[serde(default)]
    pub release_point_appts: Vec<ReleasePointAppt>,
    #[serde(default)]
    pub reporting_periods: Vec<ReportingPeriod>,
}

impl Default for EmissionsProcess {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: String::new(),
            scc_code: None,
            aircraft_engine_code: None,
            status_code: Some(crate::status::STATUS_OPERATING.to_string()),
            status_year: None,
            previous_year_status_code: None,
            release_point_appts: Vec::new(),
            reporting_periods: Vec::new(),
        }
    }
}

impl EmissionsProcess {
    pub fn new(identifier: impl Into<String>, scc_code: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            scc_code: Some(scc_code.into()),
            ..Self::default()
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status_code.as_deref()
    }

    /// Sum of all apportionment percentages, None when the sum overflows.
    pub fn total_apportionment(&self) -> Option<Decimal> {
        self.release_point_appts
            .iter()
            .try_fold(Decimal::ZERO, |total, appt| total.checked_add(appt.percent))
    }
}

/// Percentage of a process's emissions leaving through one release point,
/// optionally passing a control path first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleasePointAppt {
    pub release_point_id: Uuid,
    pub control_path_id: Option<Uuid>,
    pub percent: Decimal,
}

impl ReleasePointAppt {
    pub fn new(release_point_id: Uuid, percent: Decimal) -> Self {
        Self {
            release_point_id,
            control_path_id: None,
            percent,
        }
    }
}
