//! Emissions report root entity and its lifecycle states.
//!
//! A report is a year-stamped submission for one facility. It exclusively owns
//! the facility sites below it; every other entity in this crate hangs off that tree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facility::FacilitySite;

/// Annual emissions report submitted for one facility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionsReport {
    pub id: Uuid,
    pub eis_program_id: Option<String>,
    pub year: i16,
    /// Jurisdiction that owns the report, used to select additional rules.
    pub program_system_code: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub facility_sites: Vec<FacilitySite>,
}

impl Default for EmissionsReport {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            eis_program_id: None,
            year: 2020,
            program_system_code: None,
            status: ReportStatus::InProgress,
            validation_status: ValidationStatus::Unvalidated,
            facility_sites: Vec::new(),
        }
    }
}

impl EmissionsReport {
    pub fn new(year: i16, program_system_code: impl Into<String>) -> Self {
        Self {
            year,
            program_system_code: Some(program_system_code.into()),
            ..Self::default()
        }
    }

    /// Moves the report to `target`, refusing transitions the lifecycle does not allow.
    pub fn transition_to(&mut self, target: ReportStatus) -> Result<(), String> {
        if !self.status.can_transition_to(target) {
            return Err(format!(
                "Report {} cannot move from {} to {}",
                self.id, self.status, target
            ));
        }
        self.status = target;
        Ok(())
    }

    /// Total number of emissions across the whole tree.
    pub fn emission_count(&self) -> usize {
        self.facility_sites
            .iter()
            .flat_map(|site| site.emissions_units.iter())
            .flat_map(|unit| unit.processes.iter())
            .flat_map(|process| process.reporting_periods.iter())
            .map(|period| period.emissions.len())
            .sum()
    }
}

/// Report submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Being edited by the facility
    #[default]
    InProgress,
    /// Certified and submitted
    Submitted,
    /// Picked up by a reviewer
    UnderReview,
    Accepted,
    Rejected,
    Deleted,
}

impl ReportStatus {
    pub fn can_transition_to(&self, target: ReportStatus) -> bool {
        use ReportStatus::*;

        match (self, target) {
            (InProgress, Submitted) => true,
            (InProgress, Deleted) => true,

            (Submitted, UnderReview) => true,
            (Submitted, InProgress) => true, // reopened by the preparer

            (UnderReview, Accepted) => true,
            (UnderReview, Rejected) => true,

            // Rejected reports go back to the facility for edits
            (Rejected, InProgress) => true,

            (Accepted, _) => false,
            (Deleted, _) => false,

            _ => false,
        }
    }

    /// Accepted and deleted reports can no longer change. A rejected report is
    /// final for the submission that produced it even though it may be reopened.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Accepted | ReportStatus::Rejected | ReportStatus::Deleted)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "in_progress" => Some(Self::InProgress),
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "accepted" | "approved" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Submitted => write!(f, "submitted"),
            Self::UnderReview => write!(f, "under_review"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Outcome of the last validation run stored on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    #[default]
    Unvalidated,
    Passed,
    PassedWarnings,
    Failed,
}

impl ValidationStatus {
    pub fn from_result(valid: bool, has_warnings: bool) -> Self {
        match (valid, has_warnings) {
            (true, false) => Self::Passed,
            (true, true) => Self::PassedWarnings,
            (false, _) => Self::Failed,
        }
    }

    /// Only validated reports may be submitted.
    pub fn allows_submission(&self) -> bool {
        matches!(self, Self::Passed | Self::PassedWarnings)
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unvalidated => write!(f, "unvalidated"),
            Self::Passed => write!(f, "passed"),
            Self::PassedWarnings => write!(f, "passed_warnings"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
