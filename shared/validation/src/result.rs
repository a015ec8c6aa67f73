//! Validation result
//!
//! Findings from one run, keyed by the dotted path of the field they belong to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use airinv_models::ValidationField;

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Kind of entity a finding was raised against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Report,
    FacilitySite,
    EmissionsUnit,
    EmissionsProcess,
    ReportingPeriod,
    OperatingDetail,
    Emission,
    ReleasePoint,
    Control,
    ControlPath,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Report => "report",
            Self::FacilitySite => "facility_site",
            Self::EmissionsUnit => "emissions_unit",
            Self::EmissionsProcess => "emissions_process",
            Self::ReportingPeriod => "reporting_period",
            Self::OperatingDetail => "operating_detail",
            Self::Emission => "emission",
            Self::ReleasePoint => "release_point",
            Self::Control => "control",
            Self::ControlPath => "control_path",
        };
        write!(f, "{}", name)
    }
}

/// Where in the tree a finding came from, so a UI can link to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetails {
    pub entity_type: EntityType,
    pub entity_id: Option<Uuid>,
    pub identifier: Option<String>,
    /// Identifiers of the enclosing entities, outermost first
    #[serde(default)]
    pub parents: Vec<String>,
}

impl ValidationDetails {
    pub fn new(entity_type: EntityType, entity_id: Uuid) -> Self {
        Self {
            entity_type,
            entity_id: Some(entity_id),
            identifier: None,
            parents: Vec::new(),
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    /// "Emission Unit: B-1, Emission Process: P-1" style description.
    pub fn describe(&self) -> String {
        let mut labels: Vec<String> = self.parents.clone();
        if let Some(identifier) = &self.identifier {
            labels.push(identifier.clone());
        }
        labels.join(", ")
    }
}

/// Single validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationEntry {
    pub field: ValidationField,
    pub message_key: String,
    pub message: String,
    pub severity: Severity,
    pub details: Option<ValidationDetails>,
}

impl ValidationEntry {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub fields_with_errors: usize,
}

/// Findings of one validation run. Built fresh per run, never shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    entries: BTreeMap<String, Vec<ValidationEntry>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ValidationEntry) {
        self.entries.entry(entry.field.path()).or_default().push(entry);
    }

    /// No error-severity entries. Warnings do not fail validation.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn entries(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries.values().flatten()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries().filter(|e| e.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries().filter(|e| e.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn entries_for(&self, field: ValidationField) -> &[ValidationEntry] {
        self.entries
            .get(&field.path())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn errors_for(&self, field: ValidationField) -> usize {
        self.entries_for(field).iter().filter(|e| e.is_error()).count()
    }

    /// Dotted field paths that carry at least one entry.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for (path, entries) in other.entries {
            self.entries.entry(path).or_default().extend(entries);
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ValidationEntry>) {
        for entry in entries {
            self.add(entry);
        }
    }

    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            error_count: self.error_count(),
            warning_count: self.warning_count(),
            fields_with_errors: self
                .entries
                .values()
                .filter(|entries| entries.iter().any(ValidationEntry::is_error))
                .count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One line of the API error list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

/// Wire form of a result: `{valid, errors: [{field, message, severity}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<FieldMessage>,
}

impl From<&ValidationResult> for ValidationResponse {
    fn from(result: &ValidationResult) -> Self {
        Self {
            valid: result.is_valid(),
            errors: result
                .entries()
                .map(|entry| FieldMessage {
                    field: entry.field.path(),
                    message: entry.message.clone(),
                    severity: entry.severity,
                })
                .collect(),
        }
    }
}
