//! Per-run context and the per-rule findings accumulator.

use airinv_calculation::EmissionCalculator;
use airinv_models::{EmissionsReport, LegacyFilter, ReferenceData, ValidationField};
use airinv_utils::ValidationSettings;

use crate::messages;
use crate::result::{Severity, ValidationDetails, ValidationEntry};

/// Read-only state shared by every rule invocation in one run.
pub struct ValidationContext<'a> {
    pub reference: &'a dyn ReferenceData,
    pub calculator: EmissionCalculator<'a>,
    pub settings: &'a ValidationSettings,
    pub report_year: i16,
    pub program_system_code: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        reference: &'a dyn ReferenceData,
        calculator: EmissionCalculator<'a>,
        settings: &'a ValidationSettings,
        report: &'a EmissionsReport,
    ) -> Self {
        Self {
            reference,
            calculator,
            settings,
            report_year: report.year,
            program_system_code: report.program_system_code.as_deref(),
        }
    }

    /// Lookups that admit legacy records so rules can report them as legacy.
    pub fn all_records(&self) -> LegacyFilter {
        LegacyFilter::All
    }

    pub fn current_records(&self) -> LegacyFilter {
        LegacyFilter::Current(self.report_year)
    }

    /// Status year must fall between 1900 and the report year.
    pub fn status_year_in_range(&self, year: i16) -> bool {
        (1900..=self.report_year).contains(&year)
    }

    pub fn is_known_status(&self, code: Option<&str>) -> bool {
        code.and_then(|c| self.reference.operating_status(c)).is_some()
    }
}

/// Append-only findings of a single rule invocation. The chain merges them into
/// the run's result once the rule returns.
#[derive(Debug, Clone)]
pub struct Findings {
    details: ValidationDetails,
    entries: Vec<ValidationEntry>,
}

impl Findings {
    pub fn new(details: ValidationDetails) -> Self {
        Self {
            details,
            entries: Vec::new(),
        }
    }

    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }

    pub fn error(&mut self, field: ValidationField, key: &str, args: &[String]) {
        let details = self.details.clone();
        self.push_at(details, field, Severity::Error, key, args);
    }

    pub fn warning(&mut self, field: ValidationField, key: &str, args: &[String]) {
        let details = self.details.clone();
        self.push_at(details, field, Severity::Warning, key, args);
    }

    /// Records against another entity than the rule's target, e.g. a report-level
    /// rule flagging a reporting period.
    pub fn error_at(&mut self, details: ValidationDetails, field: ValidationField, key: &str, args: &[String]) {
        self.push_at(details, field, Severity::Error, key, args);
    }

    pub fn warning_at(&mut self, details: ValidationDetails, field: ValidationField, key: &str, args: &[String]) {
        self.push_at(details, field, Severity::Warning, key, args);
    }

    fn push_at(
        &mut self,
        details: ValidationDetails,
        field: ValidationField,
        severity: Severity,
        key: &str,
        args: &[String],
    ) {
        self.entries.push(ValidationEntry {
            field,
            message_key: key.to_string(),
            message: messages::render(key, args),
            severity,
            details: Some(details),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(ValidationEntry::is_error)
    }

    pub fn entries(&self) -> &[ValidationEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ValidationEntry> {
        self.entries
    }
}

/// Builds a message argument list from anything displayable.
#[macro_export]
macro_rules! args {
    () => { Vec::<String>::new() };
    ($($arg:expr),+ $(,)?) => { vec![$($arg.to_string()),+] };
}
