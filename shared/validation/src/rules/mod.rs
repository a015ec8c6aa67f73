//! Federal and jurisdiction rules, one module per entity type.

pub mod control;
pub mod control_path;
pub mod emission;
pub mod emissions_unit;
pub mod facility;
pub mod jurisdiction;
pub mod operating_detail;
pub mod period;
pub mod pollutant_pairs;
pub mod process;
pub mod release_point;
pub mod report;

use std::collections::HashMap;

use rust_decimal::Decimal;

use airinv_models::status::STATUS_OPERATING;
use airinv_models::ValidationField;

use crate::args;
use crate::context::{Findings, ValidationContext};

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub(crate) fn within(value: Decimal, min: Decimal, max: Decimal) -> bool {
    value >= min && value <= max
}

/// A checked sum for messages; None means it overflowed.
pub(crate) fn display_total(total: Option<Decimal>) -> String {
    total.map_or_else(|| format!(">{}", Decimal::MAX), |t| t.normalize().to_string())
}

/// Values occurring more than once, in first-seen order.
pub(crate) fn duplicates<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    order.into_iter().filter(|v| counts[v] > 1).collect()
}

/// Identifiers compare trimmed and case-insensitive.
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// True when `identifier` is shared with a sibling and this is the first sibling
/// carrying it, so a duplicate is reported once.
pub(crate) fn is_first_duplicate<'a>(identifier: &str, siblings: impl Iterator<Item = &'a str>, position: usize) -> bool {
    let key = normalize_identifier(identifier);
    let matching: Vec<usize> = siblings
        .enumerate()
        .filter(|(_, other)| normalize_identifier(other) == key)
        .map(|(i, _)| i)
        .collect();
    matching.len() > 1 && matching.first() == Some(&position)
}

/// Status year is required whenever the status is not operating, and must fall
/// between 1900 and the report year.
pub(crate) struct StatusYearCheck<'k> {
    pub field: ValidationField,
    pub required_key: &'k str,
    pub range_key: &'k str,
}

impl StatusYearCheck<'_> {
    pub fn run(&self, ctx: &ValidationContext<'_>, findings: &mut Findings, status: Option<&str>, year: Option<i16>) {
        match (status, year) {
            (Some(code), None) if code != STATUS_OPERATING => {
                findings.error(self.field, self.required_key, &args![code]);
            }
            (_, Some(year)) if !ctx.status_year_in_range(year) => {
                findings.error(self.field, self.range_key, &args![ctx.report_year]);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use airinv_calculation::EmissionCalculator;
    use airinv_models::{EmissionsReport, InMemoryReferenceData};
    use airinv_utils::ValidationSettings;

    use crate::context::ValidationContext;

    pub fn reference() -> InMemoryReferenceData {
        InMemoryReferenceData::standard()
    }

    pub fn context<'a>(
        reference: &'a InMemoryReferenceData,
        settings: &'a ValidationSettings,
        report: &'a EmissionsReport,
    ) -> ValidationContext<'a> {
        ValidationContext::new(reference, EmissionCalculator::new(reference), settings, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_first_seen_order() {
        assert_eq!(duplicates(["CO", "NOX", "CO", "SO2", "NOX", "CO"]), vec!["CO", "NOX"]);
        assert!(duplicates(["CO", "NOX"]).is_empty());
    }

    #[test]
    fn test_first_duplicate() {
        let ids = ["Boiler-1", "boiler-1 ", "Boiler-2"];
        assert!(is_first_duplicate("Boiler-1", ids.iter().copied(), 0));
        assert!(!is_first_duplicate("boiler-1 ", ids.iter().copied(), 1));
        assert!(!is_first_duplicate("Boiler-2", ids.iter().copied(), 2));
    }

    #[test]
    fn test_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("  ")));
        assert!(!is_blank(Some("x")));
    }
}
