//! Reference data lookup
//!
//! Rules and the calculator resolve codes through [`ReferenceData`]. Storage is
//! somebody else's concern: the in-memory table serves tests and seeded
//! deployments, and [`CachedReferenceData`] wraps any source with a
//! process-wide read-through cache.

pub mod cache;
pub mod memory;
pub mod records;

pub use cache::CachedReferenceData;
pub use memory::{InMemoryReferenceData, ReferenceSeed, SeedError};
pub use records::*;

/// Which records a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyFilter {
    /// Include legacy records; callers inspect the record to report legacy use.
    All,
    /// Only records still valid for the given inventory year.
    Current(i16),
}

/// Code lookups against reference tables. Implementations are read-only for the
/// duration of a validation run.
pub trait ReferenceData: Send + Sync {
    fn unit_of_measure(&self, code: &str, filter: LegacyFilter) -> Option<UnitOfMeasure>;

    fn pollutant(&self, code: &str, filter: LegacyFilter) -> Option<Pollutant>;

    fn calculation_material(&self, code: &str) -> Option<CalculationMaterial>;

    fn calculation_method(&self, code: &str) -> Option<CalculationMethod>;

    fn calculation_parameter_type(&self, code: &str) -> Option<CodeRecord>;

    fn operating_type(&self, code: &str) -> Option<CodeRecord>;

    fn operating_status(&self, code: &str) -> Option<CodeRecord>;

    fn scc(&self, code: &str, filter: LegacyFilter) -> Option<SccCode>;

    fn fuel_use_scc(&self, scc_code: &str) -> Option<FuelUseScc>;

    fn naics(&self, code: &str, filter: LegacyFilter) -> Option<NaicsCode>;

    /// Codes of every formula variable a formula may reference.
    fn formula_variable_codes(&self) -> Vec<String>;
}

impl LegacyFilter {
    pub(crate) fn admits(&self, legacy: bool, last_inventory_year: Option<i16>) -> bool {
        match self {
            LegacyFilter::All => true,
            LegacyFilter::Current(year) => {
                !legacy && !matches!(last_inventory_year, Some(last) if last < *year)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_filter() {
        assert!(LegacyFilter::All.admits(true, Some(2000)));
        assert!(!LegacyFilter::Current(2020).admits(true, None));
        assert!(!LegacyFilter::Current(2020).admits(false, Some(2019)));
        assert!(LegacyFilter::Current(2020).admits(false, Some(2020)));
        assert!(LegacyFilter::Current(2020).admits(false, None));
    }
}
