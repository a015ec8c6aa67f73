//! Reference data cache
//!
//! Process-wide read-through cache in front of any [`ReferenceData`] source.
//! Entries are populated on first lookup (negative results included) and only
//! dropped by [`CachedReferenceData::invalidate`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::records::*;
use super::{LegacyFilter, ReferenceData};

type Key = (String, Option<LegacyFilter>);

struct Table<R> {
    entries: RwLock<HashMap<Key, Option<R>>>,
}

impl<R: Clone> Table<R> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_load(&self, key: Key, stats: &CacheStats, load: impl FnOnce() -> Option<R>) -> Option<R> {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = entries.get(&key) {
                stats.hits.fetch_add(1, Ordering::Relaxed);
                return hit.clone();
            }
        }

        stats.misses.fetch_add(1, Ordering::Relaxed);
        let loaded = load();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(key).or_insert_with(|| loaded.clone());
        loaded
    }

    fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[derive(Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

struct Inner<S> {
    source: S,
    units: Table<UnitOfMeasure>,
    pollutants: Table<Pollutant>,
    materials: Table<CalculationMaterial>,
    methods: Table<CalculationMethod>,
    parameter_types: Table<CodeRecord>,
    operating_types: Table<CodeRecord>,
    operating_statuses: Table<CodeRecord>,
    sccs: Table<SccCode>,
    fuel_use_sccs: Table<FuelUseScc>,
    naics: Table<NaicsCode>,
    formula_variables: RwLock<Option<Vec<String>>>,
    stats: CacheStats,
}

/// Cheap to clone; clones share the same cache.
pub struct CachedReferenceData<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for CachedReferenceData<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Hit/miss counters and the number of cached entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl<S: ReferenceData> CachedReferenceData<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                units: Table::new(),
                pollutants: Table::new(),
                materials: Table::new(),
                methods: Table::new(),
                parameter_types: Table::new(),
                operating_types: Table::new(),
                operating_statuses: Table::new(),
                sccs: Table::new(),
                fuel_use_sccs: Table::new(),
                naics: Table::new(),
                formula_variables: RwLock::new(None),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Drops every cached entry, e.g. after an administrative update of the tables.
    pub fn invalidate(&self) {
        let inner = &self.inner;
        inner.units.clear();
        inner.pollutants.clear();
        inner.materials.clear();
        inner.methods.clear();
        inner.parameter_types.clear();
        inner.operating_types.clear();
        inner.operating_statuses.clear();
        inner.sccs.clear();
        inner.fuel_use_sccs.clear();
        inner.naics.clear();
        *inner.formula_variables.write().unwrap_or_else(|e| e.into_inner()) = None;
        tracing::info!("Reference data cache invalidated");
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let inner = &self.inner;
        CacheSnapshot {
            hits: inner.stats.hits.load(Ordering::Relaxed),
            misses: inner.stats.misses.load(Ordering::Relaxed),
            entries: inner.units.len()
                + inner.pollutants.len()
                + inner.materials.len()
                + inner.methods.len()
                + inner.parameter_types.len()
                + inner.operating_types.len()
                + inner.operating_statuses.len()
                + inner.sccs.len()
                + inner.fuel_use_sccs.len()
                + inner.naics.len(),
        }
    }
}

fn key(code: &str, filter: Option<LegacyFilter>) -> Key {
    (code.to_string(), filter)
}

impl<S: ReferenceData> ReferenceData for CachedReferenceData<S> {
    fn unit_of_measure(&self, code: &str, filter: LegacyFilter) -> Option<UnitOfMeasure> {
        let inner = &self.inner;
        inner.units.get_or_load(key(code, Some(filter)), &inner.stats, || {
            inner.source.unit_of_measure(code, filter)
        })
    }

    fn pollutant(&self, code: &str, filter: LegacyFilter) -> Option<Pollutant> {
        let inner = &self.inner;
        inner.pollutants.get_or_load(key(code, Some(filter)), &inner.stats, || {
            inner.source.pollutant(code, filter)
        })
    }

    fn calculation_material(&self, code: &str) -> Option<CalculationMaterial> {
        let inner = &self.inner;
        inner.materials.get_or_load(key(code, None), &inner.stats, || {
            inner.source.calculation_material(code)
        })
    }

    fn calculation_method(&self, code: &str) -> Option<CalculationMethod> {
        let inner = &self.inner;
        inner.methods.get_or_load(key(code, None), &inner.stats, || {
            inner.source.calculation_method(code)
        })
    }

    fn calculation_parameter_type(&self, code: &str) -> Option<CodeRecord> {
        let inner = &self.inner;
        inner.parameter_types.get_or_load(key(code, None), &inner.stats, || {
            inner.source.calculation_parameter_type(code)
        })
    }

    fn operating_type(&self, code: &str) -> Option<CodeRecord> {
        let inner = &self.inner;
        inner.operating_types.get_or_load(key(code, None), &inner.stats, || {
            inner.source.operating_type(code)
        })
    }

    fn operating_status(&self, code: &str) -> Option<CodeRecord> {
        let inner = &self.inner;
        inner.operating_statuses.get_or_load(key(code, None), &inner.stats, || {
            inner.source.operating_status(code)
        })
    }

    fn scc(&self, code: &str, filter: LegacyFilter) -> Option<SccCode> {
        let inner = &self.inner;
        inner.sccs.get_or_load(key(code, Some(filter)), &inner.stats, || {
            inner.source.scc(code, filter)
        })
    }

    fn fuel_use_scc(&self, scc_code: &str) -> Option<FuelUseScc> {
        let inner = &self.inner;
        inner.fuel_use_sccs.get_or_load(key(scc_code, None), &inner.stats, || {
            inner.source.fuel_use_scc(scc_code)
        })
    }

    fn naics(&self, code: &str, filter: LegacyFilter) -> Option<NaicsCode> {
        let inner = &self.inner;
        inner.naics.get_or_load(key(code, Some(filter)), &inner.stats, || {
            inner.source.naics(code, filter)
        })
    }

    fn formula_variable_codes(&self) -> Vec<String> {
        {
            let cached = self.inner.formula_variables.read().unwrap_or_else(|e| e.into_inner());
            if let Some(codes) = cached.as_ref() {
                return codes.clone();
            }
        }
        let codes = self.inner.source.formula_variable_codes();
        *self.inner.formula_variables.write().unwrap_or_else(|e| e.into_inner()) = Some(codes.clone());
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::InMemoryReferenceData;

    #[test]
    fn test_read_through() {
        let cache = CachedReferenceData::new(InMemoryReferenceData::standard());

        assert!(cache.unit_of_measure("TON", LegacyFilter::All).is_some());
        assert!(cache.unit_of_measure("TON", LegacyFilter::All).is_some());
        assert!(cache.unit_of_measure("NOPE", LegacyFilter::All).is_none());
        assert!(cache.unit_of_measure("NOPE", LegacyFilter::All).is_none());

        let stats = cache.snapshot();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.entries, 2);
    }

    #[test]
    fn test_filter_is_part_of_key() {
        let cache = CachedReferenceData::new(InMemoryReferenceData::standard());
        assert!(cache.unit_of_measure("E3TON", LegacyFilter::All).is_some());
        assert!(cache.unit_of_measure("E3TON", LegacyFilter::Current(2021)).is_none());
    }

    #[test]
    fn test_invalidate_and_shared_clones() {
        let cache = CachedReferenceData::new(InMemoryReferenceData::standard());
        let clone = cache.clone();
        cache.scc("10200302", LegacyFilter::All);
        assert_eq!(clone.snapshot().entries, 1);

        clone.invalidate();
        assert_eq!(cache.snapshot().entries, 0);
        assert_eq!(cache.formula_variable_codes().len(), 5);
    }
}
