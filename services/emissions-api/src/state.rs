use std::sync::Arc;

use anyhow::Result;
use prometheus::Registry;
use tracing::info;

use airinv_calculation::{EmissionCalculator, PrecisionPolicy};
use airinv_models::{CachedReferenceData, InMemoryReferenceData, ReferenceData};
use airinv_utils::AppConfig;
use airinv_validation::{RuleRegistry, ValidationChain, ValidationService};

use crate::metrics::ApiMetrics;

pub type SharedReference = CachedReferenceData<InMemoryReferenceData>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub reference: SharedReference,
    pub validation: ValidationService,
    pub metrics: ApiMetrics,
    pub registry: Registry,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tables = match &config.reference.seed_path {
            Some(path) => InMemoryReferenceData::load(path)?,
            None => InMemoryReferenceData::standard(),
        };
        let reference = CachedReferenceData::new(tables);

        let policy = policy_for(&config);
        let rules = RuleRegistry::build(&config.validation, &config.jurisdictions).shared();
        info!(jurisdictions = ?rules.jurisdiction_codes(), "Validation rules loaded");

        let chain = ValidationChain::new(
            rules,
            Arc::new(reference.clone()) as Arc<dyn ReferenceData>,
            Arc::new(config.validation.clone()),
        )
        .with_policy(policy)
        .with_leap_year_aware(config.calculation.leap_year_aware);

        let registry = Registry::new();
        let metrics = ApiMetrics::new(&registry, &config.monitoring.prometheus_namespace)?;

        Ok(Self {
            config: Arc::new(config),
            reference,
            validation: ValidationService::new(chain),
            metrics,
            registry,
        })
    }

    pub fn policy(&self) -> PrecisionPolicy {
        policy_for(&self.config)
    }

    pub fn calculator(&self) -> EmissionCalculator<'_> {
        EmissionCalculator::new(&self.reference)
            .with_policy(self.policy())
            .with_leap_year_aware(self.config.calculation.leap_year_aware)
    }
}

fn policy_for(config: &AppConfig) -> PrecisionPolicy {
    PrecisionPolicy::new(
        config.calculation.significant_figures,
        config.calculation.export_decimal_places,
    )
}
