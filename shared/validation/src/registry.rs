//! Rule registry
//!
//! One federal rule set per entity type plus jurisdiction rule sets keyed by
//! program system code. Built once at startup and shared read-only.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use airinv_utils::{JurisdictionConfig, ValidationSettings};

use crate::context::{Findings, ValidationContext};
use crate::result::ValidationResult;
use crate::rules;
use crate::target::{scope, Entity, ValidationTarget};

pub trait ValidationRule<E: Entity>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Prerequisite check; a rule that does not apply is skipped without findings.
    fn applies(&self, _ctx: &ValidationContext<'_>, _target: &E::Target<'_>) -> bool {
        true
    }

    /// Records findings and returns false when any error was found.
    fn validate(&self, ctx: &ValidationContext<'_>, target: &E::Target<'_>, findings: &mut Findings) -> bool;
}

/// Ordered rules for one entity type.
pub struct RuleSet<E: Entity> {
    rules: Vec<Box<dyn ValidationRule<E>>>,
}

impl<E: Entity> Default for RuleSet<E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<E: Entity> RuleSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl ValidationRule<E> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn ValidationRule<E>>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Runs every applicable rule in order, merging findings into `result`.
    /// Returns true when no rule reported a failure.
    pub fn run(&self, ctx: &ValidationContext<'_>, target: &E::Target<'_>, result: &mut ValidationResult) -> bool {
        let mut passed = true;

        for rule in &self.rules {
            if !rule.applies(ctx, target) {
                debug!(rule = rule.name(), entity = %E::TYPE, "Rule does not apply");
                continue;
            }

            let mut findings = Findings::new(target.details());
            let ok = rule.validate(ctx, target, &mut findings);
            debug!(
                rule = rule.name(),
                entity = %E::TYPE,
                passed = ok,
                findings = findings.len(),
                "Rule evaluated"
            );

            passed &= ok && !findings.has_errors();
            result.extend(findings.into_entries());
        }

        passed
    }
}

/// Additional rules for one jurisdiction, run after the federal rules.
#[derive(Default)]
pub struct JurisdictionRules {
    pub report: RuleSet<scope::Report>,
    pub facility: RuleSet<scope::Facility>,
}

impl JurisdictionRules {
    pub fn from_config(program_system_code: &str, config: &JurisdictionConfig, settings: &ValidationSettings) -> Self {
        let mut rules = Self::default();

        if !config.required_naics_types.is_empty() {
            rules.facility.push(Box::new(rules::jurisdiction::RequiredNaicsTypesRule::new(
                program_system_code,
                &config.required_naics_types,
            )));
        }

        if config.emissions_total_error_tolerance.is_some() || config.emissions_total_warning_tolerance.is_some() {
            rules.report.push(Box::new(rules::jurisdiction::JurisdictionToleranceRule::new(
                config.emissions_total_error_tolerance,
                config.emissions_total_warning_tolerance,
                settings,
            )));
        }

        if config.require_fuel_use_values {
            rules.report.push(Box::new(rules::jurisdiction::FuelUseRequiredRule::new(program_system_code)));
        }

        rules
    }

    pub fn len(&self) -> usize {
        self.report.len() + self.facility.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable rule lookup shared by every validation run.
pub struct RuleRegistry {
    pub report: RuleSet<scope::Report>,
    pub facility: RuleSet<scope::Facility>,
    pub unit: RuleSet<scope::Unit>,
    pub process: RuleSet<scope::Process>,
    pub period: RuleSet<scope::Period>,
    pub operating_detail: RuleSet<scope::Detail>,
    pub emission: RuleSet<scope::Emission>,
    pub release_point: RuleSet<scope::ReleasePoint>,
    pub control: RuleSet<scope::Control>,
    pub control_path: RuleSet<scope::ControlPath>,
    jurisdictions: HashMap<String, JurisdictionRules>,
}

impl RuleRegistry {
    /// Federal rules only.
    pub fn federal(settings: &ValidationSettings) -> Self {
        Self {
            report: RuleSet::new().with(rules::report::ReportRule),
            facility: RuleSet::new().with(rules::facility::FacilitySiteRule),
            unit: RuleSet::new().with(rules::emissions_unit::EmissionsUnitRule),
            process: RuleSet::new().with(rules::process::EmissionsProcessRule),
            period: RuleSet::new()
                .with(rules::period::ReportingPeriodRule)
                .with(rules::pollutant_pairs::PollutantPairRules::from_settings(settings)),
            operating_detail: RuleSet::new().with(rules::operating_detail::OperatingDetailRule),
            emission: RuleSet::new().with(rules::emission::EmissionRule::from_settings(settings)),
            release_point: RuleSet::new().with(rules::release_point::ReleasePointRule),
            control: RuleSet::new().with(rules::control::ControlRule),
            control_path: RuleSet::new().with(rules::control_path::ControlPathRule),
            jurisdictions: HashMap::new(),
        }
    }

    /// Federal rules plus one jurisdiction rule set per configured program system code.
    pub fn build(settings: &ValidationSettings, jurisdictions: &HashMap<String, JurisdictionConfig>) -> Self {
        let mut registry = Self::federal(settings);

        for (code, config) in jurisdictions {
            let rules = JurisdictionRules::from_config(code, config, settings);
            if !rules.is_empty() {
                registry.jurisdictions.insert(code.clone(), rules);
            }
        }

        info!(
            jurisdictions = registry.jurisdictions.len(),
            "Validation rule registry built"
        );
        registry
    }

    pub fn with_jurisdiction(mut self, program_system_code: impl Into<String>, rules: JurisdictionRules) -> Self {
        self.jurisdictions.insert(program_system_code.into(), rules);
        self
    }

    pub fn jurisdiction(&self, program_system_code: Option<&str>) -> Option<&JurisdictionRules> {
        program_system_code.and_then(|code| self.jurisdictions.get(code))
    }

    pub fn jurisdiction_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.jurisdictions.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_federal_registry_has_rule_per_entity() {
        let registry = RuleRegistry::federal(&ValidationSettings::default());
        assert_eq!(registry.report.names(), vec!["federal.report"]);
        assert_eq!(registry.period.len(), 2);
        assert_eq!(registry.emission.len(), 1);
        assert!(registry.jurisdiction(Some("GADNR")).is_none());
    }

    #[test]
    fn test_jurisdiction_rules_from_config() {
        let mut jurisdictions = HashMap::new();
        jurisdictions.insert(
            "GADNR".to_string(),
            JurisdictionConfig {
                required_naics_types: vec!["primary".to_string(), "secondary".to_string()],
                require_fuel_use_values: true,
                ..JurisdictionConfig::default()
            },
        );
        jurisdictions.insert("DOEE".to_string(), JurisdictionConfig::default());

        let registry = RuleRegistry::build(&ValidationSettings::default(), &jurisdictions);
        assert_eq!(registry.jurisdiction_codes(), vec!["GADNR"]);

        let ga = registry.jurisdiction(Some("GADNR")).unwrap();
        assert_eq!(ga.facility.len(), 1);
        assert_eq!(ga.report.names(), vec!["jurisdiction.fuel_use_required"]);
        assert!(registry.jurisdiction(Some("DOEE")).is_none());
        assert!(registry.jurisdiction(None).is_none());
    }
}
