//! Validation chain
//!
//! Walks a report tree top-down and runs the registry's rule sets against each
//! entity. Every rule runs; a failure never stops the walk, except that units
//! with a missing or unknown status are not descended into.

use std::sync::Arc;

use tracing::{debug, info};

use airinv_calculation::{EmissionCalculator, PrecisionPolicy};
use airinv_models::{ControlPathGraph, EmissionsReport, EmissionsUnit, FacilitySite, ReferenceData};
use airinv_utils::ValidationSettings;

use crate::context::ValidationContext;
use crate::registry::{JurisdictionRules, RuleRegistry};
use crate::result::ValidationResult;
use crate::target::{
    ControlPathTarget, ControlTarget, EmissionTarget, FacilityTarget, OperatingDetailTarget, PeriodTarget,
    ProcessTarget, ReleasePointTarget, ReportTarget, UnitTarget,
};

/// Runs the registry's rules over a report. Cheap to clone and safe to share
/// between request handlers.
#[derive(Clone)]
pub struct ValidationChain {
    registry: Arc<RuleRegistry>,
    reference: Arc<dyn ReferenceData>,
    settings: Arc<ValidationSettings>,
    policy: PrecisionPolicy,
    leap_year_aware: bool,
}

impl ValidationChain {
    pub fn new(
        registry: Arc<RuleRegistry>,
        reference: Arc<dyn ReferenceData>,
        settings: Arc<ValidationSettings>,
    ) -> Self {
        Self {
            registry,
            reference,
            settings,
            policy: PrecisionPolicy::default(),
            leap_year_aware: true,
        }
    }

    /// Federal rules only, for callers without jurisdiction configuration.
    pub fn federal(reference: Arc<dyn ReferenceData>, settings: ValidationSettings) -> Self {
        let registry = RuleRegistry::federal(&settings).shared();
        Self::new(registry, reference, Arc::new(settings))
    }

    pub fn with_policy(mut self, policy: PrecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_leap_year_aware(mut self, leap_year_aware: bool) -> Self {
        self.leap_year_aware = leap_year_aware;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn validate(&self, report: &EmissionsReport) -> ValidationResult {
        let calculator = EmissionCalculator::new(self.reference.as_ref())
            .with_policy(self.policy)
            .with_leap_year_aware(self.leap_year_aware);
        let ctx = ValidationContext::new(self.reference.as_ref(), calculator, &self.settings, report);
        let jurisdiction = self.registry.jurisdiction(report.program_system_code.as_deref());
        let mut result = ValidationResult::new();

        let report_target = ReportTarget { report };
        self.registry.report.run(&ctx, &report_target, &mut result);
        if let Some(rules) = jurisdiction {
            rules.report.run(&ctx, &report_target, &mut result);
        }

        for facility in &report.facility_sites {
            self.validate_facility(&ctx, report, facility, jurisdiction, &mut result);
        }

        info!(
            report_id = %report.id,
            year = report.year,
            errors = result.error_count(),
            warnings = result.warning_count(),
            "Report validated"
        );
        result
    }

    fn validate_facility(
        &self,
        ctx: &ValidationContext<'_>,
        report: &EmissionsReport,
        facility: &FacilitySite,
        jurisdiction: Option<&JurisdictionRules>,
        result: &mut ValidationResult,
    ) {
        let registry = &self.registry;

        let target = FacilityTarget { report, facility };
        registry.facility.run(ctx, &target, result);
        if let Some(rules) = jurisdiction {
            rules.facility.run(ctx, &target, result);
        }

        for release_point in &facility.release_points {
            registry
                .release_point
                .run(ctx, &ReleasePointTarget { facility, release_point }, result);
        }

        for control in &facility.controls {
            registry.control.run(ctx, &ControlTarget { facility, control }, result);
        }

        let graph = ControlPathGraph::build(&facility.control_paths);
        for path in &facility.control_paths {
            let target = ControlPathTarget {
                facility,
                path,
                graph: &graph,
            };
            registry.control_path.run(ctx, &target, result);
        }

        for unit in &facility.emissions_units {
            registry.unit.run(ctx, &UnitTarget { facility, unit }, result);

            if !ctx.is_known_status(unit.status()) {
                debug!(unit = %unit.identifier, "Skipping processes of unit without a valid status");
                continue;
            }
            self.validate_processes(ctx, facility, unit, result);
        }
    }

    fn validate_processes(
        &self,
        ctx: &ValidationContext<'_>,
        facility: &FacilitySite,
        unit: &EmissionsUnit,
        result: &mut ValidationResult,
    ) {
        let registry = &self.registry;

        for process in &unit.processes {
            registry.process.run(ctx, &ProcessTarget { facility, unit, process }, result);

            for period in &process.reporting_periods {
                let target = PeriodTarget {
                    facility,
                    unit,
                    process,
                    period,
                };
                registry.period.run(ctx, &target, result);

                for detail in &period.operating_details {
                    let target = OperatingDetailTarget {
                        unit,
                        process,
                        period,
                        detail,
                    };
                    registry.operating_detail.run(ctx, &target, result);
                }

                for emission in &period.emissions {
                    let target = EmissionTarget {
                        unit,
                        process,
                        period,
                        emission,
                    };
                    registry.emission.run(ctx, &target, result);
                }
            }
        }
    }
}
