//! # Report Validation Engine
//!
//! Cross-field validation for annual emissions reports. Rules are registered
//! per entity type in a [`RuleRegistry`]; a [`ValidationChain`] walks the
//! report tree and runs every applicable rule, collecting errors and warnings
//! into a [`ValidationResult`] keyed by dotted field path.
//!
//! Jurisdiction (program system) rules are layered on top of the federal set
//! from configuration, see [`RuleRegistry::build`].

pub mod chain;
pub mod context;
pub mod messages;
pub mod registry;
pub mod result;
pub mod rules;
pub mod service;
pub mod target;

pub use airinv_models::ValidationField;
pub use chain::ValidationChain;
pub use context::{Findings, ValidationContext};
pub use registry::{JurisdictionRules, RuleRegistry, RuleSet, ValidationRule};
pub use result::{
    EntityType, FieldMessage, Severity, ValidationDetails, ValidationEntry, ValidationResponse, ValidationResult,
    ValidationSummary,
};
pub use service::ValidationService;
pub use target::{
    scope, ControlPathTarget, ControlTarget, EmissionTarget, Entity, FacilityTarget, OperatingDetailTarget,
    PeriodTarget, ProcessTarget, ReleasePointTarget, ReportTarget, UnitTarget, ValidationTarget,
};
