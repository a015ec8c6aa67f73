//! Cross-pollutant consistency checks within one reporting period.
//!
//! Each pair compares the summed tons of two pollutant groups. Pairs come from
//! configuration so new comparisons need no code change.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use airinv_models::{ReportingPeriod, ValidationField};
use airinv_utils::{PairComparison, PollutantPairConfig, ValidationSettings};

use super::period::period_applies;
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, PeriodTarget};

pub const FLUORIDE_MESSAGE_KEY: &str = "reportingPeriod.emission.hf.greater.fluorides";

#[derive(Debug, Clone)]
pub struct PollutantPair {
    pub message_key: String,
    pub lhs: Vec<String>,
    pub comparison: PairComparison,
    pub rhs: Vec<String>,
    /// Sum whichever left-hand codes are present instead of requiring all of them.
    pub partial_lhs: bool,
}

impl From<&PollutantPairConfig> for PollutantPair {
    fn from(config: &PollutantPairConfig) -> Self {
        Self {
            message_key: config.message_key.clone(),
            lhs: config.lhs.clone(),
            comparison: config.comparison,
            rhs: config.rhs.clone(),
            partial_lhs: false,
        }
    }
}

/// Summed tons of one pollutant group.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GroupTons {
    Tons(Decimal),
    /// The sum does not fit in a Decimal.
    Overflow,
}

impl std::fmt::Display for GroupTons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupTons::Tons(tons) => write!(f, "{}", tons.normalize()),
            GroupTons::Overflow => write!(f, ">{}", Decimal::MAX),
        }
    }
}

/// Summed tons for `codes`, or None when the group is not fully reported.
fn group_tons(period: &ReportingPeriod, codes: &[String], partial: bool) -> Option<GroupTons> {
    let mut total = Some(Decimal::ZERO);
    let mut found = 0usize;

    for code in codes {
        let tons = period
            .emissions
            .iter()
            .filter(|e| e.pollutant() == Some(code.as_str()))
            .find_map(|e| e.reported_tons());
        match tons {
            Some(tons) => {
                total = total.and_then(|sum| sum.checked_add(tons));
                found += 1;
            }
            None if !partial => return None,
            None => {}
        }
    }

    (found > 0).then_some(total.map_or(GroupTons::Overflow, GroupTons::Tons))
}

impl PollutantPair {
    /// Both sides when the pair is violated. Pairs with a missing side never fire.
    /// A side too large to sum always violates.
    fn violated(&self, period: &ReportingPeriod, tolerance: Decimal) -> Option<(GroupTons, GroupTons)> {
        let lhs_group = group_tons(period, &self.lhs, self.partial_lhs)?;
        let rhs_group = group_tons(period, &self.rhs, false)?;

        let (GroupTons::Tons(lhs), GroupTons::Tons(rhs)) = (lhs_group, rhs_group) else {
            return Some((lhs_group, rhs_group));
        };

        let violated = match self.comparison {
            PairComparison::LessOrEqual => lhs > rhs,
            PairComparison::GreaterOrEqual => lhs < rhs,
            PairComparison::Equal => lhs.checked_sub(rhs).map_or(true, |diff| diff.abs() > tolerance),
        };
        violated.then_some((lhs_group, rhs_group))
    }
}

pub struct PollutantPairRules {
    pairs: Vec<PollutantPair>,
    equality_tolerance: Decimal,
}

impl PollutantPairRules {
    pub fn new(pairs: Vec<PollutantPair>, equality_tolerance: Decimal) -> Self {
        Self {
            pairs,
            equality_tolerance,
        }
    }

    /// Configured pairs plus the fluoride family check.
    pub fn from_settings(settings: &ValidationSettings) -> Self {
        let mut pairs: Vec<PollutantPair> = settings.pollutant_pairs.iter().map(PollutantPair::from).collect();

        if !settings.fluoride_family.is_empty() && !settings.total_fluorides_code.is_empty() {
            pairs.push(PollutantPair {
                message_key: FLUORIDE_MESSAGE_KEY.to_string(),
                lhs: settings.fluoride_family.clone(),
                comparison: PairComparison::LessOrEqual,
                rhs: vec![settings.total_fluorides_code.clone()],
                partial_lhs: true,
            });
        }

        let tolerance = Decimal::from_f64(settings.pair_equality_tolerance).unwrap_or(Decimal::ZERO);
        Self::new(pairs, tolerance)
    }

    pub fn pairs(&self) -> &[PollutantPair] {
        &self.pairs
    }
}

impl ValidationRule<scope::Period> for PollutantPairRules {
    fn name(&self) -> &'static str {
        "federal.pollutant_pairs"
    }

    fn applies(&self, _ctx: &ValidationContext<'_>, target: &PeriodTarget<'_>) -> bool {
        period_applies(target)
    }

    fn validate(&self, _ctx: &ValidationContext<'_>, target: &PeriodTarget<'_>, findings: &mut Findings) -> bool {
        let description = findings.details().describe();

        for pair in &self.pairs {
            if let Some((lhs, rhs)) = pair.violated(target.period, self.equality_tolerance) {
                findings.error(
                    ValidationField::PeriodEmission,
                    &pair.message_key,
                    &args![lhs, rhs, description],
                );
            }
        }

        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::target::ValidationTarget;
    use airinv_models::{Emission, EmissionsProcess, EmissionsReport, EmissionsUnit, FacilitySite};
    use proptest::prelude::*;

    fn period_with(emissions: &[(&str, i64)]) -> ReportingPeriod {
        ReportingPeriod {
            emissions: emissions
                .iter()
                .map(|(code, tons)| Emission::with_tons(*code, Decimal::new(*tons, 0)))
                .collect(),
            ..ReportingPeriod::default()
        }
    }

    fn run(period: ReportingPeriod) -> Findings {
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(&reference, &settings, &report);

        let facility = FacilitySite::new("Plant");
        let unit = EmissionsUnit::new("B-1");
        let mut process = EmissionsProcess::new("P-1", "10200303");
        process.reporting_periods.push(period);
        let target = PeriodTarget {
            facility: &facility,
            unit: &unit,
            process: &process,
            period: &process.reporting_periods[0],
        };
        let mut findings = Findings::new(target.details());
        PollutantPairRules::from_settings(&settings).validate(&ctx, &target, &mut findings);
        findings
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    #[test]
    fn test_filterable_exceeds_primary() {
        let findings = run(period_with(&[("PM10-FIL", 100), ("PM10-PRI", 10)]));
        assert_eq!(keys(&findings), vec!["reportingPeriod.emission.pm10.fil.greater.pri"]);
        assert_eq!(findings.entries()[0].field, ValidationField::PeriodEmission);
        assert!(findings.entries()[0].message.contains("(100 tons)"));

        let findings = run(period_with(&[("PM25-FIL", 100), ("PM25-PRI", 10)]));
        assert_eq!(keys(&findings), vec!["reportingPeriod.emission.pm25.fil.greater.pri"]);
    }

    #[test]
    fn test_filterable_plus_condensible_must_equal_primary() {
        assert!(run(period_with(&[("PM10-FIL", 6), ("PM-CON", 4), ("PM10-PRI", 10)])).is_empty());

        let findings = run(period_with(&[("PM10-FIL", 6), ("PM-CON", 3), ("PM10-PRI", 10)]));
        assert_eq!(keys(&findings), vec!["reportingPeriod.emission.pm10.invalid"]);
    }

    #[test]
    fn test_fluorides() {
        let findings = run(period_with(&[("7664393", 5), ("16984488", 2)]));
        assert_eq!(keys(&findings), vec![FLUORIDE_MESSAGE_KEY]);

        assert!(run(period_with(&[("7664393", 5)])).is_empty());
        assert!(run(period_with(&[("7664393", 1), ("16984488", 2)])).is_empty());
    }

    #[test]
    fn test_equality_tolerance() {
        let mut period = period_with(&[("PM25-FIL", 6), ("PM-CON", 4)]);
        period
            .emissions
            .push(Emission::with_tons("PM25-PRI", Decimal::new(100_000_005, 7)));
        assert!(run(period).is_empty());
    }

    #[test]
    fn test_shut_down_process_skipped() {
        let facility = FacilitySite::new("Plant");
        let unit = EmissionsUnit::new("B-1");
        let mut process = EmissionsProcess::new("P-1", "10200303");
        process.status_code = Some("TS".to_string());
        process.reporting_periods.push(ReportingPeriod::default());
        let target = PeriodTarget {
            facility: &facility,
            unit: &unit,
            process: &process,
            period: &process.reporting_periods[0],
        };
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(&reference, &settings, &report);
        assert!(!PollutantPairRules::from_settings(&settings).applies(&ctx, &target));
    }

    #[test]
    fn test_overflowing_group_is_violation() {
        let mut period = period_with(&[("PM-CON", 1), ("PM10-PRI", 1)]);
        period.emissions.push(Emission::with_tons("PM10-FIL", Decimal::MAX));

        let findings = run(period);
        let keys = keys(&findings);
        assert!(keys.contains(&"reportingPeriod.emission.pm10.invalid"));
        assert!(keys.contains(&"reportingPeriod.emission.pm10.fil.greater.pri"));
    }

    #[test]
    fn test_overflowing_difference_is_violation() {
        let mut period = period_with(&[("PM-CON", 0)]);
        period.emissions.push(Emission::with_tons("PM10-FIL", Decimal::MAX));
        period.emissions.push(Emission::with_tons("PM10-PRI", Decimal::MIN));

        assert!(keys(&run(period)).contains(&"reportingPeriod.emission.pm10.invalid"));
    }

    prop_compose! {
        fn consistent_pm()(fil in 0i64..10_000, con in 0i64..10_000) -> (i64, i64) {
            (fil, con)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_consistent_pm10_never_fires((fil, con) in consistent_pm()) {
            let findings = run(period_with(&[("PM10-FIL", fil), ("PM-CON", con), ("PM10-PRI", fil + con)]));
            prop_assert!(findings.is_empty());
        }
    }
}
