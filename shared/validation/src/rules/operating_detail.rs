use rust_decimal::Decimal;

use airinv_models::status::is_shutdown;
use airinv_models::ValidationField;

use super::{display_total, within};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, OperatingDetailTarget};

const SEASONS: [(&str, ValidationField); 4] = [
    ("Winter", ValidationField::DetailPercentWinter),
    ("Spring", ValidationField::DetailPercentSpring),
    ("Summer", ValidationField::DetailPercentSummer),
    ("Fall", ValidationField::DetailPercentFall),
];

/// Hours in a leap year.
const MAX_HOURS_PER_PERIOD: i32 = 8784;

pub struct OperatingDetailRule;

impl ValidationRule<scope::Detail> for OperatingDetailRule {
    fn name(&self) -> &'static str {
        "federal.operating_detail"
    }

    fn applies(&self, _ctx: &ValidationContext<'_>, target: &OperatingDetailTarget<'_>) -> bool {
        !is_shutdown(target.process.status())
    }

    fn validate(
        &self,
        _ctx: &ValidationContext<'_>,
        target: &OperatingDetailTarget<'_>,
        findings: &mut Findings,
    ) -> bool {
        let detail = target.detail;

        if let Some(hours) = detail.avg_hours_per_day {
            if !within(hours, Decimal::ZERO, Decimal::from(24)) {
                findings.error(ValidationField::DetailAvgHoursPerDay, "operatingDetail.avgHoursPerDay.range", &args![]);
            }
        }

        if let Some(days) = detail.avg_days_per_week {
            if !within(days, Decimal::ZERO, Decimal::from(7)) {
                findings.error(ValidationField::DetailAvgDaysPerWeek, "operatingDetail.avgDaysPerWeek.range", &args![]);
            }
        }

        if let Some(weeks) = detail.avg_weeks_per_period {
            if !(0..=52).contains(&weeks) {
                findings.error(
                    ValidationField::DetailAvgWeeksPerPeriod,
                    "operatingDetail.avgWeeksPerPeriod.range",
                    &args![],
                );
            }
        }

        if let Some(hours) = detail.actual_hours_per_period {
            if !(0..=MAX_HOURS_PER_PERIOD).contains(&hours) {
                findings.error(
                    ValidationField::DetailActualHoursPerPeriod,
                    "operatingDetail.actualHoursPerPeriod.range",
                    &args![],
                );
            }
        }

        if detail.has_seasonal_percents() {
            for ((season, field), percent) in SEASONS.iter().zip(detail.seasonal_percents()) {
                match percent {
                    None => findings.error(*field, "operatingDetail.percent.required", &args![season]),
                    Some(value) if !within(value, Decimal::ZERO, Decimal::ONE_HUNDRED) => {
                        findings.error(*field, "operatingDetail.percent.range", &args![season])
                    }
                    Some(_) => {}
                }
            }

            // The total is only meaningful once every season is reported.
            if detail.seasonal_percents().iter().all(Option::is_some) {
                let total = detail.seasonal_total();
                if total != Some(Decimal::ONE_HUNDRED) {
                    findings.error(
                        ValidationField::DetailPercents,
                        "operatingDetail.percent.total",
                        &args![display_total(total)],
                    );
                }
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
    use airinv_models::{EmissionsProcess, EmissionsReport, EmissionsUnit, OperatingDetail, ReportingPeriod};
    use airinv_utils::ValidationSettings;

    fn run(detail: OperatingDetail) -> Findings {
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(&reference, &settings, &report);

        let unit = EmissionsUnit::new("B-1");
        let process = EmissionsProcess::new("P-1", "10200303");
        let period = ReportingPeriod::default();
        let target = OperatingDetailTarget {
            unit: &unit,
            process: &process,
            period: &period,
            detail: &detail,
        };
        let mut findings = Findings::new(target.details());
        OperatingDetailRule.validate(&ctx, &target, &mut findings);
        findings
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    fn seasons(winter: i64, spring: i64, summer: i64, fall: i64) -> OperatingDetail {
        OperatingDetail {
            avg_hours_per_day: Some(Decimal::from(24)),
            avg_days_per_week: Some(Decimal::from(7)),
            avg_weeks_per_period: Some(52),
            actual_hours_per_period: Some(8760),
            percent_winter: Some(Decimal::from(winter)),
            percent_spring: Some(Decimal::from(spring)),
            percent_summer: Some(Decimal::from(summer)),
            percent_fall: Some(Decimal::from(fall)),
        }
    }

    #[test]
    fn test_full_year_passes() {
        assert!(run(seasons(25, 25, 25, 25)).is_empty());
    }

    #[test]
    fn test_ranges() {
        let detail = OperatingDetail {
            avg_hours_per_day: Some(Decimal::from(25)),
            avg_days_per_week: Some(Decimal::new(75, 1)),
            avg_weeks_per_period: Some(53),
            actual_hours_per_period: Some(8785),
            ..OperatingDetail::default()
        };
        assert_eq!(
            keys(&run(detail)),
            vec![
                "operatingDetail.avgHoursPerDay.range",
                "operatingDetail.avgDaysPerWeek.range",
                "operatingDetail.avgWeeksPerPeriod.range",
                "operatingDetail.actualHoursPerPeriod.range",
            ]
        );
    }

    #[test]
    fn test_seasonal_total() {
        let findings = run(seasons(25, 25, 25, 24));
        assert_eq!(keys(&findings), vec!["operatingDetail.percent.total"]);
        assert_eq!(findings.entries()[0].field, ValidationField::DetailPercents);
    }

    #[test]
    fn test_missing_season_reported_on_its_field() {
        let mut detail = seasons(25, 25, 50, 0);
        detail.percent_fall = None;
        let findings = run(detail);
        assert_eq!(keys(&findings), vec!["operatingDetail.percent.required"]);
        assert_eq!(findings.entries()[0].field, ValidationField::DetailPercentFall);
    }

    #[test]
    fn test_season_out_of_range() {
        let findings = run(seasons(-10, 30, 40, 40));
        assert_eq!(keys(&findings), vec!["operatingDetail.percent.range"]);
        assert!(findings.entries()[0].message.starts_with("Winter"));
    }

    #[test]
    fn test_overflowing_seasons_reported_as_total() {
        let mut detail = seasons(0, 0, 0, 0);
        detail.percent_winter = Some(Decimal::MAX);
        detail.percent_spring = Some(Decimal::MAX);

        let findings = run(detail);
        assert_eq!(
            keys(&findings),
            vec![
                "operatingDetail.percent.range",
                "operatingDetail.percent.range",
                "operatingDetail.percent.total",
            ]
        );
        assert!(findings.entries()[2].message.contains(&Decimal::MAX.to_string()));
    }
}
