//! Property-based tests for the report tree
//!
//! Serialization round trips of the hierarchical tree and the arithmetic
//! helpers on periods and processes.

use proptest::option;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    Emission, EmissionsProcess, OperatingDetail, ReleasePointAppt, ReportingPeriod,
};

prop_compose! {
    fn arb_uuid()(bytes in prop::array::uniform16(0u8..)) -> Uuid {
        Uuid::from_bytes(bytes)
    }
}

prop_compose! {
    fn arb_percent()(hundredths in 0i64..=10_000) -> Decimal {
        Decimal::new(hundredths, 2)
    }
}

prop_compose! {
    fn arb_tons()(thousandths in 0i64..100_000_000) -> Decimal {
        Decimal::new(thousandths, 3)
    }
}

prop_compose! {
    fn arb_pollutant()(code in prop::sample::select(vec!["CO", "NOX", "SO2", "PM10-FIL", "PM10-PRI", "7664393"])) -> String {
        code.to_string()
    }
}

prop_compose! {
    fn arb_emission()(
        id in arb_uuid(),
        pollutant in arb_pollutant(),
        tons in option::of(arb_tons()),
        control in option::of(arb_percent()),
        manual in any::<bool>()
    ) -> Emission {
        Emission {
            id,
            pollutant_code: Some(pollutant),
            total_emissions: tons,
            emissions_uom: Some("TON".to_string()),
            total_manual_entry: manual,
            overall_control_percent: control,
            ..Emission::default()
        }
    }
}

prop_compose! {
    fn arb_operating_detail()(
        winter in option::of(arb_percent()),
        spring in option::of(arb_percent()),
        summer in option::of(arb_percent()),
        fall in option::of(arb_percent())
    ) -> OperatingDetail {
        OperatingDetail {
            percent_winter: winter,
            percent_spring: spring,
            percent_summer: summer,
            percent_fall: fall,
            ..OperatingDetail::default()
        }
    }
}

prop_compose! {
    fn arb_period()(
        id in arb_uuid(),
        value in option::of(arb_tons()),
        details in prop::collection::vec(arb_operating_detail(), 0..2),
        emissions in prop::collection::vec(arb_emission(), 0..6)
    ) -> ReportingPeriod {
        ReportingPeriod {
            id,
            calculation_parameter_value: value,
            calculation_material_code: Some("226".to_string()),
            calculation_parameter_uom: Some("TON".to_string()),
            operating_details: details,
            emissions,
            ..ReportingPeriod::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_period_serde_round_trip(period in arb_period()) {
        let json = serde_json::to_string(&period).unwrap();
        let back: ReportingPeriod = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(period, back);
    }

    #[test]
    fn prop_seasonal_total_matches_sum(detail in arb_operating_detail()) {
        let expected: Decimal = detail.seasonal_percents().iter().flatten().copied().sum();
        match detail.seasonal_total() {
            Some(total) => prop_assert_eq!(total, expected),
            None => prop_assert!(!detail.has_seasonal_percents()),
        }
    }

    #[test]
    fn prop_total_apportionment_is_sum(percents in prop::collection::vec(arb_percent(), 0..5)) {
        let mut process = EmissionsProcess::new("P1", "10200303");
        for percent in &percents {
            process.release_point_appts.push(ReleasePointAppt::new(Uuid::new_v4(), *percent));
        }
        let expected: Decimal = percents.iter().copied().sum();
        prop_assert_eq!(process.total_apportionment(), Some(expected));
    }

    #[test]
    fn prop_reported_tons_for_ton_totals(emission in arb_emission()) {
        prop_assert_eq!(emission.reported_tons(), emission.total_emissions);
    }
}
