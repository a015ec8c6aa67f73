//! Rounding rules for calculated totals and exported values.

use rust_decimal::{Decimal, RoundingStrategy};

/// Significant figures kept on calculated totals.
pub const EMISSIONS_SIGNIFICANT_FIGURES: u32 = 6;

/// Decimal places written to exchange documents.
pub const EXPORT_DECIMAL_PLACES: u32 = 6;

const HALF_UP: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionPolicy {
    pub significant_figures: u32,
    pub export_decimal_places: u32,
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        Self {
            significant_figures: EMISSIONS_SIGNIFICANT_FIGURES,
            export_decimal_places: EXPORT_DECIMAL_PLACES,
        }
    }
}

impl PrecisionPolicy {
    pub fn new(significant_figures: u32, export_decimal_places: u32) -> Self {
        Self {
            significant_figures: significant_figures.max(1),
            export_decimal_places,
        }
    }

    pub fn apply(&self, value: Decimal) -> Decimal {
        set_significant_figures(value, self.significant_figures)
    }

    pub fn format_for_export(&self, value: Decimal) -> String {
        format_export(value, self.export_decimal_places)
    }
}

/// Number of digits in the unscaled value, at least 1.
pub fn precision(value: &Decimal) -> u32 {
    let mut mantissa = value.mantissa().unsigned_abs();
    let mut digits = 1;
    while mantissa >= 10 {
        mantissa /= 10;
        digits += 1;
    }
    digits
}

/// Rounds half-up to at most `max` significant figures. Values already within
/// `max` digits are returned unchanged, trailing zeros included.
pub fn set_significant_figures(value: Decimal, max: u32) -> Decimal {
    let digits = precision(&value);
    if digits <= max {
        return value;
    }

    let new_scale = i64::from(max) - i64::from(digits) + i64::from(value.scale());
    if new_scale >= 0 {
        return value.round_dp_with_strategy(new_scale as u32, HALF_UP);
    }

    // Rounding left of the decimal point, e.g. 1234567 to 6 figures is 1234570
    let mut magnitude = Decimal::ONE;
    for _ in 0..new_scale.unsigned_abs() {
        match magnitude.checked_mul(Decimal::TEN) {
            Some(next) => magnitude = next,
            None => return value,
        }
    }
    let rounded = (value / magnitude).round_dp_with_strategy(0, HALF_UP);
    rounded.checked_mul(magnitude).unwrap_or(value)
}

/// Rounds half-up to at most `places` decimal places without padding.
pub fn round_decimal_places(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, HALF_UP)
}

/// Export form: at most `places` decimals, trailing zeros stripped, but always
/// at least one decimal digit (`12.0`, `0.5`, `7323.234258`).
pub fn format_export(value: Decimal, places: u32) -> String {
    let rounded = round_decimal_places(value, places).normalize();
    if rounded.scale() == 0 {
        format!("{}.0", rounded)
    } else {
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_precision() {
        assert_eq!(precision(&dec("0")), 1);
        assert_eq!(precision(&dec("7323.234258")), 10);
        assert_eq!(precision(&dec("-0.00012")), 2);
        assert_eq!(precision(&dec("1.500")), 4);
    }

    #[test]
    fn test_significant_figures() {
        assert_eq!(set_significant_figures(dec("7323.234258245252345"), 6), dec("7323.23"));
        assert_eq!(set_significant_figures(dec("0.000123456789"), 6), dec("0.000123457"));
        assert_eq!(set_significant_figures(dec("1234567"), 6), dec("1234570"));
        assert_eq!(set_significant_figures(dec("-2.5000005"), 6), dec("-2.50000"));
        assert_eq!(set_significant_figures(dec("12.5"), 2), dec("13"));
        assert_eq!(set_significant_figures(dec("1.5"), 6).to_string(), "1.5");
    }

    #[test]
    fn test_export_rounding_half_up() {
        assert_eq!(round_decimal_places(dec("7323.234258245252345"), 6), dec("7323.234258"));
        assert_eq!(round_decimal_places(dec("7323.234258745252345"), 6), dec("7323.234259"));
        assert_eq!(round_decimal_places(dec("7323.234257345252345"), 6), dec("7323.234257"));
        assert_eq!(round_decimal_places(dec("0.0000005"), 6), dec("0.000001"));
        assert_eq!(round_decimal_places(dec("1.5"), 6).to_string(), "1.5");
    }

    #[test]
    fn test_format_export() {
        assert_eq!(format_export(dec("7323.234258245252345"), 6), "7323.234258");
        assert_eq!(format_export(dec("12"), 6), "12.0");
        assert_eq!(format_export(dec("12.500000"), 6), "12.5");
        assert_eq!(format_export(dec("0.0000001"), 6), "0.0");
        assert_eq!(PrecisionPolicy::default().format_for_export(dec("3.1400")), "3.14");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        prop_compose! {
            fn any_value()(m in -1_000_000_000_000i64..1_000_000_000_000, s in 0u32..12) -> Decimal {
                Decimal::new(m, s)
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn significant_figures_idempotent(value in any_value(), max in 1u32..10) {
                let once = set_significant_figures(value, max);
                prop_assert_eq!(set_significant_figures(once, max), once);
            }

            #[test]
            fn decimal_places_idempotent(value in any_value(), places in 0u32..8) {
                let once = round_decimal_places(value, places);
                prop_assert_eq!(round_decimal_places(once, places), once);
                prop_assert!(once.scale() <= places);
            }
        }
    }
}
