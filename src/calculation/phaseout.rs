//! Exemption phaseout.

use rust_decimal::Decimal;

use crate::config::ExemptionPhaseout;

/// Returns the exemption left after phasing it out against `income`.
///
/// The full amount applies up to `phaseout_start`, nothing applies from
/// `phaseout_end` on, and the exemption shrinks linearly in between.
///
/// # Examples
///
/// ```
/// use offer_engine::calculation::effective_exemption;
/// use offer_engine::config::ExemptionPhaseout;
/// use rust_decimal::Decimal;
///
/// let phaseout = ExemptionPhaseout {
///     amount: Decimal::from(4_000),
///     phaseout_start: Decimal::from(100_000),
///     phaseout_end: Decimal::from(200_000),
/// };
///
/// assert_eq!(effective_exemption(Decimal::from(50_000), &phaseout), Decimal::from(4_000));
/// assert_eq!(effective_exemption(Decimal::from(150_000), &phaseout), Decimal::from(2_000));
/// assert_eq!(effective_exemption(Decimal::from(250_000), &phaseout), Decimal::ZERO);
/// ```
pub fn effective_exemption(income: Decimal, phaseout: &ExemptionPhaseout) -> Decimal {
    let window = phaseout.phaseout_end - phaseout.phaseout_start;

    // Loaded schedules never have an empty window; hand-built ones degrade to a step.
    let fraction = if window <= Decimal::ZERO {
        if income >= phaseout.phaseout_end {
            Decimal::ONE
        } else {
            Decimal::ZERO
        }
    } else {
        ((income - phaseout.phaseout_start) / window).clamp(Decimal::ZERO, Decimal::ONE)
    };

    phaseout.amount * (Decimal::ONE - fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn personal_exemption_2016() -> ExemptionPhaseout {
        ExemptionPhaseout {
            amount: dec("4050"),
            phaseout_start: dec("259400"),
            phaseout_end: dec("381900"),
        }
    }

    #[test]
    fn test_full_exemption_at_start() {
        let phaseout = personal_exemption_2016();
        assert_eq!(effective_exemption(dec("259400"), &phaseout), dec("4050"));
    }

    #[test]
    fn test_no_exemption_at_end() {
        let phaseout = personal_exemption_2016();
        assert_eq!(effective_exemption(dec("381900"), &phaseout), Decimal::ZERO);
    }

    #[test]
    fn test_midpoint_halves_exemption() {
        let phaseout = personal_exemption_2016();
        assert_eq!(effective_exemption(dec("320650"), &phaseout), dec("2025"));
    }

    #[test]
    fn test_degenerate_window_is_a_step() {
        let phaseout = ExemptionPhaseout {
            amount: dec("100"),
            phaseout_start: dec("1000"),
            phaseout_end: dec("1000"),
        };
        assert_eq!(effective_exemption(dec("999"), &phaseout), dec("100"));
        assert_eq!(effective_exemption(dec("1000"), &phaseout), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_full_exemption_below_start(income in 0i64..259_400) {
            let phaseout = personal_exemption_2016();
            prop_assert_eq!(effective_exemption(Decimal::from(income), &phaseout), phaseout.amount);
        }

        #[test]
        fn prop_zero_exemption_above_end(income in 381_900i64..10_000_000) {
            let phaseout = personal_exemption_2016();
            prop_assert_eq!(effective_exemption(Decimal::from(income), &phaseout), Decimal::ZERO);
        }

        #[test]
        fn prop_non_increasing_in_income(low in 0i64..500_000, step in 0i64..100_000) {
            let phaseout = personal_exemption_2016();
            let at_low = effective_exemption(Decimal::from(low), &phaseout);
            let at_high = effective_exemption(Decimal::from(low + step), &phaseout);
            prop_assert!(at_high <= at_low);
            prop_assert!(at_high >= Decimal::ZERO && at_low <= phaseout.amount);
        }
    }
}
