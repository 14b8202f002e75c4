//! Billing engine
//!
//! Computes what a stay costs under a lot's [`RateSchedule`]. The billable
//! time is split into whole 24-hour days, each charged the daily cap, and a
//! remainder billed per started quarter-hour: the first four quarters at the
//! first-hour rate, the rest at the after-hour rate, with the remainder's
//! charge capped at the daily cap.
//!
//! Minutes falling on February 29 are not billable. All arithmetic is done
//! on integer quarter counts so amounts stay exact decimal multiples of the
//! rates.

use parking_core::calendar::MINUTES_PER_DAY;
use parking_core::models::RateSchedule;
use parking_core::{DateTime, ParkingError, ParkingResult};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::constants::{FIRST_RATE_QUARTERS, QUARTER_MINUTES};

/// How a fee was put together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    /// Whole 24-hour periods charged at the daily cap
    pub full_days: i64,

    /// Started quarter-hours in the partial day
    pub remainder_quarters: i64,

    /// Minutes of the stay that fell on a closed day
    pub closed_minutes: i64,

    /// Total amount due
    pub amount: Decimal,
}

/// Charge for a partial day of `quarters` started quarter-hours, before
/// the daily cap is applied.
pub fn quarters_charge(quarters: i64, rates: &RateSchedule) -> Decimal {
    let first = quarters.min(FIRST_RATE_QUARTERS);
    let after = (quarters - FIRST_RATE_QUARTERS).max(0);

    Decimal::from(first) * rates.per_quarter_first_hour()
        + Decimal::from(after) * rates.per_quarter_after_hour()
}

/// Charge for a partial day with the daily cap applied
pub fn partial_day_charge(quarters: i64, rates: &RateSchedule) -> Decimal {
    quarters_charge(quarters, rates).min(rates.daily_cap())
}

/// Minutes between `entry` and `exit` that are billed.
///
/// Fails with `InvalidDate` if `exit` is before `entry`.
pub fn billable_minutes(entry: &DateTime, exit: &DateTime) -> ParkingResult<(i64, i64)> {
    let elapsed = entry.minutes_until(exit)?;
    let closed = entry.closed_minutes_until(exit);
    Ok((elapsed - closed, closed))
}

/// Computes the fee for a stay with its breakdown.
///
/// Fails with `AmountOutOfRange` if the amount does not fit a `Decimal`.
pub fn fee_breakdown(
    entry: &DateTime,
    exit: &DateTime,
    rates: &RateSchedule,
) -> ParkingResult<FeeBreakdown> {
    let (minutes, closed_minutes) = billable_minutes(entry, exit)?;

    let full_days = minutes / MINUTES_PER_DAY;
    let remainder = minutes % MINUTES_PER_DAY;
    // Partial quarters are billed in full
    let remainder_quarters = (remainder + QUARTER_MINUTES - 1) / QUARTER_MINUTES;

    let amount = Decimal::from(full_days)
        .checked_mul(rates.daily_cap())
        .and_then(|days| days.checked_add(partial_day_charge(remainder_quarters, rates)))
        .ok_or(ParkingError::AmountOutOfRange)?;

    debug!(
        "Fee for {} -> {}: {} billable min ({} closed) = {} days + {} quarters = {}",
        entry, exit, minutes, closed_minutes, full_days, remainder_quarters, amount
    );

    Ok(FeeBreakdown {
        full_days,
        remainder_quarters,
        closed_minutes,
        amount,
    })
}

/// Computes the amount due for a stay from `entry` to `exit`
pub fn compute_fee(
    entry: &DateTime,
    exit: &DateTime,
    rates: &RateSchedule,
) -> ParkingResult<Decimal> {
    fee_breakdown(entry, exit, rates).map(|breakdown| breakdown.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn rates() -> RateSchedule {
        RateSchedule::new(dec!(0.25), dec!(0.30), dec!(15.00)).unwrap()
    }

    fn at(date: &str, time: &str) -> DateTime {
        DateTime::parse(date, time).unwrap()
    }

    #[test]
    fn test_two_hours() {
        let fee = compute_fee(&at("01-04-2024", "08:00"), &at("01-04-2024", "10:00"), &rates());
        assert_eq!(fee, Ok(dec!(2.20)));
    }

    #[test]
    fn test_three_days_and_two_hours() {
        let fee = compute_fee(&at("01-04-2024", "08:00"), &at("04-04-2024", "10:00"), &rates());
        assert_eq!(fee, Ok(dec!(47.20)));
    }

    #[test]
    fn test_partial_day_capped() {
        let fee = compute_fee(&at("01-04-2024", "08:00"), &at("04-04-2024", "23:00"), &rates());
        assert_eq!(fee, Ok(dec!(60.00)));
    }

    #[test]
    fn test_exact_day_boundary_has_no_partial_charge() {
        let breakdown =
            fee_breakdown(&at("01-04-2024", "08:00"), &at("03-04-2024", "08:00"), &rates()).unwrap();
        assert_eq!(breakdown.full_days, 2);
        assert_eq!(breakdown.remainder_quarters, 0);
        assert_eq!(breakdown.amount, dec!(30.00));
    }

    #[test]
    fn test_partial_quarter_rounds_up() {
        let entry = at("01-04-2024", "08:00");
        assert_eq!(compute_fee(&entry, &at("01-04-2024", "08:01"), &rates()), Ok(dec!(0.25)));
        assert_eq!(compute_fee(&entry, &at("01-04-2024", "08:15"), &rates()), Ok(dec!(0.25)));
        assert_eq!(compute_fee(&entry, &at("01-04-2024", "08:16"), &rates()), Ok(dec!(0.50)));
        assert_eq!(compute_fee(&entry, &at("01-04-2024", "09:01"), &rates()), Ok(dec!(1.30)));
    }

    #[test]
    fn test_zero_length_stay_is_free() {
        let entry = at("01-04-2024", "08:00");
        assert_eq!(compute_fee(&entry, &entry, &rates()), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_misordered_stay_fails() {
        let fee = compute_fee(&at("02-04-2024", "08:00"), &at("01-04-2024", "08:00"), &rates());
        assert_eq!(fee, Err(ParkingError::InvalidDate));
    }

    #[test]
    fn test_closed_day_is_not_billed() {
        // 28-02 10:00 -> 01-03 10:00 spans all of 29-02; only 24h are billable
        let breakdown =
            fee_breakdown(&at("28-02-2024", "10:00"), &at("01-03-2024", "10:00"), &rates()).unwrap();
        assert_eq!(breakdown.closed_minutes, 1440);
        assert_eq!(breakdown.full_days, 1);
        assert_eq!(breakdown.amount, dec!(15.00));

        // Same span in a common year is two full days
        let fee = compute_fee(&at("28-02-2023", "10:00"), &at("02-03-2023", "10:00"), &rates());
        assert_eq!(fee, Ok(dec!(30.00)));
    }

    #[test]
    fn test_closed_day_partial_stay() {
        // 23:00 -> 01:00 across the closed day: 1h on 28-02, 1h on 01-03
        let fee = compute_fee(&at("28-02-2024", "23:00"), &at("01-03-2024", "01:00"), &rates());
        assert_eq!(fee, Ok(dec!(2.20)));
    }

    #[test]
    fn test_largest_daily_cap_over_many_days() {
        let rates = RateSchedule::new(dec!(1), dec!(2), dec!(1000000)).unwrap();
        let fee = compute_fee(&at("01-04-2024", "08:00"), &at("20-04-2024", "08:00"), &rates);
        assert_eq!(fee, Ok(dec!(19000000)));

        let fee = compute_fee(&at("01-01-1900", "00:00"), &at("31-12-9999", "23:59"), &rates);
        assert!(fee.is_ok());
    }

    #[test]
    fn test_quarters_charge_tiers() {
        assert_eq!(quarters_charge(0, &rates()), dec!(0));
        assert_eq!(quarters_charge(4, &rates()), dec!(1.00));
        assert_eq!(quarters_charge(5, &rates()), dec!(1.30));
        assert_eq!(partial_day_charge(95, &rates()), dec!(15.00));
    }

    fn schedule() -> impl Strategy<Value = RateSchedule> {
        (1i64..100, 1i64..100, 1i64..5_000).prop_map(|(x, dy, dz)| {
            let x = Decimal::new(x, 2);
            let y = x + Decimal::new(dy, 2);
            let z = y + Decimal::new(dz, 2);
            RateSchedule::new(x, y, z).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_fee_is_monotonic(
            rates in schedule(),
            start in 0i64..(366 * 1440),
            first in 0i64..(10 * 1440),
            extra in 0i64..(3 * 1440),
        ) {
            let entry = at("01-01-2023", "00:00").add_minutes(start);
            let shorter = entry.add_minutes(first);
            let longer = shorter.add_minutes(extra);

            let a = compute_fee(&entry, &shorter, &rates).unwrap();
            let b = compute_fee(&entry, &longer, &rates).unwrap();
            prop_assert!(a <= b, "{} > {}", a, b);
            prop_assert!(a >= Decimal::ZERO);
        }

        #[test]
        fn prop_full_days_cost_daily_cap(
            rates in schedule(),
            start in 0i64..(300 * 1440),
            days in 0i64..60,
        ) {
            // 2025 and 2026 have no closed day
            let entry = at("01-01-2025", "00:00").add_minutes(start);
            let exit = entry.add_minutes(days * MINUTES_PER_DAY);

            let fee = compute_fee(&entry, &exit, &rates).unwrap();
            prop_assert_eq!(fee, Decimal::from(days) * rates.daily_cap());
        }
    }
}
