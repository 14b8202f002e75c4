//! Rate schedule model
//!
//! Three-tier quarter-hour pricing attached to each lot.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{ParkingError, ParkingResult};

/// Largest accepted daily cap
pub const MAX_DAILY_CAP: i64 = 1_000_000;

/// Rate schedule entity
///
/// Defines what a lot charges per started quarter-hour. Invariant:
/// `0 < per_quarter_first_hour < per_quarter_after_hour < daily_cap <= MAX_DAILY_CAP`.
/// Fields are private so a schedule can only exist once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateSchedule {
    /// Price of each quarter-hour within the first hour of a day (X)
    per_quarter_first_hour: Decimal,

    /// Price of each quarter-hour after the first hour of a day (Y)
    per_quarter_after_hour: Decimal,

    /// Maximum charge for any 24-hour period, partial or full (Z)
    daily_cap: Decimal,
}

impl RateSchedule {
    /// Creates a schedule, rejecting non-positive or non-increasing rates
    /// and caps above [`MAX_DAILY_CAP`]
    pub fn new(
        per_quarter_first_hour: Decimal,
        per_quarter_after_hour: Decimal,
        daily_cap: Decimal,
    ) -> ParkingResult<Self> {
        let increasing = Decimal::ZERO < per_quarter_first_hour
            && per_quarter_first_hour < per_quarter_after_hour
            && per_quarter_after_hour < daily_cap;

        if !increasing || daily_cap > Decimal::from(MAX_DAILY_CAP) {
            return Err(ParkingError::InvalidRateSchedule);
        }

        Ok(Self {
            per_quarter_first_hour,
            per_quarter_after_hour,
            daily_cap,
        })
    }

    #[inline]
    pub fn per_quarter_first_hour(&self) -> Decimal {
        self.per_quarter_first_hour
    }

    #[inline]
    pub fn per_quarter_after_hour(&self) -> Decimal {
        self.per_quarter_after_hour
    }

    #[inline]
    pub fn daily_cap(&self) -> Decimal {
        self.daily_cap
    }
}
