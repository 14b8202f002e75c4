//! Parking lot model

use rust_decimal::Decimal;
use serde::Serialize;
use validator::{Validate, ValidationError};

use super::RateSchedule;
use crate::{ParkingError, ParkingResult};

/// Maximum lot name length in bytes
pub const MAX_LOT_NAME_BYTES: usize = 50;

fn validate_lot_name(name: &str) -> Result<(), ValidationError> {
    if name.len() > MAX_LOT_NAME_BYTES {
        return Err(ValidationError::new("lot_name_too_long"));
    }
    Ok(())
}

/// Lot creation request
///
/// Carries the raw values of a creation command. Capacity and rates are
/// checked by the registry so that duplicate names are reported first.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateLotRequest {
    #[validate(length(min = 1), custom(function = "validate_lot_name"))]
    pub name: String,

    pub capacity: i64,

    pub per_quarter_first_hour: Decimal,

    pub per_quarter_after_hour: Decimal,

    pub daily_cap: Decimal,
}

impl CreateLotRequest {
    /// Check the lot name rules
    pub fn validate_name(&self) -> ParkingResult<()> {
        self.validate()
            .map_err(|_| ParkingError::InvalidLotName(self.name.clone()))
    }

    /// Capacity as an unsigned count.
    ///
    /// Accepts `1..=u32::MAX`; anything outside that range is an invalid
    /// capacity.
    pub fn checked_capacity(&self) -> ParkingResult<u32> {
        u32::try_from(self.capacity)
            .ok()
            .filter(|&capacity| capacity > 0)
            .ok_or(ParkingError::InvalidCapacity(self.capacity))
    }

    pub fn rate_schedule(&self) -> ParkingResult<RateSchedule> {
        RateSchedule::new(
            self.per_quarter_first_hour,
            self.per_quarter_after_hour,
            self.daily_cap,
        )
    }
}

/// Parking lot entity
///
/// Occupancy is maintained incrementally by the registry so availability
/// checks do not need to scan the vehicle table.
#[derive(Debug, Clone, Serialize)]
pub struct ParkingLot {
    name: String,
    capacity: u32,
    occupied: u32,
    rates: RateSchedule,
}

impl ParkingLot {
    pub fn new(name: impl Into<String>, capacity: u32, rates: RateSchedule) -> Self {
        Self {
            name: name.into(),
            capacity,
            occupied: 0,
            rates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn free_spots(&self) -> u32 {
        self.capacity - self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied >= self.capacity
    }

    pub fn rates(&self) -> &RateSchedule {
        &self.rates
    }

    /// Takes one spot
    pub fn admit(&mut self) -> ParkingResult<()> {
        if self.is_full() {
            return Err(ParkingError::ParkingFull(self.name.clone()));
        }
        self.occupied += 1;
        Ok(())
    }

    /// Frees one spot
    pub fn release(&mut self) {
        self.occupied = self.occupied.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(name: &str, capacity: i64) -> CreateLotRequest {
        CreateLotRequest {
            name: name.to_string(),
            capacity,
            per_quarter_first_hour: dec!(0.25),
            per_quarter_after_hour: dec!(0.30),
            daily_cap: dec!(15.00),
        }
    }

    #[test]
    fn test_lot_name_rules() {
        assert!(request("Saldanha", 10).validate_name().is_ok());
        assert!(request(&"x".repeat(MAX_LOT_NAME_BYTES), 10).validate_name().is_ok());
        assert_eq!(
            request("", 10).validate_name(),
            Err(ParkingError::InvalidLotName(String::new()))
        );
        assert!(request(&"x".repeat(MAX_LOT_NAME_BYTES + 1), 10)
            .validate_name()
            .is_err());
    }

    #[test]
    fn test_capacity_rules() {
        assert_eq!(request("A", 3).checked_capacity(), Ok(3));
        assert_eq!(
            request("A", 0).checked_capacity(),
            Err(ParkingError::InvalidCapacity(0))
        );
        assert_eq!(
            request("A", -5).checked_capacity(),
            Err(ParkingError::InvalidCapacity(-5))
        );
        assert_eq!(
            request("A", u32::MAX as i64).checked_capacity(),
            Ok(u32::MAX)
        );
        assert_eq!(
            request("A", u32::MAX as i64 + 1).checked_capacity(),
            Err(ParkingError::InvalidCapacity(4_294_967_296))
        );
    }

    #[test]
    fn test_admit_and_release() {
        let rates = request("A", 1).rate_schedule().unwrap();
        let mut lot = ParkingLot::new("A", 1, rates);

        assert_eq!(lot.free_spots(), 1);
        assert!(lot.admit().is_ok());
        assert!(lot.is_full());
        assert_eq!(lot.admit(), Err(ParkingError::ParkingFull("A".to_string())));

        lot.release();
        assert_eq!(lot.occupied(), 0);
        lot.release();
        assert_eq!(lot.occupied(), 0);
    }
}
