//! Vehicle and parking record models

use rust_decimal::Decimal;
use serde::Serialize;

use super::LicensePlate;
use crate::calendar::DateTime;

/// One stay of a vehicle in a lot
///
/// Opened at entry with no exit and no amount, closed at exit with both set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkingRecord {
    pub lot_name: String,
    pub entry: DateTime,
    pub exit: Option<DateTime>,
    pub amount_paid: Option<Decimal>,
}

impl ParkingRecord {
    pub fn open(lot_name: impl Into<String>, entry: DateTime) -> Self {
        Self {
            lot_name: lot_name.into(),
            entry,
            exit: None,
            amount_paid: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    /// Latest timestamp carried by the record
    pub fn last_event(&self) -> DateTime {
        self.exit.unwrap_or(self.entry)
    }
}

/// Where a vehicle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState<'a> {
    NotParked,
    ParkedAt(&'a str),
}

/// Vehicle entity
///
/// Created on its first entry and kept for the lifetime of the process.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    plate: LicensePlate,
    parked_at: Option<String>,
    records: Vec<ParkingRecord>,
}

impl Vehicle {
    pub fn new(plate: LicensePlate) -> Self {
        Self {
            plate,
            parked_at: None,
            records: Vec::new(),
        }
    }

    pub fn plate(&self) -> &LicensePlate {
        &self.plate
    }

    pub fn state(&self) -> VehicleState<'_> {
        match &self.parked_at {
            Some(lot) => VehicleState::ParkedAt(lot),
            None => VehicleState::NotParked,
        }
    }

    /// Records in insertion order
    pub fn records(&self) -> &[ParkingRecord] {
        &self.records
    }

    /// Time of the most recent entry or exit
    pub fn last_event(&self) -> Option<DateTime> {
        self.records.last().map(ParkingRecord::last_event)
    }

    /// Opens a stay at `lot_name`.
    ///
    /// The caller has already checked that the vehicle is not parked.
    pub fn enter(&mut self, lot_name: &str, at: DateTime) {
        self.parked_at = Some(lot_name.to_string());
        self.records.push(ParkingRecord::open(lot_name, at));
    }

    /// Closes the open stay and returns it.
    ///
    /// Returns `None` if there is no open stay.
    pub fn leave(&mut self, at: DateTime, amount: Decimal) -> Option<&ParkingRecord> {
        let record = self.records.last_mut().filter(|r| r.is_open())?;
        record.exit = Some(at);
        record.amount_paid = Some(amount);
        self.parked_at = None;
        Some(&*record)
    }

    /// Entry time of the stay currently open
    pub fn open_entry(&self) -> Option<DateTime> {
        self.records
            .last()
            .filter(|r| r.is_open())
            .map(|r| r.entry)
    }

    /// Forgets the current lot and drops the unbilled open stay.
    ///
    /// Completed stays are kept.
    pub fn evict(&mut self) {
        self.parked_at = None;
        if self.records.last().is_some_and(ParkingRecord::is_open) {
            self.records.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plate() -> LicensePlate {
        "AA-00-AA".parse().unwrap()
    }

    #[test]
    fn test_enter_and_leave() {
        let mut vehicle = Vehicle::new(plate());
        assert_eq!(vehicle.state(), VehicleState::NotParked);
        assert_eq!(vehicle.last_event(), None);

        let entry = DateTime::parse("01-04-2024", "08:00").unwrap();
        let exit = DateTime::parse("01-04-2024", "10:00").unwrap();

        vehicle.enter("Saldanha", entry);
        assert_eq!(vehicle.state(), VehicleState::ParkedAt("Saldanha"));
        assert_eq!(vehicle.open_entry(), Some(entry));
        assert_eq!(vehicle.last_event(), Some(entry));

        let record = vehicle.leave(exit, dec!(2.20)).unwrap().clone();
        assert_eq!(record.exit, Some(exit));
        assert_eq!(record.amount_paid, Some(dec!(2.20)));
        assert_eq!(vehicle.state(), VehicleState::NotParked);
        assert_eq!(vehicle.open_entry(), None);
        assert_eq!(vehicle.last_event(), Some(exit));
        assert_eq!(vehicle.records().len(), 1);
    }

    #[test]
    fn test_evict_drops_only_open_record() {
        let mut vehicle = Vehicle::new(plate());
        let first = DateTime::parse("01-04-2024", "08:00").unwrap();
        let second = DateTime::parse("01-04-2024", "09:00").unwrap();
        let third = DateTime::parse("01-04-2024", "10:00").unwrap();

        vehicle.enter("Saldanha", first);
        vehicle.leave(second, dec!(1.00));
        vehicle.enter("Alvalade", third);
        vehicle.evict();

        assert_eq!(vehicle.state(), VehicleState::NotParked);
        assert_eq!(vehicle.records().len(), 1);
        assert_eq!(vehicle.records()[0].lot_name, "Saldanha");
        assert_eq!(vehicle.open_entry(), None);
        assert_eq!(vehicle.last_event(), Some(second));
        assert_eq!(vehicle.plate().as_str(), "AA-00-AA");
    }

    #[test]
    fn test_leave_without_open_record() {
        let mut vehicle = Vehicle::new(plate());
        let at = DateTime::parse("01-04-2024", "08:00").unwrap();
        assert!(vehicle.leave(at, dec!(0)).is_none());
    }
}
