//! Domain models for Parking Ledger
//!
//! This module contains all the core domain models used throughout the application.

pub mod lot;
pub mod plate;
pub mod rate;
pub mod vehicle;

pub use lot::{CreateLotRequest, ParkingLot, MAX_LOT_NAME_BYTES};
pub use plate::LicensePlate;
pub use rate::{RateSchedule, MAX_DAILY_CAP};
pub use vehicle::{ParkingRecord, Vehicle, VehicleState};
