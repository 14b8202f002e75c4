//! Parking Ledger Core Library
//!
//! This crate provides the foundational types and error handling for the
//! Parking Ledger system. It includes:
//!
//! - Calendar arithmetic (dates, times, elapsed minutes, the closed day)
//! - Domain models (ParkingLot, RateSchedule, Vehicle, ParkingRecord, LicensePlate)
//! - Unified error handling with user-facing messages
//! - Application configuration

pub mod calendar;
pub mod config;
pub mod error;
pub mod models;

pub use calendar::{Date, DateTime, Time};
pub use config::AppConfig;
pub use error::ParkingError;

/// Result type alias using ParkingError
pub type ParkingResult<T> = Result<T, ParkingError>;
