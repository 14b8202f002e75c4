//! Unified error handling for Parking Ledger
//!
//! Every rejected command maps to exactly one variant of [`ParkingError`].
//! The `Display` text of each variant is the line printed back to the user,
//! while [`ParkingError::error_code`] gives a stable identifier for logs and
//! machine-readable output.

use thiserror::Error;

/// Main error type for lot, vehicle, and reporting operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParkingError {
    // ==================== Lot Errors ====================
    #[error("{0}: parking already exists.")]
    DuplicateLot(String),

    #[error("{0}: invalid capacity.")]
    InvalidCapacity(i64),

    #[error("invalid cost.")]
    InvalidRateSchedule,

    #[error("too many parks.")]
    TooManyLots,

    #[error("{0}: invalid parking name.")]
    InvalidLotName(String),

    #[error("{0}: no such parking.")]
    NoSuchParking(String),

    #[error("{0}: parking is full.")]
    ParkingFull(String),

    // ==================== Vehicle Errors ====================
    #[error("{0}: invalid licence plate.")]
    InvalidPlateFormat(String),

    #[error("{0}: invalid vehicle entry.")]
    InvalidEntry(String),

    #[error("{0}: invalid vehicle exit.")]
    InvalidExit(String),

    #[error("{0}: no entries found in any parking.")]
    NoEntries(String),

    #[error("amount out of range.")]
    AmountOutOfRange,

    // ==================== Calendar Errors ====================
    #[error("invalid date.")]
    InvalidDate,
}

impl ParkingError {
    /// Returns the stable error code for logs and JSON replies
    pub fn error_code(&self) -> &'static str {
        match self {
            ParkingError::DuplicateLot(_) => "duplicate_lot",
            ParkingError::InvalidCapacity(_) => "invalid_capacity",
            ParkingError::InvalidRateSchedule => "invalid_rate_schedule",
            ParkingError::TooManyLots => "too_many_lots",
            ParkingError::InvalidLotName(_) => "invalid_lot_name",
            ParkingError::NoSuchParking(_) => "no_such_parking",
            ParkingError::ParkingFull(_) => "parking_full",
            ParkingError::InvalidPlateFormat(_) => "invalid_plate_format",
            ParkingError::InvalidEntry(_) => "invalid_entry",
            ParkingError::InvalidExit(_) => "invalid_exit",
            ParkingError::NoEntries(_) => "no_entries",
            ParkingError::AmountOutOfRange => "amount_out_of_range",
            ParkingError::InvalidDate => "invalid_date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParkingError::DuplicateLot("Saldanha".to_string()).to_string(),
            "Saldanha: parking already exists."
        );
        assert_eq!(
            ParkingError::InvalidCapacity(-3).to_string(),
            "-3: invalid capacity."
        );
        assert_eq!(ParkingError::InvalidDate.to_string(), "invalid date.");
        assert_eq!(
            ParkingError::InvalidPlateFormat("A1-23-BC".to_string()).to_string(),
            "A1-23-BC: invalid licence plate."
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ParkingError::TooManyLots.error_code(), "too_many_lots");
        assert_eq!(
            ParkingError::AmountOutOfRange.error_code(),
            "amount_out_of_range"
        );
        assert_eq!(
            ParkingError::InvalidExit("AA-00-AA".to_string()).error_code(),
            "invalid_exit"
        );
    }
}
