//! License plate model
//!
//! Plates are three two-character pairs joined by dashes (`AA-00-AA`).
//! Each pair is either two uppercase letters or two digits. A plate must
//! contain at least one letter pair and at least one digit pair.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::ParkingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKind {
    Letters,
    Digits,
}

fn pair_kind(pair: &[u8]) -> Option<PairKind> {
    match pair {
        [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Some(PairKind::Letters),
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some(PairKind::Digits),
        _ => None,
    }
}

/// A validated license plate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Checks the plate format without allocating
    pub fn is_valid(text: &str) -> bool {
        let bytes = text.as_bytes();
        if bytes.len() != 8 || bytes[2] != b'-' || bytes[5] != b'-' {
            return false;
        }

        let mut letters = false;
        let mut digits = false;
        for pair in [&bytes[0..2], &bytes[3..5], &bytes[6..8]] {
            match pair_kind(pair) {
                Some(PairKind::Letters) => letters = true,
                Some(PairKind::Digits) => digits = true,
                None => return false,
            }
        }

        letters && digits
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LicensePlate {
    type Err = ParkingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(ParkingError::InvalidPlateFormat(text.to_string()))
        }
    }
}

impl Borrow<str> for LicensePlate {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
