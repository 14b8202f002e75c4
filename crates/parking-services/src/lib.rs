//! Business logic services for Parking Ledger
//!
//! This crate contains the logic behind every command: the billing engine,
//! the vehicle state machine that accepts or rejects entries and exits, and
//! the per-lot daily aggregates used for reports.
//!
//! # Architecture
//!
//! - `ParkingRegistry` owns all lots, vehicles and ledgers and is passed by
//!   `&mut` to whoever drives the command loop
//! - Every operation validates first and commits last
//! - All operations are instrumented with tracing
//!
//! # Modules
//!
//! - `billing` - Tiered quarter-hour fee calculation with daily cap
//! - `registry` - Lot table, vehicle state machine, entry/exit handling
//! - `reporting` - Daily totals and itemized stays per lot
//! - `sort` - Stable insertion sort used by every report

pub mod billing;
pub mod registry;
pub mod reporting;
pub mod sort;

pub use billing::{compute_fee, FeeBreakdown};
pub use registry::{EntryReceipt, ExitReceipt, ParkingRegistry};
pub use reporting::{DaySummary, LotLedger, StayLine};

/// Business logic constants
pub mod constants {
    /// Length of a billing unit in minutes
    pub const QUARTER_MINUTES: i64 = 15;

    /// Quarter-hours of each day billed at the first-hour rate
    pub const FIRST_RATE_QUARTERS: i64 = 4;

    /// Default maximum number of lots defined at once
    pub const MAX_LOTS: usize = 20;
}
