//! Parking registry
//!
//! The registry is the single owner of all lots, vehicles and lot ledgers.
//! Every command goes through one of its methods, which validate the whole
//! request first and only then commit, so a rejected command never leaves a
//! partial change behind.
//!
//! Vehicle state machine:
//!
//! ```text
//!   NotParked --entry(L)--> ParkedAt(L) --exit(L)--> NotParked
//! ```

use parking_core::config::ParkingConfig;
use parking_core::models::{
    CreateLotRequest, LicensePlate, ParkingLot, ParkingRecord, Vehicle, VehicleState,
};
use parking_core::{Date, DateTime, ParkingError, ParkingResult};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::billing;
use crate::constants::MAX_LOTS;
use crate::reporting::{DaySummary, LotLedger, StayLine};
use crate::sort::insertion_sort_by;

/// Result of an accepted entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReceipt {
    pub lot_name: String,
    pub plate: LicensePlate,
    pub entry: DateTime,
    pub free_spots: u32,
}

/// Result of an accepted exit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReceipt {
    pub lot_name: String,
    pub plate: LicensePlate,
    pub entry: DateTime,
    pub exit: DateTime,
    pub amount: Decimal,
}

/// In-memory state of every lot and vehicle
#[derive(Debug)]
pub struct ParkingRegistry {
    /// Lots in creation order
    lots: Vec<ParkingLot>,
    vehicles: HashMap<LicensePlate, Vehicle>,
    ledgers: HashMap<String, LotLedger>,
    /// Latest accepted event time across all vehicles
    clock: Option<DateTime>,
    max_lots: usize,
}

impl Default for ParkingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkingRegistry {
    pub fn new() -> Self {
        Self {
            lots: Vec::new(),
            vehicles: HashMap::new(),
            ledgers: HashMap::new(),
            clock: None,
            max_lots: MAX_LOTS,
        }
    }

    /// Create a registry with limits from configuration
    pub fn with_limits(config: &ParkingConfig) -> Self {
        Self {
            max_lots: config.max_lots,
            ..Self::new()
        }
    }

    fn lot_index(&self, name: &str) -> Option<usize> {
        self.lots.iter().position(|lot| lot.name() == name)
    }

    fn advance_clock(&mut self, at: DateTime) {
        if self.clock.map_or(true, |clock| at > clock) {
            self.clock = Some(at);
        }
    }

    /// Lots in creation order
    pub fn lots(&self) -> &[ParkingLot] {
        &self.lots
    }

    pub fn lot(&self, name: &str) -> Option<&ParkingLot> {
        self.lots.iter().find(|lot| lot.name() == name)
    }

    pub fn vehicle(&self, plate: &str) -> Option<&Vehicle> {
        self.vehicles.get(plate)
    }

    /// Latest event time accepted so far
    pub fn clock(&self) -> Option<DateTime> {
        self.clock
    }

    // ==================== Lots ====================

    /// Defines a new lot
    #[instrument(skip(self))]
    pub fn create_lot(&mut self, request: CreateLotRequest) -> ParkingResult<&ParkingLot> {
        let outcome = request.validate_name().and_then(|()| {
            if self.lot_index(&request.name).is_some() {
                return Err(ParkingError::DuplicateLot(request.name.clone()));
            }
            let capacity = request.checked_capacity()?;
            let rates = request.rate_schedule()?;
            if self.lots.len() >= self.max_lots {
                return Err(ParkingError::TooManyLots);
            }
            Ok((capacity, rates))
        });

        let (capacity, rates) = outcome.map_err(|e| {
            warn!(error = e.error_code(), "Lot creation rejected: {}", e);
            e
        })?;

        info!(
            "Lot created: {} capacity={} rates={}/{}/{}",
            request.name,
            capacity,
            rates.per_quarter_first_hour(),
            rates.per_quarter_after_hour(),
            rates.daily_cap()
        );

        self.lots.push(ParkingLot::new(request.name, capacity, rates));
        Ok(&self.lots[self.lots.len() - 1])
    }

    /// Removes a lot and its daily aggregates.
    ///
    /// Completed stays in vehicle histories are kept. Vehicles parked in the
    /// lot are no longer considered parked and their unbilled open stay is
    /// dropped. Returns the names of the remaining lots sorted by name.
    #[instrument(skip(self))]
    pub fn remove_lot(&mut self, name: &str) -> ParkingResult<Vec<String>> {
        let index = self.lot_index(name).ok_or_else(|| {
            warn!(error = "no_such_parking", "Lot removal rejected: {}", name);
            ParkingError::NoSuchParking(name.to_string())
        })?;

        let lot = self.lots.remove(index);
        self.ledgers.remove(name);

        let mut evicted = 0;
        for vehicle in self.vehicles.values_mut() {
            if vehicle.state() == VehicleState::ParkedAt(name) {
                vehicle.evict();
                evicted += 1;
                info!("Vehicle {} evicted from {}, open stay dropped", vehicle.plate(), name);
            }
        }

        info!(
            "Lot removed: {} ({} vehicles evicted, {} lots left)",
            lot.name(),
            evicted,
            self.lots.len()
        );

        let mut names: Vec<String> = self.lots.iter().map(|lot| lot.name().to_string()).collect();
        insertion_sort_by(&mut names, |a, b| a.cmp(b));
        Ok(names)
    }

    // ==================== Vehicle events ====================

    /// Registers a vehicle entering `lot_name`
    #[instrument(skip(self))]
    pub fn register_entry(
        &mut self,
        lot_name: &str,
        plate: &str,
        date: &str,
        time: &str,
    ) -> ParkingResult<EntryReceipt> {
        let (index, plate, entry) = self
            .check_entry(lot_name, plate, date, time)
            .map_err(|e| {
                warn!(error = e.error_code(), "Entry rejected: {}", e);
                e
            })?;

        let lot = &mut self.lots[index];
        lot.admit()?;
        let free_spots = lot.free_spots();

        self.vehicles
            .entry(plate.clone())
            .or_insert_with(|| Vehicle::new(plate.clone()))
            .enter(lot_name, entry);
        self.advance_clock(entry);

        info!("Vehicle {} entered {} at {}", plate, lot_name, entry);

        Ok(EntryReceipt {
            lot_name: lot_name.to_string(),
            plate,
            entry,
            free_spots,
        })
    }

    fn check_entry(
        &self,
        lot_name: &str,
        plate: &str,
        date: &str,
        time: &str,
    ) -> ParkingResult<(usize, LicensePlate, DateTime)> {
        let index = self
            .lot_index(lot_name)
            .ok_or_else(|| ParkingError::NoSuchParking(lot_name.to_string()))?;
        if self.lots[index].is_full() {
            return Err(ParkingError::ParkingFull(lot_name.to_string()));
        }

        let plate: LicensePlate = plate.parse()?;
        let vehicle = self.vehicles.get(&plate);
        if let Some(VehicleState::ParkedAt(_)) = vehicle.map(Vehicle::state) {
            return Err(ParkingError::InvalidEntry(plate.to_string()));
        }

        let entry = DateTime::parse_event(date, time)?;
        if let Some(last) = vehicle.and_then(Vehicle::last_event) {
            if entry < last {
                return Err(ParkingError::InvalidDate);
            }
        }

        Ok((index, plate, entry))
    }

    /// Registers a vehicle leaving `lot_name` and bills the stay
    #[instrument(skip(self))]
    pub fn register_exit(
        &mut self,
        lot_name: &str,
        plate: &str,
        date: &str,
        time: &str,
    ) -> ParkingResult<ExitReceipt> {
        let (index, plate, entry, exit) = self
            .check_exit(lot_name, plate, date, time)
            .map_err(|e| {
                warn!(error = e.error_code(), "Exit rejected: {}", e);
                e
            })?;

        let rates = *self.lots[index].rates();
        let amount = billing::compute_fee(&entry, &exit, &rates)?;

        let vehicle = self
            .vehicles
            .get_mut(&plate)
            .ok_or_else(|| ParkingError::InvalidExit(plate.to_string()))?;
        let record = vehicle
            .leave(exit, amount)
            .ok_or_else(|| ParkingError::InvalidExit(plate.to_string()))?;

        self.lots[index].release();
        self.ledgers
            .entry(lot_name.to_string())
            .or_default()
            .record_completed_stay(&plate, record);
        self.advance_clock(exit);

        info!(
            "Vehicle {} left {} at {} (entered {}), charged {}",
            plate, lot_name, exit, entry, amount
        );

        Ok(ExitReceipt {
            lot_name: lot_name.to_string(),
            plate,
            entry,
            exit,
            amount,
        })
    }

    fn check_exit(
        &self,
        lot_name: &str,
        plate: &str,
        date: &str,
        time: &str,
    ) -> ParkingResult<(usize, LicensePlate, DateTime, DateTime)> {
        let index = self
            .lot_index(lot_name)
            .ok_or_else(|| ParkingError::NoSuchParking(lot_name.to_string()))?;

        let plate: LicensePlate = plate.parse()?;
        let vehicle = self
            .vehicles
            .get(&plate)
            .filter(|v| v.state() == VehicleState::ParkedAt(lot_name))
            .ok_or_else(|| ParkingError::InvalidExit(plate.to_string()))?;
        let entry = vehicle
            .open_entry()
            .ok_or_else(|| ParkingError::InvalidExit(plate.to_string()))?;

        let exit = DateTime::parse_event(date, time)?;
        if exit < entry {
            return Err(ParkingError::InvalidDate);
        }

        Ok((index, plate, entry, exit))
    }

    // ==================== Reports ====================

    /// Every stay of a vehicle in the order it was registered
    #[instrument(skip(self))]
    pub fn vehicle_history(&self, plate: &str) -> ParkingResult<&[ParkingRecord]> {
        let plate: LicensePlate = plate.parse()?;
        match self.vehicles.get(&plate).map(Vehicle::records) {
            Some(records) if !records.is_empty() => Ok(records),
            _ => Err(ParkingError::NoEntries(plate.to_string())),
        }
    }

    /// Daily totals of a lot, oldest date first
    #[instrument(skip(self))]
    pub fn lot_summary(&self, lot_name: &str) -> ParkingResult<Vec<DaySummary>> {
        if self.lot_index(lot_name).is_none() {
            return Err(ParkingError::NoSuchParking(lot_name.to_string()));
        }

        Ok(self
            .ledgers
            .get(lot_name)
            .map(LotLedger::summary)
            .unwrap_or_default())
    }

    /// Stays a lot closed on `date`, by exit time.
    ///
    /// A date later than the registry clock is rejected.
    #[instrument(skip(self))]
    pub fn lot_detail(&self, lot_name: &str, date: &str) -> ParkingResult<Vec<StayLine>> {
        if self.lot_index(lot_name).is_none() {
            return Err(ParkingError::NoSuchParking(lot_name.to_string()));
        }

        let date: Date = date.parse()?;
        if self.clock.is_some_and(|clock| date > clock.date) {
            return Err(ParkingError::InvalidDate);
        }

        Ok(self
            .ledgers
            .get(lot_name)
            .map(|ledger| ledger.detail(date))
            .unwrap_or_default())
    }
}
