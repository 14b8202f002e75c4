//! Per-lot daily billing aggregates
//!
//! Each lot keeps a [`LotLedger`]: one [`DailyAggregate`] per calendar date
//! on which at least one stay was closed, holding the running total and the
//! stays that make it up in the order they were recorded.

use parking_core::models::{LicensePlate, ParkingRecord};
use parking_core::{Date, DateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::sort::{insertion_sort_by, insertion_sort_by_key};

/// One completed stay as seen by the lot's report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StayLine {
    pub plate: LicensePlate,
    pub exit: DateTime,
    pub amount: Decimal,
}

/// Total billed by a lot on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: Date,
    pub total: Decimal,
}

/// Running total and itemized stays for one exit date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAggregate {
    pub date: Date,
    pub total: Decimal,
    pub stays: Vec<StayLine>,
}

impl DailyAggregate {
    fn new(date: Date) -> Self {
        Self {
            date,
            total: Decimal::ZERO,
            stays: Vec::new(),
        }
    }
}

/// Billing history of one lot
#[derive(Debug, Clone, Default)]
pub struct LotLedger {
    days: Vec<DailyAggregate>,
}

impl LotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a closed stay under the date of its exit.
    ///
    /// Open records carry no exit or amount and are skipped.
    pub fn record_completed_stay(&mut self, plate: &LicensePlate, record: &ParkingRecord) {
        let (Some(exit), Some(amount)) = (record.exit, record.amount_paid) else {
            warn!("Skipping open record for {} at {}", plate, record.lot_name);
            return;
        };

        let index = match self.days.iter().position(|day| day.date == exit.date) {
            Some(index) => index,
            None => {
                self.days.push(DailyAggregate::new(exit.date));
                self.days.len() - 1
            }
        };

        let day = &mut self.days[index];
        day.total = day.total.saturating_add(amount);
        day.stays.push(StayLine {
            plate: plate.clone(),
            exit,
            amount,
        });
    }

    /// Daily totals, oldest date first
    pub fn summary(&self) -> Vec<DaySummary> {
        let mut summary: Vec<DaySummary> = self
            .days
            .iter()
            .map(|day| DaySummary {
                date: day.date,
                total: day.total,
            })
            .collect();

        insertion_sort_by_key(&mut summary, |line| line.date);
        summary
    }

    /// Stays closed on `date`, by exit time, ties in recording order
    pub fn detail(&self, date: Date) -> Vec<StayLine> {
        let mut stays = self
            .days
            .iter()
            .find(|day| day.date == date)
            .map(|day| day.stays.clone())
            .unwrap_or_default();

        insertion_sort_by(&mut stays, |a, b| a.exit.time.cmp(&b.exit.time));
        stays
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn closed(entry: &str, exit: (&str, &str), amount: Decimal) -> ParkingRecord {
        ParkingRecord {
            lot_name: "Saldanha".to_string(),
            entry: DateTime::parse("01-04-2024", entry).unwrap(),
            exit: Some(DateTime::parse(exit.0, exit.1).unwrap()),
            amount_paid: Some(amount),
        }
    }

    fn plate(text: &str) -> LicensePlate {
        text.parse().unwrap()
    }

    #[test]
    fn test_totals_per_exit_date() {
        let mut ledger = LotLedger::new();
        ledger.record_completed_stay(&plate("AA-00-AA"), &closed("08:00", ("02-04-2024", "09:00"), dec!(16.00)));
        ledger.record_completed_stay(&plate("BB-11-BB"), &closed("08:00", ("01-04-2024", "10:00"), dec!(2.20)));
        ledger.record_completed_stay(&plate("CC-22-CC"), &closed("09:00", ("01-04-2024", "09:30"), dec!(0.50)));

        let summary = ledger.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].date, "01-04-2024".parse().unwrap());
        assert_eq!(summary[0].total, dec!(2.70));
        assert_eq!(summary[1].date, "02-04-2024".parse().unwrap());
        assert_eq!(summary[1].total, dec!(16.00));
    }

    #[test]
    fn test_detail_sorted_by_exit_time() {
        let mut ledger = LotLedger::new();
        ledger.record_completed_stay(&plate("AA-00-AA"), &closed("08:00", ("01-04-2024", "12:00"), dec!(3.40)));
        ledger.record_completed_stay(&plate("BB-11-BB"), &closed("08:00", ("01-04-2024", "10:00"), dec!(2.20)));
        ledger.record_completed_stay(&plate("CC-22-CC"), &closed("08:00", ("01-04-2024", "10:00"), dec!(2.20)));

        let detail = ledger.detail("01-04-2024".parse().unwrap());
        let plates: Vec<&str> = detail.iter().map(|line| line.plate.as_str()).collect();
        assert_eq!(plates, vec!["BB-11-BB", "CC-22-CC", "AA-00-AA"]);
    }

    #[test]
    fn test_detail_for_quiet_date_is_empty() {
        let ledger = LotLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.detail("01-04-2024".parse().unwrap()).is_empty());
        assert!(ledger.summary().is_empty());
    }

    #[test]
    fn test_open_record_is_skipped() {
        let mut ledger = LotLedger::new();
        let open = ParkingRecord::open("Saldanha", DateTime::parse("01-04-2024", "08:00").unwrap());
        ledger.record_completed_stay(&plate("AA-00-AA"), &open);
        assert!(ledger.is_empty());
    }
}
