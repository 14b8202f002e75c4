//! Command dispatcher
//!
//! Routes parsed commands to the registry and renders each reply either as
//! plain text lines or as one JSON object per line.

use std::io::{self, BufRead, Write};

use parking_core::config::OutputFormat;
use parking_core::models::ParkingRecord;
use parking_core::{Date, ParkingError};
use parking_services::{DaySummary, EntryReceipt, ExitReceipt, ParkingRegistry, StayLine};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::command::{Command, CommandError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotLine {
    pub name: String,
    pub capacity: u32,
    pub free_spots: u32,
}

/// Successful outcome of one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    Quit,
    Lots {
        lots: Vec<LotLine>,
    },
    LotCreated {
        name: String,
    },
    Entry(EntryReceipt),
    Exit(ExitReceipt),
    History {
        plate: String,
        records: Vec<ParkingRecord>,
    },
    Summary {
        lot: String,
        days: Vec<DaySummary>,
    },
    Detail {
        lot: String,
        date: Date,
        stays: Vec<StayLine>,
    },
    Removed {
        remaining: Vec<String>,
    },
}

/// Two-decimal display, halves rounded away from zero
fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

impl Reply {
    /// Plain text rendering, one string per output line
    pub fn text_lines(&self) -> Vec<String> {
        match self {
            Reply::Lots { lots } => lots
                .iter()
                .map(|lot| format!("{} {} {}", lot.name, lot.capacity, lot.free_spots))
                .collect(),
            Reply::Quit | Reply::LotCreated { .. } => Vec::new(),
            Reply::Entry(receipt) => vec![format!("{} {}", receipt.lot_name, receipt.free_spots)],
            Reply::Exit(receipt) => vec![format!(
                "{} {} {} {}",
                receipt.plate,
                receipt.entry,
                receipt.exit,
                money(receipt.amount)
            )],
            Reply::History { records, .. } => records.iter().map(history_line).collect(),
            Reply::Summary { days, .. } => days
                .iter()
                .map(|day| format!("{} {}", day.date, money(day.total)))
                .collect(),
            Reply::Detail { stays, .. } => stays
                .iter()
                .map(|stay| format!("{} {} {}", stay.plate, stay.exit.time, money(stay.amount)))
                .collect(),
            Reply::Removed { remaining } => remaining.clone(),
        }
    }
}

fn history_line(record: &ParkingRecord) -> String {
    match record.exit {
        Some(exit) => format!("{} {} {}", record.lot_name, record.entry, exit),
        None => format!("{} {}", record.lot_name, record.entry),
    }
}

/// Whether the command loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Drives a [`ParkingRegistry`] from text commands
pub struct Dispatcher {
    registry: ParkingRegistry,
    format: OutputFormat,
}

impl Dispatcher {
    pub fn new(registry: ParkingRegistry, format: OutputFormat) -> Self {
        Self { registry, format }
    }

    pub fn registry(&self) -> &ParkingRegistry {
        &self.registry
    }

    /// Read commands until `q` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if self.execute_line(&line, &mut output)? == Flow::Stop {
                break;
            }
            output.flush()?;
        }
        output.flush()
    }

    /// Execute one input line and write its reply
    pub fn execute_line<W: Write>(&mut self, line: &str, output: &mut W) -> io::Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => return Ok(Flow::Continue),
            Err(e) => {
                warn!(line = %line, error = %e, "Ignoring malformed command");
                return Ok(Flow::Continue);
            }
        };

        debug!(command = command.name(), "Dispatching command");

        match self.dispatch(command) {
            Ok(Reply::Quit) => return Ok(Flow::Stop),
            Ok(reply) => self.write_reply(&reply, output)?,
            Err(e) => self.write_error(&e, output)?,
        }

        Ok(Flow::Continue)
    }

    /// Apply a command to the registry
    pub fn dispatch(&mut self, command: Command) -> Result<Reply, ParkingError> {
        match command {
            Command::Quit => Ok(Reply::Quit),
            Command::ListLots => Ok(Reply::Lots {
                lots: self
                    .registry
                    .lots()
                    .iter()
                    .map(|lot| LotLine {
                        name: lot.name().to_string(),
                        capacity: lot.capacity(),
                        free_spots: lot.free_spots(),
                    })
                    .collect(),
            }),
            Command::CreateLot(request) => {
                let lot = self.registry.create_lot(request)?;
                Ok(Reply::LotCreated {
                    name: lot.name().to_string(),
                })
            }
            Command::Entry {
                lot,
                plate,
                date,
                time,
            } => self
                .registry
                .register_entry(&lot, &plate, &date, &time)
                .map(Reply::Entry),
            Command::Exit {
                lot,
                plate,
                date,
                time,
            } => self
                .registry
                .register_exit(&lot, &plate, &date, &time)
                .map(Reply::Exit),
            Command::VehicleHistory { plate } => {
                let records = self.registry.vehicle_history(&plate)?.to_vec();
                Ok(Reply::History { plate, records })
            }
            Command::LotSummary { lot } => {
                let days = self.registry.lot_summary(&lot)?;
                Ok(Reply::Summary { lot, days })
            }
            Command::LotDetail { lot, date } => {
                let stays = self.registry.lot_detail(&lot, &date)?;
                let date = date.parse::<Date>()?;
                Ok(Reply::Detail { lot, date, stays })
            }
            Command::RemoveLot { lot } => self
                .registry
                .remove_lot(&lot)
                .map(|remaining| Reply::Removed { remaining }),
        }
    }

    fn write_reply<W: Write>(&self, reply: &Reply, output: &mut W) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                for line in reply.text_lines() {
                    writeln!(output, "{}", line)?;
                }
            }
            OutputFormat::Json => {
                let encoded = serde_json::to_string(reply).map_err(io::Error::from)?;
                writeln!(output, "{}", encoded)?;
            }
        }
        Ok(())
    }

    fn write_error<W: Write>(&self, error: &ParkingError, output: &mut W) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(output, "{}", error),
            OutputFormat::Json => {
                let body = json!({
                    "error": error.error_code(),
                    "message": error.to_string(),
                });
                writeln!(output, "{}", body)
            }
        }
    }
}
