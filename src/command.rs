//! Command line parsing
//!
//! Turns one input line into a [`Command`]. Parsing only splits and routes
//! arguments; every semantic check (plate format, dates, rates) happens in
//! the registry so the error precedence stays in one place.

use parking_core::models::CreateLotRequest;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    ListLots,
    CreateLot(CreateLotRequest),
    Entry {
        lot: String,
        plate: String,
        date: String,
        time: String,
    },
    Exit {
        lot: String,
        plate: String,
        date: String,
        time: String,
    },
    VehicleHistory {
        plate: String,
    },
    LotSummary {
        lot: String,
    },
    LotDetail {
        lot: String,
        date: String,
    },
    RemoveLot {
        lot: String,
    },
}

/// Lines that do not form a command at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty line")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("wrong number of arguments for '{command}': {given}")]
    Arity { command: String, given: usize },
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::ListLots => "list_lots",
            Command::CreateLot(_) => "create_lot",
            Command::Entry { .. } => "entry",
            Command::Exit { .. } => "exit",
            Command::VehicleHistory { .. } => "vehicle_history",
            Command::LotSummary { .. } => "lot_summary",
            Command::LotDetail { .. } => "lot_detail",
            Command::RemoveLot { .. } => "remove_lot",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(line);
        let (head, args) = tokens.split_first().ok_or(CommandError::Empty)?;

        let arity = |given: usize| CommandError::Arity {
            command: head.clone(),
            given,
        };

        match (head.as_str(), args) {
            ("q", []) => Ok(Command::Quit),
            ("p", []) => Ok(Command::ListLots),
            ("p", [name, capacity, first, after, cap]) => {
                Ok(Command::CreateLot(CreateLotRequest {
                    name: name.clone(),
                    // Non-numeric capacity is reported as an invalid capacity
                    capacity: capacity.parse().unwrap_or(0),
                    per_quarter_first_hour: parse_rate(first),
                    per_quarter_after_hour: parse_rate(after),
                    daily_cap: parse_rate(cap),
                }))
            }
            ("e", [lot, plate, date, time]) => Ok(Command::Entry {
                lot: lot.clone(),
                plate: plate.clone(),
                date: date.clone(),
                time: time.clone(),
            }),
            ("s", [lot, plate, date, time]) => Ok(Command::Exit {
                lot: lot.clone(),
                plate: plate.clone(),
                date: date.clone(),
                time: time.clone(),
            }),
            ("v", [plate]) => Ok(Command::VehicleHistory {
                plate: plate.clone(),
            }),
            ("f", [lot]) => Ok(Command::LotSummary { lot: lot.clone() }),
            ("f", [lot, date]) => Ok(Command::LotDetail {
                lot: lot.clone(),
                date: date.clone(),
            }),
            ("r", [lot]) => Ok(Command::RemoveLot { lot: lot.clone() }),
            ("q" | "p" | "e" | "s" | "v" | "f" | "r", _) => Err(arity(args.len())),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Unparseable rates become zero and fail the rate schedule check
fn parse_rate(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap_or(Decimal::ZERO)
}

/// Split a line on whitespace. A double-quoted token may contain spaces;
/// the quotes themselves are dropped.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}
