//! Legacy line-oriented layout parsing
//!
//! Each position is a block of lines:
//!
//! ```text
//! 10,00 Stk. Stock A
//! ISIN: US1111111111
//! Lagerland: Deutschland          (optional, repeatable)
//! Wertpapierrechnung ...          (optional, repeatable)
//! 100,00                          unit price
//! 01.01.2024                      price date, discarded
//! 1000,00                         total value
//! ```
//!
//! Blocks are read by an explicit state machine so that every transition,
//! including the abandonment of a block cut off by the end of input, can be
//! observed and tested on its own.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::locale_number::{parse_legacy_decimal, parse_locale_decimal};
use super::parser::RowParser;
use super::stats::{ParseResult, RowError};
use crate::app::models::{FormatKind, HoldingRecord, StatementHeader};
use crate::constants::{
    CUSTODY_ACCOUNT_TOKEN, CUSTODY_COUNTRY_PREFIX, ISIN_LINE_CUT, ISIN_LINE_PREFIX,
    POSITION_SEPARATOR,
};

/// Row parser for the line-oriented layout
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOrientedParser;

impl RowParser for LineOrientedParser {
    fn format(&self) -> FormatKind {
        FormatKind::LineOriented
    }

    fn parse(&self, lines: &[&str], header: &StatementHeader) -> ParseResult {
        let mut result = ParseResult::default();
        let mut machine = PositionMachine::new(lines);

        loop {
            match machine.step() {
                Step::Advanced => {}
                Step::Completed(position) => {
                    result.push_record(position.into_record(header));
                }
                Step::Abandoned { line, error } => {
                    debug!("Abandoning position at line {}: {}", line + 1, error);
                    result.push_skip(lines.get(line).copied().unwrap_or("").trim(), &error);
                }
                Step::Truncated { state, error } => {
                    debug!("Statement ends inside a position ({:?}): {}", state, error);
                    result.push_skip("<end of input>", &error);
                    break;
                }
                Step::EndOfInput => break,
            }
        }

        result
    }
}

/// Named states of the position block reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Looking for a `<quantity> Stk. <name>` line
    SeekPosition,
    /// Looking for the `ISIN:` line
    SeekIsin,
    /// Skipping custody metadata lines
    SkipMetadata,
    /// Next line is the unit price
    ReadPrice,
    /// Next line restates the date and is discarded
    SkipDate,
    /// Next line is the total value
    ReadTotal,
}

/// Result of one state machine step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Cursor or state moved, nothing to report
    Advanced,
    /// A position block was read completely
    Completed(Position),
    /// A position block was dropped; reading resumes with the next line
    Abandoned { line: usize, error: RowError },
    /// Input ended inside a position block; terminal
    Truncated { state: LineState, error: RowError },
    /// Input ended between positions; terminal
    EndOfInput,
}

/// Fields collected for one position block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub quantity: Decimal,
    pub asset_name: String,
    pub isin: String,
    pub unit_price: Decimal,
    pub total_value: Decimal,
}

impl Position {
    /// Build the holding record; quantities are whole shares in this layout
    pub fn into_record(self, header: &StatementHeader) -> HoldingRecord {
        HoldingRecord::new(
            header.depot_id.as_str(),
            self.asset_name,
            self.isin,
            round_quantity(self.quantity),
            self.unit_price,
            self.total_value,
            header.statement_date.as_str(),
        )
    }
}

/// Round half away from zero to a whole number
pub fn round_quantity(quantity: Decimal) -> Decimal {
    quantity.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Cursor-driven reader over the statement lines
#[derive(Debug)]
pub struct PositionMachine<'a> {
    lines: &'a [&'a str],
    cursor: usize,
    state: LineState,
    pending: Position,
}

impl<'a> PositionMachine<'a> {
    /// Start in `SeekPosition` at the first line
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            cursor: 0,
            state: LineState::SeekPosition,
            pending: Position::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> LineState {
        self.state
    }

    /// Index of the next line to inspect
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Run one transition
    pub fn step(&mut self) -> Step {
        let Some(raw_line) = self.lines.get(self.cursor) else {
            return self.end_of_input();
        };
        let line = raw_line.trim();

        match self.state {
            LineState::SeekPosition => {
                self.cursor += 1;
                if !line.contains(POSITION_SEPARATOR) {
                    return Step::Advanced;
                }

                let mut parts = line.split(POSITION_SEPARATOR);
                let quantity_text = parts.next().unwrap_or("");
                let asset_name = parts.next().unwrap_or("").trim();

                match parse_locale_decimal(quantity_text) {
                    Ok(quantity) => {
                        self.pending = Position {
                            quantity,
                            asset_name: asset_name.to_string(),
                            ..Position::default()
                        };
                        self.state = LineState::SeekIsin;
                        Step::Advanced
                    }
                    Err(e) => self.abandon(RowError::number_format("quantity", e)),
                }
            }

            LineState::SeekIsin => {
                self.cursor += 1;
                if line.starts_with(ISIN_LINE_PREFIX) {
                    self.pending.isin = line.chars().skip(ISIN_LINE_CUT).collect();
                    self.state = LineState::SkipMetadata;
                }
                Step::Advanced
            }

            LineState::SkipMetadata => {
                if line.starts_with(CUSTODY_COUNTRY_PREFIX) || line.contains(CUSTODY_ACCOUNT_TOKEN) {
                    self.cursor += 1;
                } else {
                    self.state = LineState::ReadPrice;
                }
                Step::Advanced
            }

            LineState::ReadPrice => {
                self.cursor += 1;
                match parse_legacy_decimal(line) {
                    Ok(unit_price) => {
                        self.pending.unit_price = unit_price;
                        self.state = LineState::SkipDate;
                        Step::Advanced
                    }
                    Err(e) => self.abandon(RowError::number_format("unit price", e)),
                }
            }

            LineState::SkipDate => {
                self.cursor += 1;
                self.state = LineState::ReadTotal;
                Step::Advanced
            }

            LineState::ReadTotal => {
                self.cursor += 1;
                match parse_legacy_decimal(line) {
                    Ok(total_value) => {
                        let mut position = std::mem::take(&mut self.pending);
                        position.total_value = total_value;
                        self.state = LineState::SeekPosition;
                        Step::Completed(position)
                    }
                    Err(e) => self.abandon(RowError::number_format("total value", e)),
                }
            }
        }
    }

    /// Drop the pending block; the failing line has already been consumed
    fn abandon(&mut self, error: RowError) -> Step {
        self.pending = Position::default();
        self.state = LineState::SeekPosition;
        Step::Abandoned {
            line: self.cursor - 1,
            error,
        }
    }

    fn end_of_input(&mut self) -> Step {
        if self.state == LineState::SeekPosition {
            return Step::EndOfInput;
        }

        let state = self.state;
        self.pending = Position::default();
        self.state = LineState::SeekPosition;

        Step::Truncated {
            state,
            error: RowError::structural(format!(
                "input ended in state {:?} before the position was complete",
                state
            )),
        }
    }
}
