//! Named source ranges
//!
//! Global invariants enforced:
//! - Every coordinate is non-negative
//! - `end` never precedes `start`
//! - Names are never empty
//!
//! All three are checked when a range is constructed or deserialized; an
//! invalid range cannot exist.

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Reasons a [`NamedRange`] cannot be constructed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error(
        "line and column positions must be non-negative: start_line={start_line}, \
         start_column={start_column}, end_line={end_line}, end_column={end_column}"
    )]
    NegativeCoordinate {
        start_line: i64,
        start_column: i64,
        end_line: i64,
        end_column: i64,
    },
    #[error(
        "end position must not precede start position: start_line={}, start_column={}, \
         end_line={}, end_column={}",
        .start.line, .start.column, .end.line, .end.column
    )]
    EndBeforeStart { start: Position, end: Position },
    #[error("range name must not be empty")]
    EmptyName,
    #[error("coordinate {0} does not fit in 32 bits")]
    Overflow(i64),
}

/// A function-like construct (or a whole file) with its display name and span
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRange")]
pub struct NamedRange {
    name: String,
    start: Position,
    end: Position,
}

impl NamedRange {
    pub fn new(name: impl Into<String>, start: Position, end: Position) -> Result<Self, RangeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RangeError::EmptyName);
        }
        if end < start {
            return Err(RangeError::EndBeforeStart { start, end });
        }
        Ok(NamedRange { name, start, end })
    }

    /// Build a range from signed coordinates, rejecting negative values
    pub fn from_coordinates(
        name: impl Into<String>,
        start_line: i64,
        start_column: i64,
        end_line: i64,
        end_column: i64,
    ) -> Result<Self, RangeError> {
        if start_line < 0 || start_column < 0 || end_line < 0 || end_column < 0 {
            return Err(RangeError::NegativeCoordinate {
                start_line,
                start_column,
                end_line,
                end_column,
            });
        }

        let to_u32 = |value: i64| u32::try_from(value).map_err(|_| RangeError::Overflow(value));
        let start = Position::new(to_u32(start_line)?, to_u32(start_column)?);
        let end = Position::new(to_u32(end_line)?, to_u32(end_column)?);
        Self::new(name, start, end)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }
}

#[derive(Deserialize)]
struct UncheckedRange {
    name: String,
    start: Position,
    end: Position,
}

impl TryFrom<UncheckedRange> for NamedRange {
    type Error = RangeError;

    fn try_from(raw: UncheckedRange) -> Result<Self, Self::Error> {
        NamedRange::new(raw.name, raw.start, raw.end)
    }
}
