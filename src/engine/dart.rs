//! The dart value type: the 62 legal scoring darts and their notation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::error::EngineError;

/// Segment value of both bulls.
pub const BULL_VALUE: u8 = 25;

/// A single thrown dart.
///
/// `value` is 1-20 for numbered segments or 25 for the bull; `multiplier`
/// is 1-3 for numbered segments and 1-2 for the bull (there is no triple
/// bull). Score and double-ness are always computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dart {
    pub value: u8,
    pub multiplier: u8,
}

impl Dart {
    /// Construct a dart, rejecting anything outside the 62 legal values.
    pub fn new(value: u8, multiplier: u8) -> Result<Self, EngineError> {
        let legal = match value {
            1..=20 => (1..=3).contains(&multiplier),
            BULL_VALUE => (1..=2).contains(&multiplier),
            _ => false,
        };
        if !legal {
            return Err(EngineError::InvalidDart(format!("{value}x{multiplier}")));
        }
        Ok(Self { value, multiplier })
    }

    /// Parse a dart notation, case-insensitively.
    ///
    /// Accepted: `S1`..`S20`, bare `1`..`20`, `D1`..`D20`, `T1`..`T20`,
    /// `25`/`SBULL` (single bull), `50`/`BULL`/`DBULL` (double bull).
    pub fn parse(notation: &str) -> Result<Self, EngineError> {
        let raw = notation.trim().to_ascii_uppercase();
        match raw.as_str() {
            "SBULL" | "25" => return Ok(Self { value: BULL_VALUE, multiplier: 1 }),
            "BULL" | "DBULL" | "50" => return Ok(Self { value: BULL_VALUE, multiplier: 2 }),
            _ => {}
        }
        let (multiplier, digits) = match raw.as_bytes().first() {
            Some(b'S') => (1u8, &raw[1..]),
            Some(b'D') => (2u8, &raw[1..]),
            Some(b'T') => (3u8, &raw[1..]),
            _ => (1u8, raw.as_str()),
        };
        let value: u8 = digits
            .parse()
            .map_err(|_| EngineError::InvalidDart(notation.to_string()))?;
        if !(1..=20).contains(&value) {
            return Err(EngineError::InvalidDart(notation.to_string()));
        }
        Ok(Self { value, multiplier })
    }

    /// Points this dart scores: `value * multiplier` (25/50 for the bulls).
    pub fn score(&self) -> u16 {
        u16::from(self.value) * u16::from(self.multiplier)
    }

    /// True for `D1`..`D20` and the double bull.
    pub fn is_double(&self) -> bool {
        self.multiplier == 2
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value == BULL_VALUE {
            return f.write_str(if self.multiplier == 2 { "DBULL" } else { "SBULL" });
        }
        let prefix = match self.multiplier {
            2 => 'D',
            3 => 'T',
            _ => 'S',
        };
        write!(f, "{}{}", prefix, self.value)
    }
}
