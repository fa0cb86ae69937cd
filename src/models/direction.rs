use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Long,
    #[serde(rename = "S")]
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "L"),
            Direction::Short => write!(f, "S"),
        }
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "L",
            Direction::Short => "S",
        }
    }

    /// Anything that isn't recognisably long is booked as short.
    pub fn parse_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" => Direction::Long,
            _ => Direction::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Trade,
    Cashflow,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Trade => write!(f, "trade"),
            EntryKind::Cashflow => write!(f, "cashflow"),
        }
    }
}

impl EntryKind {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("trade") {
            EntryKind::Trade
        } else {
            EntryKind::Cashflow
        }
    }
}
