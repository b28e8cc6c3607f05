//! Navigation tokens - the whole of a reader's position, in one string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::ident::Ident;
use crate::inventory::InventoryState;
use crate::RulesError;

/// A cell identifier plus the inventory state to render it with.
///
/// Written as the 8-hex-digit identifier immediately followed by the state in
/// decimal, e.g. `b0c485d75`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavToken {
    pub cell: Ident,
    pub state: InventoryState,
}

impl NavToken {
    pub fn new(cell: Ident, state: InventoryState) -> Self {
        Self { cell, state }
    }

    /// Token for the start cell with nothing held.
    pub fn start() -> Self {
        Self::new(Ident::START, InventoryState::EMPTY)
    }
}

impl std::fmt::Display for NavToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.cell, self.state)
    }
}

impl FromStr for NavToken {
    type Err = RulesError;

    /// Parse a token. A missing or non-numeric state means an empty inventory.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RulesError::InvalidToken {
            token: s.to_string(),
            reason: reason.to_string(),
        };

        if s.len() < 8 || !s.is_char_boundary(8) {
            return Err(invalid("shorter than a cell identifier"));
        }
        let (cell, state) = s.split_at(8);
        let cell: Ident = cell
            .parse()
            .map_err(|_| invalid("cell identifier is not hexadecimal"))?;

        let state = if !state.is_empty() && state.bytes().all(|b| b.is_ascii_digit()) {
            state
                .parse::<u64>()
                .map_err(|_| invalid("inventory state does not fit in 64 bits"))?
        } else {
            0
        };

        Ok(Self::new(cell, InventoryState(state)))
    }
}

impl Serialize for NavToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NavToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
