//! Identifier hashing - content addresses for cells and items.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::RulesError;

/// A 32-bit content address derived from a name.
///
/// Canonically written as eight lowercase hex digits. Not collision resistant:
/// two different names may share an identifier, and whichever is compiled last
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(pub u32);

impl Ident {
    /// `hash("Start")`, the cell rendered when no cell is requested.
    pub const START: Ident = Ident(0xb72c_5e85);
}

impl Default for Ident {
    fn default() -> Self {
        Self::START
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for Ident {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RulesError::InvalidIdent(s.to_string()));
        }
        u32::from_str_radix(s, 16)
            .map(Ident)
            .map_err(|_| RulesError::InvalidIdent(s.to_string()))
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One-at-a-time style hash over the characters of `text`.
///
/// All arithmetic wraps at 32 bits.
pub fn hash(text: &str) -> Ident {
    let mut acc: u32 = 0;
    for c in text.chars() {
        acc = acc.wrapping_add(c as u32);
        acc = acc.wrapping_add(acc << 10);
        acc ^= acc >> 6;
    }
    acc = acc.wrapping_add(acc << 3);
    acc ^= acc >> 11;
    acc = acc.wrapping_add(acc << 15);
    Ident(acc)
}

/// Map each name's identifier back to the name, for debugging.
///
/// If two names collide the later one wins.
pub fn reverse_map<I, S>(names: I) -> BTreeMap<Ident, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(|name| {
            let name = name.into();
            (hash(&name), name)
        })
        .collect()
}
