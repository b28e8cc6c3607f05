//! Inventory model: an ordered item registry and a 64-bit possession mask.
//!
//! Items get their bit position in order of first definition and keep it
//! forever, so an inventory state handed out earlier stays meaningful after
//! descriptions are edited.

mod view;

pub use view::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::RulesError;

/// Number of distinct items a story may define.
pub const MAX_ITEMS: usize = 64;

/// A defined item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Position of this item's bit in an [`InventoryState`].
    pub bit_index: u8,
    pub description: String,
}

impl Item {
    /// The single-bit mask for this item.
    pub fn id(&self) -> u64 {
        1u64 << self.bit_index
    }
}

/// Possessed items as a bare bitmask.
///
/// Bits with no registered item are carried along but mean nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryState(pub u64);

impl InventoryState {
    /// The state holding nothing.
    pub const EMPTY: InventoryState = InventoryState(0);

    /// Check if any bit of `id` is set.
    pub fn possesses(&self, id: u64) -> bool {
        self.0 & id != 0
    }

    /// Check if this state holds the given item.
    pub fn holds(&self, item: &Item) -> bool {
        self.possesses(item.id())
    }

    /// Raw bitmask.
    pub fn bits(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InventoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for InventoryState {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

/// Append-only registry of items, ordered by bit index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct ItemRegistry {
    items: Vec<Item>,
    by_name: HashMap<String, usize>,
}

impl ItemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define an item, or update the description of an existing one.
    ///
    /// Redefinition never moves an item's bit. Defining more than
    /// [`MAX_ITEMS`] distinct items fails.
    pub fn define_item(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&Item, RulesError> {
        let name = name.into();
        let description = description.into();

        if let Some(&slot) = self.by_name.get(&name) {
            let item = &mut self.items[slot];
            item.description = description;
            return Ok(item);
        }

        let slot = self.items.len();
        if slot >= MAX_ITEMS {
            return Err(RulesError::RegistryFull { name });
        }

        self.by_name.insert(name.clone(), slot);
        self.items.push(Item {
            name,
            bit_index: slot as u8,
            description,
        });
        Ok(&self.items[slot])
    }

    /// Get an item by name.
    pub fn lookup(&self, name: &str) -> Option<&Item> {
        self.by_name.get(name).map(|&slot| &self.items[slot])
    }

    /// Get the description of a named item.
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|item| item.description.as_str())
    }

    /// Iterate items in bit order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Number of defined items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no items are defined.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if every named item is defined and held. Vacuously true for no names.
    pub fn has_all<S: AsRef<str>>(&self, state: InventoryState, names: &[S]) -> bool {
        names.iter().all(|name| {
            self.lookup(name.as_ref())
                .is_some_and(|item| state.holds(item))
        })
    }

    /// True if any named item is held. Undefined names are skipped, and no
    /// names at all is false.
    pub fn has_any<S: AsRef<str>>(&self, state: InventoryState, names: &[S]) -> bool {
        names
            .iter()
            .filter_map(|name| self.lookup(name.as_ref()))
            .any(|item| state.holds(item))
    }

    /// Give the named item. `None` if it is undefined or already held.
    pub fn add_item(&self, state: InventoryState, name: &str) -> Option<InventoryState> {
        let item = self.lookup(name)?;
        if state.holds(item) {
            return None;
        }
        Some(InventoryState(state.0 | item.id()))
    }

    /// Take the named item. `None` if it is undefined or not held.
    pub fn remove_item(&self, state: InventoryState, name: &str) -> Option<InventoryState> {
        let item = self.lookup(name)?;
        if !state.holds(item) {
            return None;
        }
        Some(InventoryState(state.0 & !item.id()))
    }

    /// Descriptions of held items in bit order, skipping empty descriptions.
    pub fn contents(&self, state: InventoryState) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| state.holds(item) && !item.description.is_empty())
            .map(|item| item.description.as_str())
            .collect()
    }
}

impl PartialEq for ItemRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ItemRegistry {}

impl TryFrom<Vec<Item>> for ItemRegistry {
    type Error = RulesError;

    /// Rebuild a registry, requiring bit indices `0..len` and unique names.
    fn try_from(mut items: Vec<Item>) -> Result<Self, Self::Error> {
        if items.len() > MAX_ITEMS {
            return Err(RulesError::InvalidRegistry(format!(
                "{} items, at most {} fit",
                items.len(),
                MAX_ITEMS
            )));
        }

        items.sort_by_key(|item| item.bit_index);
        let mut by_name = HashMap::with_capacity(items.len());
        for (slot, item) in items.iter().enumerate() {
            if usize::from(item.bit_index) != slot {
                return Err(RulesError::InvalidRegistry(format!(
                    "item {:?} has bit {}, expected {}",
                    item.name, item.bit_index, slot
                )));
            }
            if by_name.insert(item.name.clone(), slot).is_some() {
                return Err(RulesError::InvalidRegistry(format!(
                    "item {:?} is defined twice",
                    item.name
                )));
            }
        }
        Ok(Self { items, by_name })
    }
}

impl From<ItemRegistry> for Vec<Item> {
    fn from(registry: ItemRegistry) -> Self {
        registry.items
    }
}
