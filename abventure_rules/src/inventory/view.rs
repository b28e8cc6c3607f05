//! A per-render inventory: shared item definitions plus a private state.

use super::{InventoryState, ItemRegistry};

/// Transient inventory view.
///
/// Borrows the story's registry and owns its state, so two views over the
/// same story never see each other's changes.
#[derive(Debug, Clone, Copy)]
pub struct Inventory<'a> {
    registry: &'a ItemRegistry,
    state: InventoryState,
}

impl<'a> Inventory<'a> {
    /// Create a view starting from the given state.
    pub fn new(registry: &'a ItemRegistry, state: InventoryState) -> Self {
        Self { registry, state }
    }

    /// Current state.
    pub fn state(&self) -> InventoryState {
        self.state
    }

    pub fn has_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.registry.has_all(self.state, names)
    }

    pub fn has_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.registry.has_any(self.state, names)
    }

    /// Add the named item, returning whether the state changed.
    pub fn add(&mut self, name: &str) -> bool {
        match self.registry.add_item(self.state, name) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Remove the named item, returning whether the state changed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.registry.remove_item(self.state, name) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Descriptions of held items in bit order.
    pub fn contents(&self) -> Vec<&'a str> {
        self.registry.contents(self.state)
    }

    /// Render a plain-text table of every defined item and whether it is held.
    pub fn debug_table(&self) -> String {
        let mut table = String::new();
        table.push_str(" Has | Bit | Name       | Description\n");
        table.push_str("-----+-----+------------+------------\n");
        for item in self.registry.iter() {
            let has = if self.state.holds(item) { "*" } else { " " };
            table.push_str(&format!(
                "  {}  | {:>3} | {:<10} | {}\n",
                has, item.bit_index, item.name, item.description
            ));
        }
        table.push_str("-----+-----+------------+------------\n");
        table.push_str(&format!("State: {}\n", self.state));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ItemRegistry {
        let mut registry = ItemRegistry::new();
        registry.define_item("lamp", "A brass lamp").unwrap();
        registry.define_item("key", "A small key").unwrap();
        registry
    }

    #[test]
    fn test_view_add_remove() {
        let registry = registry();
        let mut inv = Inventory::new(&registry, InventoryState::EMPTY);

        assert!(inv.add("key"));
        assert!(!inv.add("key"));
        assert_eq!(inv.state().bits(), 2);
        assert_eq!(inv.contents(), vec!["A small key"]);

        assert!(inv.remove("key"));
        assert!(!inv.remove("key"));
        assert!(!inv.remove("ghost"));
        assert_eq!(inv.state(), InventoryState::EMPTY);
    }

    #[test]
    fn test_views_are_independent() {
        let registry = registry();
        let mut first = Inventory::new(&registry, InventoryState(1));
        let second = first;

        first.add("key");

        assert_eq!(first.state().bits(), 3);
        assert_eq!(second.state().bits(), 1);
    }

    #[test]
    fn test_debug_table() {
        let registry = registry();
        let inv = Inventory::new(&registry, InventoryState(2));
        let table = inv.debug_table();

        assert!(table.contains("lamp"));
        assert!(table.contains("  *  |   1 | key"));
        assert!(table.ends_with("State: 2\n"));
    }
}
