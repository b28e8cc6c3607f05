//! Compiled story structure - cells, lines and the story itself.

mod token;

pub use token::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ident::{hash, Ident};
use crate::inventory::ItemRegistry;
use crate::RulesError;

/// One line of a cell, with the guards and effects attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Line {
    /// Every one of these items must be held.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require: Vec<String>,
    /// None of these items may be held.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbid: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub give: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<String>,
    /// Name of the cell this line links to. Resolved when rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links_to: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl Line {
    /// Create a plain text line.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Check if this line is guarded by any inventory condition.
    pub fn is_guarded(&self) -> bool {
        !self.require.is_empty() || !self.forbid.is_empty()
    }
}

/// A named location in the story graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub lines: Vec<Line>,
}

impl Cell {
    /// Create an empty cell.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            lines: Vec::new(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Append a line.
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// The identifier this cell is addressed by.
    pub fn ident(&self) -> Ident {
        hash(&self.name)
    }

    /// Label if there is one, otherwise the name.
    pub fn heading(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A compiled story. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoryRecord")]
pub struct Story {
    pub title: String,
    pub cells: BTreeMap<Ident, Cell>,
    pub items: ItemRegistry,
    pub compiled_at: DateTime<Utc>,
}

/// Unchecked shape of a serialized [`Story`].
#[derive(Deserialize)]
struct StoryRecord {
    title: String,
    cells: BTreeMap<Ident, Cell>,
    items: ItemRegistry,
    compiled_at: DateTime<Utc>,
}

impl TryFrom<StoryRecord> for Story {
    type Error = RulesError;

    fn try_from(record: StoryRecord) -> Result<Self, Self::Error> {
        for (key, cell) in &record.cells {
            let expected = cell.ident();
            if *key != expected {
                return Err(RulesError::MisaddressedCell {
                    name: cell.name.clone(),
                    key: *key,
                    expected,
                });
            }
        }
        Ok(Self {
            title: record.title,
            cells: record.cells,
            items: record.items,
            compiled_at: record.compiled_at,
        })
    }
}

impl Story {
    /// Create an empty story.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cells: BTreeMap::new(),
            items: ItemRegistry::new(),
            compiled_at: Utc::now(),
        }
    }

    /// Store a cell under its identifier, replacing any cell that hashes the same.
    pub fn insert_cell(&mut self, cell: Cell) -> Option<Cell> {
        self.cells.insert(cell.ident(), cell)
    }

    /// Get a cell by identifier.
    pub fn cell(&self, ident: Ident) -> Option<&Cell> {
        self.cells.get(&ident)
    }

    /// Get a cell by name.
    pub fn cell_named(&self, name: &str) -> Option<&Cell> {
        self.cell(hash(name))
    }

    /// The default entry cell, named `Start`.
    pub fn start_cell(&self) -> Option<&Cell> {
        self.cell(Ident::START)
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Compare title, cells and items, ignoring when each was compiled.
    pub fn same_content(&self, other: &Story) -> bool {
        self.title == other.title && self.cells == other.cells && self.items == other.items
    }

    /// Pretty JSON dump for debugging.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Story {
        let mut story = Story::new("Sample");
        story.insert_cell(
            Cell::new("Start")
                .with_label("The beginning")
                .with_line(Line::text("Hello.")),
        );
        story.insert_cell(Cell::new("end"));
        story
    }

    #[test]
    fn test_cell_lookup() {
        let story = sample();
        assert_eq!(story.cell_count(), 2);
        assert_eq!(story.start_cell().unwrap().heading(), "The beginning");
        assert_eq!(story.cell_named("end").unwrap().heading(), "end");
        assert!(story.cell(hash("nowhere")).is_none());
    }

    #[test]
    fn test_insert_replaces_same_ident() {
        let mut story = sample();
        let old = story.insert_cell(Cell::new("end").with_label("The real end"));
        assert!(old.is_some());
        assert_eq!(story.cell_count(), 2);
        assert_eq!(story.cell_named("end").unwrap().heading(), "The real end");
    }

    #[test]
    fn test_same_content_ignores_timestamp() {
        let a = sample();
        let mut b = sample();
        b.compiled_at = a.compiled_at + chrono::Duration::seconds(30);
        assert!(a.same_content(&b));

        b.title = "Other".to_string();
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_json_dump() {
        let json = sample().to_json_pretty().unwrap();
        assert!(json.contains("\"b72c5e85\""));
        assert!(json.contains("\"The beginning\""));
        // Empty optional fields are left out.
        assert!(!json.contains("links_to"));

        let back: Story = serde_json::from_str(&json).unwrap();
        assert!(back.same_content(&sample()));
    }

    #[test]
    fn test_json_rejects_bad_items() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["items"] = serde_json::json!([{"name": "x", "bit_index": 64, "description": ""}]);
        assert!(serde_json::from_value::<Story>(value.clone()).is_err());

        value["items"] = serde_json::json!([
            {"name": "x", "bit_index": 0, "description": ""},
            {"name": "x", "bit_index": 1, "description": ""}
        ]);
        assert!(serde_json::from_value::<Story>(value).is_err());
    }

    #[test]
    fn test_json_rejects_misaddressed_cell() {
        let mut value = serde_json::to_value(sample()).unwrap();
        let cells = value["cells"].as_object_mut().unwrap();
        let end = cells.remove("b0c485d7").unwrap();
        cells.insert("00000001".to_string(), end);

        let err = serde_json::from_value::<Story>(value).unwrap_err();
        assert!(err.to_string().contains("stored under 00000001"));
    }

    #[test]
    fn test_line_guards() {
        assert!(!Line::text("plain").is_guarded());
        let guarded = Line {
            forbid: vec!["key".to_string()],
            ..Default::default()
        };
        assert!(guarded.is_guarded());
    }
}
