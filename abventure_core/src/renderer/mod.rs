//! Cell renderer - a pure function from (story, cell, inventory state) to markup.
//!
//! Rendering never changes the story. Each call gets its own [`Inventory`]
//! view seeded with the caller's state, and every link it writes carries the
//! state as it stood at that line, so the next request needs nothing but the
//! link itself.

mod config;
mod markup;

pub use config::*;
pub use markup::escape;

use abventure_rules::{hash, Cell, Ident, Inventory, InventoryState, Line, NavToken, Story};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

use crate::observer::{NoopObserver, RenderEvent, StoryObserver};

/// Rendering only fails when the sink does.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("writing {context}: {source}")]
    Write {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// What a render produced besides markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutcome {
    /// The cell that was asked for, after defaulting.
    pub cell: Ident,
    /// `false` if the cell does not exist.
    pub found: bool,
    /// Inventory state after every give and take in the cell.
    pub final_state: InventoryState,
    /// Every link written, broken ones included, in output order.
    pub links: Vec<NavToken>,
}

/// Render a cell with the default configuration and no observer.
pub fn render<W: Write>(
    story: &Story,
    cell: Option<Ident>,
    state: InventoryState,
    sink: &mut W,
) -> Result<RenderOutcome, RenderError> {
    Renderer::new(&RenderConfig::default()).render(story, cell, state, sink)
}

/// Renders cells according to a [`RenderConfig`].
pub struct Renderer<'a> {
    config: &'a RenderConfig,
    observer: &'a dyn StoryObserver,
}

/// Result of evaluating one line.
enum Rendered {
    Blank,
    Text(String),
    Link { token: NavToken, markup: String },
}

impl<'a> Renderer<'a> {
    /// Create a renderer with no observer.
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            observer: &NoopObserver,
        }
    }

    /// Report diagnostics to the given observer.
    pub fn with_observer(mut self, observer: &'a dyn StoryObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Render into a string.
    pub fn render_to_string(
        &self,
        story: &Story,
        cell: Option<Ident>,
        state: InventoryState,
    ) -> Result<(String, RenderOutcome), RenderError> {
        let mut out = Vec::new();
        let outcome = self.render(story, cell, state, &mut out)?;
        Ok((String::from_utf8_lossy(&out).into_owned(), outcome))
    }

    /// Render `cell` (the start cell if `None`) with `state` into `sink`.
    pub fn render<W: Write>(
        &self,
        story: &Story,
        cell: Option<Ident>,
        state: InventoryState,
        sink: &mut W,
    ) -> Result<RenderOutcome, RenderError> {
        let ident = cell.unwrap_or(Ident::START);
        let mut outcome = RenderOutcome {
            cell: ident,
            found: false,
            final_state: state,
            links: Vec::new(),
        };

        let Some(current) = story.cell(ident) else {
            self.observer.on_render(&RenderEvent::UnknownCell { cell: ident });
            writeln!(sink, "<h2>No such cell {}</h2>", ident)
                .map_err(write_err("missing cell notice"))?;
            return Ok(outcome);
        };
        outcome.found = true;
        self.observer.on_render(&RenderEvent::CellEntered { cell: ident, state });

        if self.config.cell_comment {
            writeln!(sink, "\n<!-- cell {} holding {} -->", ident, state)
                .map_err(write_err("cell comment"))?;
        }
        writeln!(
            sink,
            "<article>\n    <h2>{}</h2>",
            escape(current.heading())
        )
        .map_err(write_err("cell heading"))?;

        let mut inv = Inventory::new(&story.items, state);
        let mut was_blank = false;

        for (index, line) in current.lines.iter().enumerate() {
            match self.render_line(story, index, line, &mut inv) {
                Rendered::Blank => {
                    if !was_blank {
                        sink.write_all(b"\n").map_err(write_err("blank line"))?;
                    }
                    was_blank = true;
                }
                Rendered::Text(text) => {
                    was_blank = false;
                    writeln!(sink, "    <p>{}</p>", text).map_err(write_err("cell line"))?;
                }
                Rendered::Link { token, markup } => {
                    was_blank = false;
                    outcome.links.push(token);
                    writeln!(sink, "    <p>{}</p>", markup).map_err(write_err("cell link"))?;
                }
            }
        }

        writeln!(
            sink,
            "</article>\n<ul id=\"{}\">",
            escape(&self.config.inventory_list_id)
        )
        .map_err(write_err("inventory start"))?;
        for description in inv.contents() {
            writeln!(sink, "  <li>{}</li>", escape(description))
                .map_err(write_err("inventory item"))?;
        }
        sink.write_all(b"</ul>\n").map_err(write_err("inventory end"))?;

        outcome.final_state = inv.state();
        self.observer.on_render(&RenderEvent::Finished {
            cell: ident,
            state: outcome.final_state,
            links: outcome.links.len(),
        });
        Ok(outcome)
    }

    /// Evaluate one line against the inventory, advancing it on give/take.
    fn render_line(
        &self,
        story: &Story,
        index: usize,
        line: &Line,
        inv: &mut Inventory<'_>,
    ) -> Rendered {
        if !inv.has_all(&line.require) || inv.has_any(&line.forbid) {
            self.observer.on_render(&RenderEvent::GuardFailed { index });
            return Rendered::Blank;
        }
        if let Some(item) = &line.give {
            if !inv.add(item) {
                self.observer.on_render(&RenderEvent::GiveRefused { index, item });
                return Rendered::Blank;
            }
        }
        if let Some(item) = &line.take {
            if !inv.remove(item) {
                self.observer.on_render(&RenderEvent::TakeRefused { index, item });
                return Rendered::Blank;
            }
        }

        let Some(target_name) = &line.links_to else {
            if line.text.is_empty() {
                return Rendered::Blank;
            }
            return Rendered::Text(line.text.clone());
        };

        let token = NavToken::new(hash(target_name), inv.state());
        let markup = match story.cell(token.cell) {
            Some(target) => format!(
                "<a href=\"{}{}\">{}</a>",
                escape(&self.config.link_prefix),
                token,
                escape(link_text(line, target))
            ),
            None => {
                self.observer.on_render(&RenderEvent::BrokenLink {
                    index,
                    target: target_name,
                });
                let text = if line.text.is_empty() {
                    &self.config.broken_link_placeholder
                } else {
                    &line.text
                };
                format!(
                    "<a class=\"{}\" href=\"{}{}\">{}</a>",
                    escape(&self.config.broken_link_class),
                    escape(&self.config.link_prefix),
                    token,
                    escape(text)
                )
            }
        };
        Rendered::Link { token, markup }
    }
}

/// Explicit text, else the target's label, else its name.
fn link_text<'l>(line: &'l Line, target: &'l Cell) -> &'l str {
    if line.text.is_empty() {
        target.heading()
    } else {
        &line.text
    }
}

fn write_err(context: &'static str) -> impl Fn(std::io::Error) -> RenderError {
    move |source| RenderError::Write { context, source }
}
