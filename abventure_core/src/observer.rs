//! Diagnostic observers for the compiler and renderer.
//!
//! Both are silent unless an observer is handed to them. [`TracingObserver`]
//! forwards everything to `tracing`; installing a subscriber is up to the
//! embedding process.

use abventure_rules::{Ident, InventoryState};

/// Something noteworthy that happened while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileEvent<'a> {
    BlankLine { line: usize },
    TitleFound { line: usize, title: &'a str },
    CellOpened { line: usize, name: &'a str, label: Option<&'a str> },
    CellCommitted { name: &'a str, ident: Ident, lines: usize },
    /// Lines written before the first cell, thrown away.
    OrphanLinesDropped { count: usize },
    ItemDefined { line: usize, name: &'a str, bit_index: u8 },
    LineAppended { line: usize, cell: &'a str },
}

/// Something noteworthy that happened while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent<'a> {
    CellEntered { cell: Ident, state: InventoryState },
    UnknownCell { cell: Ident },
    GuardFailed { index: usize },
    GiveRefused { index: usize, item: &'a str },
    TakeRefused { index: usize, item: &'a str },
    BrokenLink { index: usize, target: &'a str },
    Finished { cell: Ident, state: InventoryState, links: usize },
}

/// Receives compile and render diagnostics. Every method defaults to doing nothing.
pub trait StoryObserver {
    fn on_compile(&self, _event: &CompileEvent<'_>) {}

    fn on_render(&self, _event: &RenderEvent<'_>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StoryObserver for NoopObserver {}

/// Observer that emits each event as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StoryObserver for TracingObserver {
    fn on_compile(&self, event: &CompileEvent<'_>) {
        match *event {
            CompileEvent::BlankLine { line } => tracing::trace!(line, "blank line skipped"),
            CompileEvent::TitleFound { line, title } => tracing::debug!(line, title, "title found"),
            CompileEvent::CellOpened { line, name, label } => {
                tracing::debug!(line, name, label = label.unwrap_or(""), "cell opened")
            }
            CompileEvent::CellCommitted { name, ident, lines } => {
                tracing::debug!(name, %ident, lines, "cell committed")
            }
            CompileEvent::OrphanLinesDropped { count } => {
                tracing::debug!(count, "lines before the first cell dropped")
            }
            CompileEvent::ItemDefined { line, name, bit_index } => {
                tracing::debug!(line, name, bit_index, "item defined")
            }
            CompileEvent::LineAppended { line, cell } => {
                tracing::trace!(line, cell, "line appended")
            }
        }
    }

    fn on_render(&self, event: &RenderEvent<'_>) {
        match *event {
            RenderEvent::CellEntered { cell, state } => {
                tracing::debug!(%cell, state = state.bits(), "rendering cell")
            }
            RenderEvent::UnknownCell { cell } => tracing::debug!(%cell, "no such cell"),
            RenderEvent::GuardFailed { index } => tracing::trace!(index, "line guard failed"),
            RenderEvent::GiveRefused { index, item } => {
                tracing::trace!(index, item, "give refused: undefined or already held")
            }
            RenderEvent::TakeRefused { index, item } => {
                tracing::trace!(index, item, "take refused: undefined or not held")
            }
            RenderEvent::BrokenLink { index, target } => {
                tracing::debug!(index, target, "link to undefined cell")
            }
            RenderEvent::Finished { cell, state, links } => {
                tracing::debug!(%cell, state = state.bits(), links, "cell rendered")
            }
        }
    }
}
