//! Story compiler - turns source text into a [`Story`].
//!
//! Single pass, one line at a time:
//! 1. Strip comments and whitespace, skip blank lines
//! 2. The first non-blank line is the title, unless it starts with a directive
//! 3. Leading directive words build up a [`Line`]; the first ordinary word
//!    starts the line's text
//!
//! Any error aborts the whole compile; there is no partial story.

mod lexer;

pub use lexer::{Directive, Glyph};

use abventure_rules::{Cell, Line, RulesError, Story};
use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::observer::{CompileEvent, NoopObserver, StoryObserver};

/// Errors that abort a compile. Line numbers start at 1.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("line {line}: unexpected glyph in {word:?}")]
    UnexpectedGlyph { line: usize, word: String },

    #[error("line {line}: {source}")]
    Inventory {
        line: usize,
        #[source]
        source: RulesError,
    },

    #[error("reading story {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// The source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::UnexpectedGlyph { line, .. } | CompileError::Inventory { line, .. } => {
                Some(*line)
            }
            CompileError::Io { .. } => None,
        }
    }
}

/// Compile source text with no diagnostics.
pub fn compile(source: &str) -> Result<Story, CompileError> {
    Compiler::new().compile(source)
}

/// Read and compile a UTF-8 story file.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Story, CompileError> {
    Compiler::new().compile_file(path)
}

/// Compiler front end. Holds only the observer; each compile starts fresh.
pub struct Compiler<'o> {
    observer: &'o dyn StoryObserver,
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler<'static> {
    /// Create a compiler with no observer.
    pub fn new() -> Self {
        Self {
            observer: &NoopObserver,
        }
    }
}

impl<'o> Compiler<'o> {
    /// Report diagnostics to the given observer.
    pub fn with_observer<'n>(self, observer: &'n dyn StoryObserver) -> Compiler<'n> {
        Compiler { observer }
    }

    /// Compile source text into a story.
    pub fn compile(&self, source: &str) -> Result<Story, CompileError> {
        let mut state = ParseState::new(self.observer);
        for (index, raw) in source.lines().enumerate() {
            state.parse_line(index + 1, raw)?;
        }
        state.close_cell();

        let mut story = state.story;
        story.compiled_at = Utc::now();
        Ok(story)
    }

    /// Read a file and compile it.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<Story, CompileError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.compile(&source)
    }
}

/// Working state for one compile.
struct ParseState<'o> {
    story: Story,
    /// The open cell. `None` until the first `:` directive.
    current: Option<Cell>,
    /// Lines seen while no cell was open.
    orphans: usize,
    title_seen: bool,
    observer: &'o dyn StoryObserver,
}

impl<'o> ParseState<'o> {
    fn new(observer: &'o dyn StoryObserver) -> Self {
        Self {
            story: Story::new(""),
            current: None,
            orphans: 0,
            title_seen: false,
            observer,
        }
    }

    fn emit(&self, event: CompileEvent<'_>) {
        self.observer.on_compile(&event);
    }

    fn parse_line(&mut self, number: usize, raw: &str) -> Result<(), CompileError> {
        let line = lexer::clean_line(raw);
        if line.is_empty() {
            self.emit(CompileEvent::BlankLine { line: number });
            return Ok(());
        }

        let words = lexer::words(line);

        if !self.title_seen {
            self.title_seen = true;
            if lexer::directive(words[0]).is_none() {
                self.story.title = line.to_string();
                self.emit(CompileEvent::TitleFound {
                    line: number,
                    title: line,
                });
                return Ok(());
            }
        }

        let mut cell_line = Line::default();

        for (i, word) in words.iter().enumerate() {
            let Some(directive) = lexer::directive(word) else {
                cell_line.text = lexer::rest(&words, i);
                break;
            };
            let name = directive.name.to_string();

            match directive.glyph {
                Glyph::Cell => {
                    self.close_cell();
                    let label = lexer::rest(&words, i + 1);
                    let label = (!label.is_empty()).then_some(label);
                    self.emit(CompileEvent::CellOpened {
                        line: number,
                        name: &name,
                        label: label.as_deref(),
                    });
                    self.current = Some(Cell {
                        name,
                        label,
                        lines: Vec::new(),
                    });
                    return Ok(());
                }
                Glyph::Link => cell_line.links_to = Some(name),
                Glyph::Define => {
                    let description = lexer::rest(&words, i + 1);
                    let item = self
                        .story
                        .items
                        .define_item(name, description)
                        .map_err(|source| CompileError::Inventory {
                            line: number,
                            source,
                        })?;
                    self.observer.on_compile(&CompileEvent::ItemDefined {
                        line: number,
                        name: &item.name,
                        bit_index: item.bit_index,
                    });
                    return Ok(());
                }
                Glyph::Require => cell_line.require.push(name),
                Glyph::Forbid => cell_line.forbid.push(name),
                Glyph::Give => {
                    cell_line.give = Some(name);
                    cell_line.text = lexer::rest(&words, i + 1);
                    break;
                }
                Glyph::Take => {
                    cell_line.take = Some(name);
                    cell_line.text = lexer::rest(&words, i + 1);
                    break;
                }
                Glyph::Unknown(_) => {
                    return Err(CompileError::UnexpectedGlyph {
                        line: number,
                        word: word.to_string(),
                    });
                }
            }
        }

        match self.current.as_mut() {
            Some(cell) => {
                cell.lines.push(cell_line);
                self.observer.on_compile(&CompileEvent::LineAppended {
                    line: number,
                    cell: &cell.name,
                });
            }
            None => self.orphans += 1,
        }
        Ok(())
    }

    /// Commit the open cell, if there is one.
    fn close_cell(&mut self) {
        if self.orphans > 0 {
            self.emit(CompileEvent::OrphanLinesDropped {
                count: self.orphans,
            });
            self.orphans = 0;
        }

        let Some(cell) = self.current.take() else {
            return;
        };
        self.emit(CompileEvent::CellCommitted {
            name: &cell.name,
            ident: cell.ident(),
            lines: cell.lines.len(),
        });
        self.story.insert_cell(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::Recorder;
    use abventure_rules::{hash, InventoryState};

    #[test]
    fn test_title_and_cells() {
        let story = compile("Test Story\n:start A start cell\n>end go on\n:end An ending\nThe end.").unwrap();

        assert_eq!(story.title, "Test Story");
        assert_eq!(story.cell_count(), 2);

        let start = story.cell_named("start").unwrap();
        assert_eq!(start.label.as_deref(), Some("A start cell"));
        assert_eq!(start.lines.len(), 1);
        assert_eq!(start.lines[0].links_to.as_deref(), Some("end"));
        assert_eq!(start.lines[0].text, "go on");

        let end = story.cell(hash("end")).unwrap();
        assert_eq!(end.lines, vec![Line::text("The end.")]);
    }

    #[test]
    fn test_directive_composition() {
        let story = compile("T\n:room\n?lamp ?key !curse >vault Open the vault").unwrap();
        let line = &story.cell_named("room").unwrap().lines[0];

        assert_eq!(line.require, vec!["lamp", "key"]);
        assert_eq!(line.forbid, vec!["curse"]);
        assert_eq!(line.links_to.as_deref(), Some("vault"));
        assert_eq!(line.text, "Open the vault");
    }

    #[test]
    fn test_give_and_take_are_terminal() {
        let story = compile("T\n:room\n?lamp &key ?ignored Got it\n@key >door Lost it").unwrap();
        let lines = &story.cell_named("room").unwrap().lines;

        assert_eq!(lines[0].require, vec!["lamp"]);
        assert_eq!(lines[0].give.as_deref(), Some("key"));
        assert_eq!(lines[0].text, "?ignored Got it");

        assert_eq!(lines[1].take.as_deref(), Some("key"));
        assert_eq!(lines[1].links_to, None);
        assert_eq!(lines[1].text, ">door Lost it");
    }

    #[test]
    fn test_item_definitions() {
        let story = compile("T\n%lamp A lamp\n:room\n%key A key\n%lamp A better lamp\nText").unwrap();

        assert_eq!(story.items.len(), 2);
        assert_eq!(story.items.lookup("lamp").unwrap().id(), 1);
        assert_eq!(story.items.describe("lamp"), Some("A better lamp"));
        assert_eq!(story.items.lookup("key").unwrap().id(), 2);
        // Definitions produce no lines.
        assert_eq!(story.cell_named("room").unwrap().lines.len(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let story = compile("# header comment\n\nMy Story # titled\n:room # cell\n  \nHello # there\n").unwrap();

        assert_eq!(story.title, "My Story");
        let room = story.cell_named("room").unwrap();
        assert_eq!(room.label, None);
        assert_eq!(room.lines, vec![Line::text("Hello")]);
    }

    #[test]
    fn test_directive_first_line_means_no_title() {
        let story = compile("%key A brass key\n:start\nPlain text").unwrap();
        assert_eq!(story.title, "");
        assert_eq!(story.cell_named("start").unwrap().lines[0].text, "Plain text");
    }

    #[test]
    fn test_lines_before_first_cell_are_dropped() {
        let story = compile("T\nloose line\n>nowhere another\n:room\nkept").unwrap();
        assert_eq!(story.cell_count(), 1);
        assert_eq!(story.cell_named("room").unwrap().lines.len(), 1);
    }

    #[test]
    fn test_reopened_cell_replaces_earlier() {
        let story = compile("T\n:room\nfirst\n:other\n:room Again\nsecond").unwrap();
        let room = story.cell_named("room").unwrap();
        assert_eq!(room.label.as_deref(), Some("Again"));
        assert_eq!(room.lines, vec![Line::text("second")]);
        assert_eq!(story.cell_count(), 2);
    }

    #[test]
    fn test_unexpected_glyph() {
        let err = compile("T\n:room\nfine\n?key ^coin nope").unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedGlyph { line: 4, ref word } if word == "^coin"));
        assert_eq!(err.line(), Some(4));
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_glyph_after_text_is_text() {
        let story = compile("T\n:room\nPay $coin now").unwrap();
        assert_eq!(story.cell_named("room").unwrap().lines[0].text, "Pay $coin now");
    }

    #[test]
    fn test_prose_symbols_are_not_directives() {
        let story = compile("$5 Heist\n:Start\n+1 to strength\n*sigh Fine.").unwrap();
        assert_eq!(story.title, "$5 Heist");

        let lines = &story.start_cell().unwrap().lines;
        assert_eq!(lines[0].text, "+1 to strength");
        assert_eq!(lines[1].text, "*sigh Fine.");
    }

    #[test]
    fn test_too_many_items() {
        let mut source = String::from("T\n");
        for n in 0..65 {
            source.push_str(&format!("%item{n} Item {n}\n"));
        }
        let err = compile(&source).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Inventory {
                line: 66,
                source: RulesError::RegistryFull { .. }
            }
        ));
    }

    #[test]
    fn test_compile_is_repeatable() {
        let source = "Title\n%key A key\n:Start Hello\n&key Take it\n?key >next Onwards\n:next";
        let a = compile(source).unwrap();
        let b = compile(source).unwrap();
        assert!(a.same_content(&b));
        assert!(a.start_cell().is_some());
    }

    #[test]
    fn test_compile_file() {
        let path = std::env::temp_dir().join(format!("abventure-compile-{}.abv", std::process::id()));
        std::fs::write(&path, "From Disk\n:Start\nHello").unwrap();

        let story = compile_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(story.title, "From Disk");

        let missing = compile_file(&path).unwrap_err();
        assert!(matches!(missing, CompileError::Io { .. }));
        assert_eq!(missing.line(), None);
    }

    #[test]
    fn test_observer_sees_compile() {
        let recorder = Recorder::default();
        let story = Compiler::new()
            .with_observer(&recorder)
            .compile("T\norphan\n%key K\n:room\nline")
            .unwrap();
        assert_eq!(story.items.add_item(InventoryState::EMPTY, "key"), Some(InventoryState(1)));

        let events = recorder.events.borrow();
        assert!(events[0].starts_with("TitleFound"));
        assert!(events.iter().any(|e| e.starts_with("OrphanLinesDropped { count: 1 }")));
        assert!(events.iter().any(|e| e.starts_with("ItemDefined")));
        assert!(events.last().unwrap().starts_with("CellCommitted"));
    }
}
