//! Line cleanup and directive recognition.

/// Characters trimmed from both ends of every line and text run.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\u{0B}', '\u{0C}', '\r', '\u{85}', '\u{A0}'];

/// Glyphs that make a word directive-shaped. Only some are meaningful; the
/// rest are reserved and rejected by the compiler.
const RESERVED_GLYPHS: &[char] = &[
    '!', '%', '&', '/', ':', '<', '=', '>', '?', '@', '\\', '^', '|', '~',
];

/// What a directive glyph asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// `:` open a cell
    Cell,
    /// `>` link to a cell
    Link,
    /// `%` define an item
    Define,
    /// `?` require an item
    Require,
    /// `!` forbid an item
    Forbid,
    /// `&` give an item
    Give,
    /// `@` take an item
    Take,
    /// Any other reserved glyph.
    Unknown(char),
}

impl Glyph {
    fn from_char(c: char) -> Self {
        match c {
            ':' => Glyph::Cell,
            '>' => Glyph::Link,
            '%' => Glyph::Define,
            '?' => Glyph::Require,
            '!' => Glyph::Forbid,
            '&' => Glyph::Give,
            '@' => Glyph::Take,
            other => Glyph::Unknown(other),
        }
    }
}

/// A directive-shaped word: glyph plus the identifier that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub glyph: Glyph,
    pub name: &'a str,
}

/// Drop a trailing `#` comment, then trim the line.
pub fn clean_line(line: &str) -> &str {
    let line = match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    };
    trim(line)
}

pub fn trim(text: &str) -> &str {
    text.trim_matches(TRIM_CHARS)
}

/// Split a cleaned line into words on single spaces.
///
/// Runs of spaces produce empty words so rejoined text keeps its spacing.
pub fn words(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

/// Rejoin the words from `from` onwards into trimmed text.
pub fn rest(words: &[&str], from: usize) -> String {
    words
        .get(from..)
        .map(|tail| trim(&tail.join(" ")).to_string())
        .unwrap_or_default()
}

/// Recognize a directive-shaped word.
pub fn directive(word: &str) -> Option<Directive<'_>> {
    let mut chars = word.chars();
    let glyph = chars.next().filter(|c| RESERVED_GLYPHS.contains(c))?;
    let name = chars.as_str();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    Some(Directive {
        glyph: Glyph::from_char(glyph),
        name,
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
