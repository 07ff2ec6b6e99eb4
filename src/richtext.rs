//! Inline markup used in resume cell text.
//!
//! Row text produced by [`crate::rows`] carries a small markdown-like syntax that the renderer
//! turns into [`genpdf`] styled strings:
//!
//! - `**bold**` for bold text
//! - a backslash makes the next character literal, e.g. `\*`
//!
//! User-supplied values are passed through [`escape_markup`] before being wrapped in markup, so a
//! company called `A*B` never opens a span by accident.

use std::fmt;

use genpdf::style::{Style, StyledString};

/// Characters with a meaning in the markup syntax. Brackets and braces are reserved.
const SPECIAL_CHARACTERS: &[char] = &['\\', '*', '[', ']', '{', '}'];

const BOLD_MARKER: &str = "**";

/// A run of text sharing one inline style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
}

impl Span {
    /// Creates a plain span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Returns the text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Converts the span to a [`StyledString`], layering its inline style over `base`.
    pub fn to_styled_string(&self, base: Style) -> StyledString {
        let mut style = base;
        if self.bold {
            style.set_bold();
        }
        StyledString::new(self.text.clone(), style)
    }
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the input where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

/// Escapes every markup character in `text` so it renders literally.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if SPECIAL_CHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Parses markup into a flat list of [`Span`]s.
///
/// Adjacent text with the same style is merged into one span. An unterminated bold marker, an
/// unescaped reserved character or a trailing backslash is reported with its byte position.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let mut spans: Vec<Span> = Vec::new();
    let mut buffer = String::new();
    let mut bold = false;
    let mut bold_start = 0;
    let mut chars = input.char_indices();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(ParseError::new(index, "dangling escape at end of input"));
                };
                buffer.push(escaped);
            }
            '*' if input[index..].starts_with(BOLD_MARKER) => {
                chars.next();
                push_span(&mut spans, &mut buffer, bold);
                bold = !bold;
                bold_start = index;
            }
            '*' | '[' | ']' | '{' | '}' => {
                return Err(ParseError::new(
                    index,
                    format!("unescaped `{ch}`; only `**bold**` is supported"),
                ));
            }
            _ => buffer.push(ch),
        }
    }

    if bold {
        return Err(ParseError::new(bold_start, "unterminated bold span"));
    }
    push_span(&mut spans, &mut buffer, bold);
    Ok(spans)
}

fn push_span(spans: &mut Vec<Span>, buffer: &mut String, bold: bool) {
    if buffer.is_empty() {
        return;
    }
    let text = std::mem::take(buffer);
    match spans.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(&text),
        _ => spans.push(Span { text, bold }),
    }
}
