//! Script preprocessing: line-comment stripping and quote-aware statement splitting.

use std::str::CharIndices;

/// Marker that starts a line comment.
pub const COMMENT_MARKER: &str = "--";

/// Remove every `--` comment up to the end of its line.
///
/// Line breaks (`\n` and `\r\n`) are kept so line numbers stay stable. The
/// scan is not quote-aware: a `--` inside a string literal is still cut.
pub fn strip_line_comments(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    for line in script.split_inclusive('\n') {
        match line.find(COMMENT_MARKER) {
            Some(pos) => {
                out.push_str(&line[..pos]);
                if line.ends_with("\r\n") {
                    out.push_str("\r\n");
                } else if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Quoting context of the splitter at the current scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteState {
    #[default]
    Unquoted,
    InSingleQuote,
    InDoubleQuote,
}

impl QuoteState {
    /// Transition on a quote character. A quote of the other kind inside an
    /// open literal is plain content and leaves the state unchanged.
    ///
    /// There is no escape handling: `''` closes and immediately reopens.
    pub fn on_quote(self, quote: char) -> Self {
        match (self, quote) {
            (Self::Unquoted, '\'') => Self::InSingleQuote,
            (Self::InSingleQuote, '\'') => Self::Unquoted,
            (Self::Unquoted, '"') => Self::InDoubleQuote,
            (Self::InDoubleQuote, '"') => Self::Unquoted,
            (state, _) => state,
        }
    }

    pub fn is_quoted(self) -> bool {
        self != Self::Unquoted
    }
}

/// Lazy iterator over the statements of a script.
///
/// Yields trimmed, non-empty slices of the input in order of appearance.
/// Statements are separated by semicolons outside of quotes; the separator
/// itself is not part of the statement.
#[derive(Debug, Clone)]
pub struct Statements<'a> {
    script: &'a str,
    chars: CharIndices<'a>,
    state: QuoteState,
    start: usize,
    finished: bool,
}

impl<'a> Statements<'a> {
    pub fn new(script: &'a str) -> Self {
        Self {
            script,
            chars: script.char_indices(),
            state: QuoteState::Unquoted,
            start: 0,
            finished: false,
        }
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.finished {
            return None;
        }
        let script = self.script;
        for (idx, c) in self.chars.by_ref() {
            match c {
                '\'' | '"' => self.state = self.state.on_quote(c),
                ';' if !self.state.is_quoted() => {
                    let segment = script[self.start..idx].trim();
                    self.start = idx + 1;
                    if !segment.is_empty() {
                        return Some(segment);
                    }
                }
                _ => {}
            }
        }
        self.finished = true;
        let tail = script[self.start..].trim();
        (!tail.is_empty()).then_some(tail)
    }
}

impl std::iter::FusedIterator for Statements<'_> {}

/// Split an already comment-stripped script into owned statements.
pub fn split_statements(script: &str) -> Vec<String> {
    Statements::new(script).map(str::to_owned).collect()
}

/// Strip comments, then split. The order matters: see [`strip_line_comments`].
pub fn parse_script(script: &str) -> Vec<String> {
    split_statements(&strip_line_comments(script))
}
