//! Fixed-pitch text metrics for headless playback

use rollcred_core::{TextMetrics, TextSize};
use std::borrow::Cow;

/// Characters that form a one-character control escape, e.g. `\{` or `\|`
const SYMBOL_ESCAPES: &[char] = &['{', '}', '.', '|', '!', '>', '<', '^', '$'];

/// Every character is `char_width` wide; every line is `line_height` tall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl MonospaceMetrics {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    /// Drops `\X[...]` style codes and one-character controls, and turns
    /// `\\` into a literal backslash
    fn resolve_escapes<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('\\') {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                Some(next) if SYMBOL_ESCAPES.contains(&next) => {
                    chars.next();
                }
                Some(next) if next.is_ascii_alphabetic() => {
                    while chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                        chars.next();
                    }
                    if chars.peek() == Some(&'[') {
                        for c in chars.by_ref() {
                            if c == ']' {
                                break;
                            }
                        }
                    }
                }
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    }

    fn measure(&self, text: &str) -> TextSize {
        TextSize::new(text.chars().count() as f32 * self.char_width, self.line_height)
    }
}
