//! Block data structures for credit scripts

use std::fmt;

/// Horizontal alignment of every line in a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parses an alignment token, case-insensitively. Unknown tokens fall back to left.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a block starts vertically when it becomes active
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VerticalAnchor {
    /// No anchor given, the block starts at the top of the viewport
    #[default]
    Unspecified,
    /// Explicit pixel offset from the top of the viewport
    Pixel(f32),
    /// Just below the bottom edge of the viewport
    OffBottom,
    /// Just above the top edge (depends on the block's own height)
    OffTop,
}

impl VerticalAnchor {
    pub const OFF_BOTTOM: &'static str = "offbot";
    pub const OFF_TOP: &'static str = "offtop";

    /// Parses the anchor field. Returns `None` when the field is neither a
    /// number nor one of the symbolic anchors.
    pub fn from_field(field: &str) -> Option<Self> {
        let field = field.trim();
        if field.is_empty() {
            return Some(VerticalAnchor::Unspecified);
        }
        if let Ok(value) = field.parse::<f32>() {
            if value.is_finite() && value != 0.0 {
                return Some(VerticalAnchor::Pixel(value));
            }
            return Some(VerticalAnchor::Unspecified);
        }

        let lower = field.to_ascii_lowercase();
        if lower.contains(Self::OFF_BOTTOM) {
            Some(VerticalAnchor::OffBottom)
        } else if lower.contains(Self::OFF_TOP) {
            Some(VerticalAnchor::OffTop)
        } else {
            None
        }
    }
}

impl fmt::Display for VerticalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalAnchor::Unspecified => Ok(()),
            VerticalAnchor::Pixel(value) => write!(f, "{}", value),
            VerticalAnchor::OffBottom => f.write_str(Self::OFF_BOTTOM),
            VerticalAnchor::OffTop => f.write_str(Self::OFF_TOP),
        }
    }
}

/// The seven positional fields of a `<block:...>` tag
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockParams {
    /// Display duration in frames; negative means "auto"
    pub duration: i32,
    /// Pixels per frame; negative scrolls up, positive scrolls down
    pub scroll_speed: f32,
    /// Opacity added per frame while the hold countdown runs
    pub fade_in: u8,
    /// Opacity removed per frame once the hold countdown is over
    pub fade_out: u8,
    /// Initial vertical position
    pub anchor: VerticalAnchor,
    /// Horizontal alignment of the lines
    pub alignment: Alignment,
    /// Background image id named by this block (case preserved)
    pub background: Option<String>,
}

impl BlockParams {
    /// Returns true when the duration must be derived from layout
    pub fn is_auto_duration(&self) -> bool {
        self.duration < 0
    }
}

impl fmt::Display for BlockParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<block:{},{},{},{},{},{}",
            self.duration, self.scroll_speed, self.fade_in, self.fade_out, self.anchor, self.alignment
        )?;
        if let Some(background) = &self.background {
            write!(f, ",{}", background)?;
        }
        f.write_str(">")
    }
}

/// A single block of credits text as it appears in the script
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// Position of the block in document order
    pub index: usize,
    /// Parsed tag fields
    pub params: BlockParams,
    /// Raw lines, with the opening tag line at index 0
    pub lines: Vec<String>,
    /// False when the script ended (or a new block opened) before `</block>`
    pub terminated: bool,
    /// Background in effect for this block: its own, or the nearest earlier one
    pub resolved_background: Option<String>,
}

impl Block {
    /// The opening tag line, if any was recorded
    pub fn tag_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    /// Lines that are rendered, i.e. everything after the tag line
    pub fn content_lines(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }

    /// Unterminated blocks are degenerate and skipped during playback
    pub fn is_playable(&self) -> bool {
        self.terminated
    }
}
