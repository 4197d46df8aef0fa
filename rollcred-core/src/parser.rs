//! Credits script parser
//!
//! A script is plain text with any number of sections of the form
//!
//! ```text
//! <block:duration,scroll,fadeIn,fadeOut,ypos,align,image>
//! text lines
//! </block>
//! ```
//!
//! Anything outside a section is ignored. Parsing never fails: malformed
//! fields fall back to defaults and are reported as [`ParseIssue`]s.

use crate::block::{Alignment, Block, BlockParams, VerticalAnchor};
use tracing::warn;

const OPEN_TAG: &str = "<block:";
const CLOSE_TAG: &str = "</block>";

/// Placeholder replaced with the caller's version string before scanning
pub const DEFAULT_VERSION_TOKEN: &str = "<VERSION>";

const FIELD_NAMES: [&str; 7] = [
    "duration",
    "scroll",
    "fade_in",
    "fade_out",
    "ypos",
    "align",
    "image",
];

/// Options applied before the script is scanned
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Token searched for in the raw text
    pub version_token: String,
    /// Replacement for `version_token`; no substitution when `None`
    pub version: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            version_token: DEFAULT_VERSION_TOKEN.to_string(),
            version: None,
        }
    }
}

impl ParseOptions {
    /// Options that substitute `version` for the default token
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }
}

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseIssue {
    #[error("block {block} opened on line {line} is never closed")]
    UnterminatedBlock { block: usize, line: usize },

    #[error("block {block}: malformed {field} field {value:?}, using default")]
    MalformedField {
        block: usize,
        field: &'static str,
        value: String,
    },
}

/// Output of [`parse`]: the blocks in document order plus any diagnostics
#[derive(Debug, Clone, Default)]
pub struct ParsedScript {
    pub blocks: Vec<Block>,
    pub issues: Vec<ParseIssue>,
}

/// Parses a credits script into blocks
#[tracing::instrument(skip_all, fields(len = text.len()))]
pub fn parse(text: &str, options: &ParseOptions) -> ParsedScript {
    let text = match &options.version {
        Some(version) if !options.version_token.is_empty() => {
            std::borrow::Cow::Owned(text.replace(&options.version_token, version))
        }
        _ => std::borrow::Cow::Borrowed(text),
    };

    let mut script = ParsedScript::default();
    // Open block: (lines, line number of the tag)
    let mut open: Option<(Vec<String>, usize)> = None;

    for (line_no, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let lower = line.to_ascii_lowercase();

        if lower.contains(CLOSE_TAG) {
            if let Some((lines, _)) = open.take() {
                push_block(&mut script, lines, true);
            }
        } else if lower.contains(OPEN_TAG) {
            if let Some((lines, opened_at)) = open.take() {
                let block = script.blocks.len();
                script
                    .issues
                    .push(ParseIssue::UnterminatedBlock { block, line: opened_at + 1 });
                push_block(&mut script, lines, false);
            }
            open = Some((vec![line.to_string()], line_no));
        } else if let Some((lines, _)) = open.as_mut() {
            lines.push(line.to_string());
        }
    }

    if let Some((lines, opened_at)) = open.take() {
        let block = script.blocks.len();
        script
            .issues
            .push(ParseIssue::UnterminatedBlock { block, line: opened_at + 1 });
        push_block(&mut script, lines, false);
    }

    for issue in &script.issues {
        warn!("{}", issue);
    }

    script
}

fn push_block(script: &mut ParsedScript, lines: Vec<String>, terminated: bool) {
    let index = script.blocks.len();
    let fields = lines.first().map(|tag| tag_fields(tag)).unwrap_or_default();
    let params = parse_params(index, &fields, &mut script.issues);

    let resolved_background = params.background.clone().or_else(|| {
        script
            .blocks
            .last()
            .and_then(|previous| previous.resolved_background.clone())
    });

    script.blocks.push(Block {
        index,
        params,
        lines,
        terminated,
        resolved_background,
    });
}

/// Extracts the comma separated fields between `<block:` and the last `>`
fn tag_fields(tag_line: &str) -> Vec<String> {
    let lower = tag_line.to_ascii_lowercase();
    let Some(start) = lower.find(OPEN_TAG) else {
        return Vec::new();
    };
    let body = &tag_line[start + OPEN_TAG.len()..];
    let body = match body.rfind('>') {
        Some(end) => &body[..end],
        None => body,
    };
    body.split(',').map(|field| field.trim().to_string()).collect()
}

fn parse_params(block: usize, fields: &[String], issues: &mut Vec<ParseIssue>) -> BlockParams {
    let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");
    let mut number = |i: usize| -> f32 {
        let raw = field(i);
        if raw.is_empty() {
            return 0.0;
        }
        match raw.parse::<f32>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                issues.push(ParseIssue::MalformedField {
                    block,
                    field: FIELD_NAMES[i],
                    value: raw.to_string(),
                });
                0.0
            }
        }
    };

    // Sign first: ceil would turn a small negative into an explicit 0
    let raw_duration = number(0);
    let duration = if raw_duration < 0.0 {
        -1
    } else {
        raw_duration.ceil() as i32
    };
    let scroll_speed = number(1);
    let fade_in = number(2).clamp(0.0, 255.0) as u8;
    let fade_out = number(3).clamp(0.0, 255.0) as u8;

    let anchor = match VerticalAnchor::from_field(field(4)) {
        Some(anchor) => anchor,
        None => {
            issues.push(ParseIssue::MalformedField {
                block,
                field: FIELD_NAMES[4],
                value: field(4).to_string(),
            });
            VerticalAnchor::Unspecified
        }
    };

    let background = Some(field(6)).filter(|id| !id.is_empty()).map(str::to_string);

    BlockParams {
        duration,
        scroll_speed,
        fade_in,
        fade_out,
        anchor,
        alignment: Alignment::from_token(field(5)),
        background,
    }
}
