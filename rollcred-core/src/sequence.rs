//! The ordered list of blocks played by a credits session

use crate::parser::{parse, ParseIssue, ParseOptions};
use crate::{Block, Error, Result};
use std::io::Read;

/// Parsed blocks plus the playback cursor
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    blocks: Vec<Block>,
    cursor: usize,
    issues: Vec<ParseIssue>,
}

impl Sequence {
    /// Creates a sequence positioned at the first block
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            cursor: 0,
            issues: Vec::new(),
        }
    }

    /// Parses a script into a sequence, keeping the parse diagnostics
    pub fn parse(text: &str, options: &ParseOptions) -> Self {
        let script = parse(text, options);
        Self {
            blocks: script.blocks,
            cursor: 0,
            issues: script.issues,
        }
    }

    /// Reads a whole script from a reader and parses it
    pub fn read<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::InvalidEncoding)?;
        Ok(Self::parse(&text, options))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the active block
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Block under the cursor, `None` once the sequence is exhausted
    pub fn current(&self) -> Option<&Block> {
        self.blocks.get(self.cursor)
    }

    /// Moves the cursor forward and returns the new current block
    pub fn advance(&mut self) -> Option<&Block> {
        if self.cursor < self.blocks.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// True once the cursor is past the last block
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.blocks.len()
    }
}
