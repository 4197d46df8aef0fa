//! rollcred Core Library
//!
//! This library provides the credits script format (tagged text blocks), the
//! block layout engine and the auto-timing rules used by the playback
//! sequencer.

pub mod block;
pub mod config;
pub mod layout;
pub mod parser;
pub mod sequence;
pub mod timing;

pub use block::{Alignment, Block, BlockParams, VerticalAnchor};
pub use config::PlaybackConfig;
pub use layout::{layout, resolve_anchor, BlockLayout, TextMetrics, TextSize};
pub use parser::{parse, ParseIssue, ParseOptions, ParsedScript};
pub use sequence::Sequence;
pub use timing::{resolve_duration, Hold};

/// Result type for rollcred-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rollcred-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Script is not valid UTF-8")]
    InvalidEncoding,

    #[error("Invalid viewport size: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
