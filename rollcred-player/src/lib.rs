//! rollcred Player Library
//!
//! This library plays a parsed credits [`Sequence`](rollcred_core::Sequence)
//! frame by frame: one block at a time, with fades, scrolling, background
//! layers and user skips.

pub mod background;
pub mod playback;
pub mod sequencer;
pub mod skip;

pub use background::{BackgroundLayer, BackgroundStack};
pub use playback::{Phase, PlaybackState};
pub use sequencer::{
    ActiveBlock, BlockDrawable, EndReason, PlacedLine, SequenceEvent, Sequencer, SequencerState,
};
pub use skip::{InputEvent, InputSnapshot, SkipAction, SkipController};

/// Result type for rollcred-player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rollcred-player operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("rollcred core error: {0}")]
    Core(#[from] rollcred_core::Error),

    #[error("Sequencer already started")]
    AlreadyStarted,

    #[error("Sequence already finished")]
    AlreadyFinished,
}
