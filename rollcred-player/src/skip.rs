//! Skip controller: maps user input onto sequencer transitions

use crate::sequencer::Sequencer;
use rollcred_core::{PlaybackConfig, TextMetrics};

/// A single press, already edge-detected by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Cancel / back button
    Cancel,
    /// Confirm / ok button
    Confirm,
    /// Mouse click or touch
    Pointer,
}

/// Level state of the inputs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub cancel: bool,
    pub confirm: bool,
    pub pointer: bool,
}

/// What the controller did with this frame's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipAction {
    None,
    /// The whole sequence was cancelled
    Cancelled,
    /// The active block's hold was ended
    Advanced,
}

#[derive(Debug, Clone, Default)]
pub struct SkipController {
    skippable: bool,
    block_skippable: bool,
    previous: InputSnapshot,
}

impl SkipController {
    pub fn new(skippable: bool, block_skippable: bool) -> Self {
        Self {
            skippable,
            block_skippable,
            previous: InputSnapshot::default(),
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.skippable, config.block_skippable)
    }

    /// Applies this frame's presses. Cancel takes priority over advance.
    pub fn handle<M: TextMetrics>(
        &self,
        events: &[InputEvent],
        sequencer: &mut Sequencer<M>,
    ) -> SkipAction {
        let cancel = events.contains(&InputEvent::Cancel);
        let advance = events
            .iter()
            .any(|event| matches!(event, InputEvent::Confirm | InputEvent::Pointer));
        self.apply(cancel, advance, sequencer)
    }

    /// Applies a level snapshot, acting only on buttons that went down since
    /// the previous frame
    pub fn update<M: TextMetrics>(
        &mut self,
        snapshot: InputSnapshot,
        sequencer: &mut Sequencer<M>,
    ) -> SkipAction {
        let previous = std::mem::replace(&mut self.previous, snapshot);
        let cancel = snapshot.cancel && !previous.cancel;
        let advance = (snapshot.confirm && !previous.confirm) || (snapshot.pointer && !previous.pointer);
        self.apply(cancel, advance, sequencer)
    }

    fn apply<M: TextMetrics>(
        &self,
        cancel: bool,
        advance: bool,
        sequencer: &mut Sequencer<M>,
    ) -> SkipAction {
        if cancel && self.skippable {
            if sequencer.notify_cancel() {
                return SkipAction::Cancelled;
            }
        } else if advance && self.block_skippable && sequencer.notify_advance() {
            return SkipAction::Advanced;
        }
        SkipAction::None
    }
}
