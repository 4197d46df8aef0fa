//! Frame-driven credits sequencer

use crate::background::{BackgroundLayer, BackgroundStack};
use crate::playback::{Phase, PlaybackState};
use crate::{Error, Result};
use rollcred_core::{
    layout, resolve_anchor, resolve_duration, BlockLayout, Hold, PlaybackConfig, Sequence,
    TextMetrics,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Why a sequence reached its terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every block was played
    Completed,
    /// Cancel-all was triggered
    Cancelled,
}

/// Lifecycle of the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No sequence yet; ticks do nothing
    Waiting,
    Playing,
    Finished(EndReason),
}

/// Notifications for the presentation host, returned by [`Sequencer::tick`]
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    /// A block became active and its drawable should be attached
    BlockStarted { index: usize, hold: Hold },
    /// A block requested a background image
    BackgroundAdded { index: usize, image_id: String },
    /// The block's drawable should be detached
    BlockDismissed { index: usize },
    /// A degenerate block was passed over without playing
    BlockSkipped { index: usize },
    /// Emitted exactly once
    Finished(EndReason),
}

impl fmt::Display for SequenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceEvent::BlockStarted { index, hold } => match hold {
                Hold::Frames(frames) => write!(f, "block {} started ({} frames)", index, frames),
                Hold::Indefinite => write!(f, "block {} started (until skipped)", index),
            },
            SequenceEvent::BackgroundAdded { index, image_id } => {
                write!(f, "block {} background {}", index, image_id)
            }
            SequenceEvent::BlockDismissed { index } => write!(f, "block {} dismissed", index),
            SequenceEvent::BlockSkipped { index } => write!(f, "block {} skipped", index),
            SequenceEvent::Finished(EndReason::Completed) => f.write_str("finished"),
            SequenceEvent::Finished(EndReason::Cancelled) => f.write_str("cancelled"),
        }
    }
}

/// The block currently on screen
#[derive(Debug, Clone)]
pub struct ActiveBlock {
    index: usize,
    layout: BlockLayout,
    state: PlaybackState,
}

impl ActiveBlock {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }
}

/// A content line positioned in viewport coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything a host needs to draw the active block for this frame
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDrawable<'a> {
    pub index: usize,
    pub top: f32,
    pub height: f32,
    pub opacity: u8,
    pub phase: Phase,
    pub lines: Vec<PlacedLine<'a>>,
}

/// Plays a [`Sequence`] one block at a time, one tick per rendered frame
pub struct Sequencer<M> {
    config: PlaybackConfig,
    metrics: M,
    sequence: Option<Sequence>,
    state: SequencerState,
    active: Option<ActiveBlock>,
    backgrounds: BackgroundStack,
    events: Vec<SequenceEvent>,
    frame: u64,
    on_finish: Option<Box<dyn FnMut(EndReason)>>,
    finish_notified: bool,
}

impl<M: TextMetrics> Sequencer<M> {
    /// Creates a sequencer waiting for its sequence
    pub fn new(config: PlaybackConfig, metrics: M) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics,
            sequence: None,
            state: SequencerState::Waiting,
            active: None,
            backgrounds: BackgroundStack::new(),
            events: Vec::new(),
            frame: 0,
            on_finish: None,
            finish_notified: false,
        })
    }

    /// Registers the completion callback. The end reason is reported once per
    /// sequencer: a callback registered after the end runs immediately only if
    /// no callback has been told yet.
    pub fn on_finish<F>(&mut self, callback: F)
    where
        F: FnMut(EndReason) + 'static,
    {
        self.on_finish = Some(Box::new(callback));
        if let SequencerState::Finished(reason) = self.state {
            self.notify_finish(reason);
        }
    }

    /// Hands the parsed sequence over and activates its current block
    pub fn start(&mut self, sequence: Sequence) -> Result<()> {
        match self.state {
            SequencerState::Waiting => {}
            SequencerState::Playing => return Err(Error::AlreadyStarted),
            SequencerState::Finished(_) => return Err(Error::AlreadyFinished),
        }

        info!(blocks = sequence.len(), "starting credits sequence");
        self.sequence = Some(sequence);
        self.state = SequencerState::Playing;
        self.activate_current();
        Ok(())
    }

    /// Advances playback by one frame and returns what happened
    pub fn tick(&mut self) -> Vec<SequenceEvent> {
        if self.state != SequencerState::Playing {
            return self.take_events();
        }

        self.frame += 1;
        self.backgrounds.tick(self.config.background_fade_rate);

        let Some(active) = self.active.as_mut() else {
            debug_assert!(false, "playing without an active block");
            self.finish(EndReason::Completed);
            return self.take_events();
        };

        active.state.tick();
        if active.state.is_complete() {
            self.dismiss_active();
            if let Some(sequence) = self.sequence.as_mut() {
                sequence.advance();
            }
            self.activate_current();
        }

        self.take_events()
    }

    /// Ends the whole sequence now. Returns false if it had already ended.
    pub fn notify_cancel(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.finish(EndReason::Cancelled);
        true
    }

    /// Ends the active block's hold; fading out starts on the next tick.
    /// Returns false when there is no block to advance.
    pub fn notify_advance(&mut self) -> bool {
        match self.active.as_mut() {
            Some(active) if !active.state.is_complete() => {
                active.state.end_hold();
                debug!(index = active.index, "block hold ended early");
                true
            }
            _ => false,
        }
    }

    /// Drains events queued outside of [`tick`](Self::tick), e.g. by `start` or a cancel
    pub fn take_events(&mut self) -> Vec<SequenceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SequencerState::Finished(_))
    }

    /// Number of ticks played so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    pub fn active(&self) -> Option<&ActiveBlock> {
        self.active.as_ref()
    }

    pub fn backgrounds(&self) -> &[BackgroundLayer] {
        self.backgrounds.layers()
    }

    /// Topmost background layer
    pub fn background(&self) -> Option<&BackgroundLayer> {
        self.backgrounds.current()
    }

    /// Positions the active block's lines for the current frame
    pub fn drawable(&self) -> Option<BlockDrawable<'_>> {
        let active = self.active.as_ref()?;
        let block = self.sequence.as_ref()?.blocks().get(active.index)?;
        let layout = &active.layout;
        let top = active.state.position_y();

        let lines = block
            .content_lines()
            .iter()
            .zip(layout.line_tops())
            .zip(
                layout
                    .line_offsets
                    .iter()
                    .zip(&layout.line_widths)
                    .zip(&layout.line_heights),
            )
            .map(|((text, line_top), ((x, width), height))| PlacedLine {
                text: text.as_str(),
                x: *x,
                y: top + line_top,
                width: *width,
                height: *height,
            })
            .collect();

        Some(BlockDrawable {
            index: active.index,
            top,
            height: layout.total_height,
            opacity: active.state.opacity(),
            phase: active.state.phase(),
            lines,
        })
    }

    /// Activates the block under the cursor, passing over degenerate blocks.
    /// Finishes the sequence when no block is left.
    fn activate_current(&mut self) {
        if let Some(sequence) = self.sequence.as_mut() {
            while let Some(block) = sequence.current() {
                let index = block.index;
                if !block.is_playable() {
                    warn!(index, "skipping unterminated block");
                    self.events.push(SequenceEvent::BlockSkipped { index });
                    sequence.advance();
                    continue;
                }

                let block_layout = layout(block, &self.metrics, &self.config);
                let initial_y = resolve_anchor(block.params.anchor, &block_layout, &self.config);
                let hold = resolve_duration(&block.params, block_layout.total_height, initial_y);

                if let Some(image_id) = &block.params.background {
                    self.backgrounds.push(image_id.clone(), index);
                    self.events.push(SequenceEvent::BackgroundAdded {
                        index,
                        image_id: image_id.clone(),
                    });
                }

                debug!(
                    index,
                    ?hold,
                    initial_y,
                    height = block_layout.total_height,
                    "block started"
                );
                self.active = Some(ActiveBlock {
                    index,
                    state: PlaybackState::new(&block.params, hold, initial_y),
                    layout: block_layout,
                });
                self.events.push(SequenceEvent::BlockStarted { index, hold });
                return;
            }
        }

        self.finish(EndReason::Completed);
    }

    fn dismiss_active(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(index = active.index, "block dismissed");
            self.events.push(SequenceEvent::BlockDismissed {
                index: active.index,
            });
        }
    }

    fn finish(&mut self, reason: EndReason) {
        if self.is_finished() {
            return;
        }

        self.dismiss_active();
        self.state = SequencerState::Finished(reason);
        info!(?reason, frames = self.frame, "credits sequence finished");
        self.events.push(SequenceEvent::Finished(reason));
        self.notify_finish(reason);
    }

    fn notify_finish(&mut self, reason: EndReason) {
        if self.finish_notified {
            return;
        }
        if let Some(callback) = self.on_finish.as_mut() {
            callback(reason);
            self.finish_notified = true;
        }
    }
}
