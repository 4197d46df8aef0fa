//! Per-block playback state

use rollcred_core::{BlockParams, Hold};

/// Where a block is in its fade cycle. Informational: opacity and the hold
/// countdown are what actually drive playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FadingIn,
    Holding,
    FadingOut,
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::FadingIn => "fading-in",
            Phase::Holding => "holding",
            Phase::FadingOut => "fading-out",
            Phase::Complete => "complete",
        }
    }
}

/// Mutable state of the active block
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    opacity: u8,
    hold: Hold,
    position_y: f32,
    phase: Phase,
    fade_in: u8,
    fade_out: u8,
    scroll_speed: f32,
}

impl PlaybackState {
    /// Creates the state for a block about to appear at `initial_y`
    pub fn new(params: &BlockParams, hold: Hold, initial_y: f32) -> Self {
        Self {
            opacity: 0,
            hold,
            position_y: initial_y,
            phase: Phase::FadingIn,
            fade_in: params.fade_in,
            // A zero rate would never reach Complete
            fade_out: params.fade_out.max(1),
            scroll_speed: params.scroll_speed,
        }
    }

    /// Advances one frame
    pub fn tick(&mut self) {
        if self.phase == Phase::Complete {
            return;
        }

        if self.hold.is_running() {
            self.opacity = self.opacity.saturating_add(self.fade_in);
            self.hold.step();
            self.phase = if self.opacity == u8::MAX {
                Phase::Holding
            } else {
                Phase::FadingIn
            };
        } else if self.opacity <= self.fade_out {
            self.opacity = 0;
            self.phase = Phase::Complete;
        } else {
            self.opacity -= self.fade_out;
            self.phase = Phase::FadingOut;
        }

        self.position_y += self.scroll_speed;
    }

    /// Ends the hold now; the next tick starts fading out
    pub fn end_hold(&mut self) {
        self.hold = Hold::Frames(0);
        if self.phase != Phase::Complete {
            self.phase = Phase::FadingOut;
        }
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn hold(&self) -> Hold {
        self.hold
    }

    pub fn position_y(&self) -> f32 {
        self.position_y
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}
