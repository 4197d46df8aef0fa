//! Hold duration of a block, explicit or derived from its layout

use crate::block::BlockParams;

/// How long a block keeps fading in / holding before it fades out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Hold {
    /// Counts down once per frame
    Frames(u32),
    /// Never runs out on its own; only an advance-block skip ends it
    Indefinite,
}

impl Hold {
    /// True while the block should still fade in / hold
    pub fn is_running(&self) -> bool {
        match self {
            Hold::Frames(frames) => *frames > 0,
            Hold::Indefinite => true,
        }
    }

    /// Consumes one frame of a finite hold
    pub fn step(&mut self) {
        if let Hold::Frames(frames) = self {
            *frames = frames.saturating_sub(1);
        }
    }

    /// Remaining frames, `None` when indefinite
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Hold::Frames(frames) => Some(*frames),
            Hold::Indefinite => None,
        }
    }
}

/// Resolves the hold of a block.
///
/// An explicit (non-negative) duration is used as is. Auto durations are
/// derived from the scroll direction:
///
/// - no scroll: twice the content height
/// - scrolling up: frames until the block has left through the top edge,
///   `ceil((|initial_y| + total_height) / |scroll_speed|)`
/// - scrolling down: indefinite
pub fn resolve_duration(params: &BlockParams, total_height: f32, initial_y: f32) -> Hold {
    if !params.is_auto_duration() {
        return Hold::Frames(params.duration as u32);
    }

    let speed = params.scroll_speed;
    if speed == 0.0 {
        Hold::Frames(frames((2.0 * total_height).ceil()))
    } else if speed < 0.0 {
        let distance = initial_y.abs() + total_height;
        Hold::Frames(frames((distance / speed.abs()).ceil()))
    } else {
        Hold::Indefinite
    }
}

fn frames(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(duration: i32, scroll_speed: f32) -> BlockParams {
        BlockParams {
            duration,
            scroll_speed,
            ..BlockParams::default()
        }
    }

    #[test]
    fn test_explicit_duration() {
        assert_eq!(resolve_duration(&params(90, -3.0), 500.0, 0.0), Hold::Frames(90));
        assert_eq!(resolve_duration(&params(0, 0.0), 500.0, 0.0), Hold::Frames(0));
    }

    #[test]
    fn test_auto_without_scroll_is_twice_height() {
        assert_eq!(resolve_duration(&params(-1, 0.0), 144.0, 0.0), Hold::Frames(288));
        assert_eq!(resolve_duration(&params(-1, 0.0), 10.25, 0.0), Hold::Frames(21));
        assert_eq!(resolve_duration(&params(-1, 0.0), 0.0, 0.0), Hold::Frames(0));
    }

    #[test]
    fn test_auto_scrolling_up() {
        // Starts just below a 624px viewport with 100px of content
        assert_eq!(resolve_duration(&params(-1, -2.0), 100.0, 624.0), Hold::Frames(362));
        assert_eq!(resolve_duration(&params(-1, -2.0), 101.0, 624.0), Hold::Frames(363));
        assert_eq!(resolve_duration(&params(-5, -0.5), 40.0, -40.0), Hold::Frames(160));
    }

    #[test]
    fn test_auto_scrolling_down_is_indefinite() {
        let hold = resolve_duration(&params(-1, 1.5), 100.0, 0.0);
        assert_eq!(hold, Hold::Indefinite);
        assert!(hold.is_running());
        assert_eq!(hold.remaining(), None);
    }

    #[test]
    fn test_hold_step() {
        let mut hold = Hold::Frames(2);
        hold.step();
        assert!(hold.is_running());
        hold.step();
        assert!(!hold.is_running());
        hold.step();
        assert_eq!(hold.remaining(), Some(0));

        let mut indefinite = Hold::Indefinite;
        indefinite.step();
        assert_eq!(indefinite, Hold::Indefinite);
    }
}
