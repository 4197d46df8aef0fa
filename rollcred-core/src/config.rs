//! Playback configuration

use crate::{Error, Result};

/// Options recognized by the layout engine, the sequencer and the skip controller
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Cancel ends the whole sequence
    pub skippable: bool,
    /// Confirm / pointer presses end the current block's hold early
    pub block_skippable: bool,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Horizontal inset of left and right aligned lines
    pub text_padding: f32,
    /// Opacity added to each background layer per frame
    pub background_fade_rate: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            skippable: true,
            block_skippable: true,
            viewport_width: 816.0,
            viewport_height: 624.0,
            text_padding: 0.0,
            background_fade_rate: 5,
        }
    }
}

impl PlaybackConfig {
    /// Checks that the viewport is usable
    pub fn validate(&self) -> Result<()> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.viewport_width) || !valid(self.viewport_height) {
            return Err(Error::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !self.text_padding.is_finite() || self.text_padding < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "text_padding must be a non-negative number, got {}",
                self.text_padding
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration; missing keys take defaults
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PlaybackConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_viewport_rejected() {
        let config = PlaybackConfig {
            viewport_height: 0.0,
            ..PlaybackConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidViewport { height, .. }) if height == 0.0
        ));
    }

    #[test]
    fn test_negative_padding_rejected() {
        let config = PlaybackConfig {
            text_padding: -1.0,
            ..PlaybackConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_fills_defaults() {
        let config = PlaybackConfig::from_json(r#"{"skippable": false, "viewport_width": 1280}"#).unwrap();
        assert!(!config.skippable);
        assert!(config.block_skippable);
        assert_eq!(config.viewport_width, 1280.0);
        assert_eq!(config.viewport_height, 624.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_validates() {
        assert!(PlaybackConfig::from_json(r#"{"viewport_width": -3}"#).is_err());
    }
}
