//! Block layout: line measurement, alignment offsets and anchor resolution

use crate::block::{Alignment, Block, VerticalAnchor};
use crate::config::PlaybackConfig;
use std::borrow::Cow;

/// Rendered size of a single line of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

impl TextSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Negative or non-finite sizes are treated as zero
    fn sanitized(self) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: clean(self.width),
            height: clean(self.height),
        }
    }
}

/// Measures text for a fixed font configuration
pub trait TextMetrics {
    /// Replaces inline control escapes before measuring. The default keeps
    /// the text as is.
    fn resolve_escapes<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    /// Returns the rendered size of already resolved text
    fn measure(&self, text: &str) -> TextSize;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn resolve_escapes<'a>(&self, text: &'a str) -> Cow<'a, str> {
        (**self).resolve_escapes(text)
    }

    fn measure(&self, text: &str) -> TextSize {
        (**self).measure(text)
    }
}

/// Geometry of a block's content lines
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockLayout {
    pub line_widths: Vec<f32>,
    pub line_heights: Vec<f32>,
    /// Horizontal offset of each line for the block's alignment
    pub line_offsets: Vec<f32>,
    pub total_height: f32,
}

impl BlockLayout {
    pub fn line_count(&self) -> usize {
        self.line_heights.len()
    }

    /// Offset of each line's top edge from the top of the block
    pub fn line_tops(&self) -> impl Iterator<Item = f32> + '_ {
        self.line_heights.iter().scan(0.0, |top, height| {
            let current = *top;
            *top += height;
            Some(current)
        })
    }
}

/// Measures every content line of `block` and computes alignment offsets
pub fn layout<M: TextMetrics + ?Sized>(
    block: &Block,
    metrics: &M,
    config: &PlaybackConfig,
) -> BlockLayout {
    let lines = block.content_lines();
    let mut result = BlockLayout {
        line_widths: Vec::with_capacity(lines.len()),
        line_heights: Vec::with_capacity(lines.len()),
        line_offsets: Vec::with_capacity(lines.len()),
        total_height: 0.0,
    };

    for line in lines {
        let resolved = metrics.resolve_escapes(line);
        let size = metrics.measure(&resolved).sanitized();
        let offset = align_offset(block.params.alignment, size.width, config);

        result.line_widths.push(size.width);
        result.line_heights.push(size.height);
        result.line_offsets.push(offset);
        result.total_height += size.height;
    }

    result
}

fn align_offset(alignment: Alignment, line_width: f32, config: &PlaybackConfig) -> f32 {
    match alignment {
        Alignment::Left => config.text_padding,
        Alignment::Center => config.viewport_width / 2.0 - line_width / 2.0,
        Alignment::Right => config.viewport_width - config.text_padding - line_width,
    }
}

/// Resolves the initial vertical position of a laid out block
pub fn resolve_anchor(anchor: VerticalAnchor, layout: &BlockLayout, config: &PlaybackConfig) -> f32 {
    match anchor {
        VerticalAnchor::Unspecified => 0.0,
        VerticalAnchor::Pixel(y) => y,
        VerticalAnchor::OffBottom => config.viewport_height,
        VerticalAnchor::OffTop => -layout.total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};

    /// 10px per character, 20px per line
    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn measure(&self, text: &str) -> TextSize {
            TextSize::new(text.chars().count() as f32 * 10.0, 20.0)
        }
    }

    fn block(text: &str) -> Block {
        parse(text, &ParseOptions::default()).blocks.remove(0)
    }

    fn config() -> PlaybackConfig {
        PlaybackConfig {
            viewport_width: 400.0,
            viewport_height: 300.0,
            ..PlaybackConfig::default()
        }
    }

    #[test]
    fn test_heights_exclude_tag_line() {
        let block = block("<block:1,0,1,1>\nab\nabcd\n</block>");
        let layout = layout(&block, &FixedMetrics, &config());
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.line_widths, vec![20.0, 40.0]);
        assert_eq!(layout.total_height, 40.0);
        assert_eq!(layout.line_tops().collect::<Vec<_>>(), vec![0.0, 20.0]);
    }

    #[test]
    fn test_alignment_offsets() {
        let left = layout(&block("<block:1,0,1,1,,left>\nabcd\n</block>"), &FixedMetrics, &config());
        let center = layout(&block("<block:1,0,1,1,,center>\nabcd\n</block>"), &FixedMetrics, &config());
        let right = layout(&block("<block:1,0,1,1,,right>\nabcd\n</block>"), &FixedMetrics, &config());

        assert_eq!(left.line_offsets, vec![0.0]);
        assert_eq!(center.line_offsets, vec![180.0]);
        assert_eq!(right.line_offsets, vec![360.0]);
    }

    #[test]
    fn test_text_padding() {
        let config = PlaybackConfig {
            text_padding: 6.0,
            ..config()
        };
        let left = layout(&block("<block:1,0,1,1,,left>\nab\n</block>"), &FixedMetrics, &config);
        let right = layout(&block("<block:1,0,1,1,,right>\nab\n</block>"), &FixedMetrics, &config);
        assert_eq!(left.line_offsets, vec![6.0]);
        assert_eq!(right.line_offsets, vec![374.0]);
    }

    #[test]
    fn test_anchor_resolution() {
        let config = config();
        let layout = BlockLayout {
            total_height: 120.0,
            ..BlockLayout::default()
        };
        assert_eq!(resolve_anchor(VerticalAnchor::Unspecified, &layout, &config), 0.0);
        assert_eq!(resolve_anchor(VerticalAnchor::Pixel(42.0), &layout, &config), 42.0);
        assert_eq!(resolve_anchor(VerticalAnchor::OffBottom, &layout, &config), 300.0);
        assert_eq!(resolve_anchor(VerticalAnchor::OffTop, &layout, &config), -120.0);
    }

    #[test]
    fn test_degenerate_sizes_are_zero() {
        struct BrokenMetrics;
        impl TextMetrics for BrokenMetrics {
            fn measure(&self, _text: &str) -> TextSize {
                TextSize::new(f32::NAN, -5.0)
            }
        }

        let layout = layout(&block("<block:1,0,1,1>\n\n</block>"), &BrokenMetrics, &config());
        assert_eq!(layout.line_widths, vec![0.0]);
        assert_eq!(layout.total_height, 0.0);
    }

    #[test]
    fn test_escapes_resolved_before_measuring() {
        struct StripMetrics;
        impl TextMetrics for StripMetrics {
            fn resolve_escapes<'a>(&self, text: &'a str) -> Cow<'a, str> {
                Cow::Owned(text.replace("\\c", ""))
            }
            fn measure(&self, text: &str) -> TextSize {
                TextSize::new(text.len() as f32, 1.0)
            }
        }

        let layout = layout(&block("<block:1,0,1,1>\n\\cab\n</block>"), &StripMetrics, &config());
        assert_eq!(layout.line_widths, vec![2.0]);
    }

    #[test]
    fn test_empty_block() {
        let layout = layout(&block("<block:1,0,1,1>\n</block>"), &FixedMetrics, &config());
        assert_eq!(layout.line_count(), 0);
        assert_eq!(layout.total_height, 0.0);
    }
}
