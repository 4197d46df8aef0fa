//! Background image layers shown behind the credits text

/// A background requested by a block, fading in from transparent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundLayer {
    /// Image id as written in the script
    pub image_id: String,
    /// Block that introduced the layer
    pub block_index: usize,
    pub opacity: u8,
}

/// Layers in the order they were added; later layers draw on top.
/// Nothing is removed before the sequence ends, so blocks without a
/// background of their own keep showing the latest one.
#[derive(Debug, Clone, Default)]
pub struct BackgroundStack {
    layers: Vec<BackgroundLayer>,
}

impl BackgroundStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, image_id: impl Into<String>, block_index: usize) {
        self.layers.push(BackgroundLayer {
            image_id: image_id.into(),
            block_index,
            opacity: 0,
        });
    }

    /// Fades every layer in by `rate`
    pub fn tick(&mut self, rate: u8) {
        for layer in &mut self.layers {
            layer.opacity = layer.opacity.saturating_add(rate);
        }
    }

    /// Topmost layer, i.e. the background currently in effect
    pub fn current(&self) -> Option<&BackgroundLayer> {
        self.layers.last()
    }

    pub fn layers(&self) -> &[BackgroundLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_fade_in_and_stack() {
        let mut stack = BackgroundStack::new();
        stack.push("Sky", 0);
        stack.tick(5);
        stack.tick(5);
        stack.push("Sea", 3);
        stack.tick(5);

        let opacities: Vec<_> = stack.layers().iter().map(|l| l.opacity).collect();
        assert_eq!(opacities, vec![15, 5]);
        assert_eq!(stack.current().map(|l| l.image_id.as_str()), Some("Sea"));
    }

    #[test]
    fn test_opacity_clamps() {
        let mut stack = BackgroundStack::new();
        stack.push("Sky", 0);
        for _ in 0..60 {
            stack.tick(5);
        }
        assert_eq!(stack.layers()[0].opacity, 255);
    }
}
