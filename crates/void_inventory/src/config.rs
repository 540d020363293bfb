//! Inventory container configuration

use crate::geometry::GridSize;
use serde::{Deserialize, Serialize};

/// Largest bounds padding honoured; a full cell would admit anchors outside the grid
pub const MAX_BOUNDS_PADDING: f32 = 0.5;

/// Container configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Grid width in cells
    pub width: u32,

    /// Grid height in cells
    pub height: u32,

    /// Slack (in cells) allowed when checking that an item lies inside the grid
    ///
    /// Clamped to `0.0..=MAX_BOUNDS_PADDING` when used.
    pub bounds_padding: f32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 4,
            bounds_padding: 0.01,
        }
    }
}

impl InventoryConfig {
    /// A single row of slots
    pub fn hotbar(slots: u32) -> Self {
        Self {
            width: slots,
            height: 1,
            ..Default::default()
        }
    }

    /// A 1×1 container, for equipment slots
    pub fn single_slot() -> Self {
        Self {
            width: 1,
            height: 1,
            ..Default::default()
        }
    }

    /// Set grid size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set bounds padding, clamped below one cell
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.bounds_padding = clamp_padding(padding);
        self
    }

    /// Padding actually applied by containment checks
    ///
    /// Deserialized configs skip the builder, so the clamp is repeated here.
    pub fn effective_padding(&self) -> f32 {
        clamp_padding(self.bounds_padding)
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }
}

fn clamp_padding(padding: f32) -> f32 {
    if padding.is_nan() {
        0.0
    } else {
        padding.clamp(0.0, MAX_BOUNDS_PADDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(InventoryConfig::hotbar(9).size(), GridSize::new(9, 1));
        assert_eq!(InventoryConfig::single_slot().size(), GridSize::new(1, 1));
        assert_eq!(InventoryConfig::default().bounds_padding, 0.01);
    }

    #[test]
    fn test_builder() {
        let config = InventoryConfig::default().with_size(10, 6).with_padding(0.0);
        assert_eq!(config.size(), GridSize::new(10, 6));
        assert_eq!(config.bounds_padding, 0.0);
    }

    #[test]
    fn test_padding_clamped() {
        assert_eq!(InventoryConfig::default().with_padding(1.5).bounds_padding, MAX_BOUNDS_PADDING);
        assert_eq!(InventoryConfig::default().with_padding(-2.0).bounds_padding, 0.0);

        let mut config = InventoryConfig::default();
        config.bounds_padding = 3.0;
        assert_eq!(config.effective_padding(), MAX_BOUNDS_PADDING);
        config.bounds_padding = f32::NAN;
        assert_eq!(config.effective_padding(), 0.0);
    }
}
