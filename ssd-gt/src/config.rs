//! Matching parameters shared by the reader, the normalizer and the matcher.

use crate::{
    common::*,
    error::{Error, Result},
};

/// The ground-truth assignment parameters.
///
/// Loaded once and left untouched for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// The number of box slots per image. Extra boxes are dropped, missing
    /// ones are padded.
    pub max_boxes_per_image: NonZeroUsize,
    /// The width of the network input in pixels.
    pub image_width: NonZeroUsize,
    /// The height of the network input in pixels.
    pub image_height: NonZeroUsize,
    /// An anchor is positive if its best IoU is strictly above this value.
    pub iou_threshold: R64,
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.iou_threshold.raw();
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "iou_threshold must be in range (0, 1), but get {}",
                threshold
            )));
        }
        Ok(())
    }

    /// The network input size that boxes are resized into.
    pub fn target_size(&self) -> Size<f32> {
        Size::from_wh([
            self.image_width.get() as f32,
            self.image_height.get() as f32,
        ])
    }

    pub fn iou_threshold(&self) -> f32 {
        self.iou_threshold.raw() as f32
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_boxes_per_image: NonZeroUsize::new(20).unwrap(),
            image_width: NonZeroUsize::new(300).unwrap(),
            image_height: NonZeroUsize::new(300).unwrap(),
            iou_threshold: r64(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_range() {
        let config = MatchingConfig::default();
        assert!(config.validate().is_ok());

        for bad in [0.0, 1.0, -0.5, 1.5] {
            let config = MatchingConfig {
                iou_threshold: r64(bad),
                ..MatchingConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }
}
