//! Default (anchor) box generation.

use crate::{
    common::*,
    error::{Error, Result},
};

/// A default box in normalized corner format.
pub type DefaultBox = Corners<f32>;

/// The ordered default boxes of a whole network.
///
/// The anchor index is the unit of supervision, so the order is fixed once
/// built. Clones share the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultBoxes {
    boxes: Arc<[DefaultBox]>,
}

impl DefaultBoxes {
    pub fn new(boxes: Vec<DefaultBox>) -> Self {
        Self {
            boxes: boxes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn as_slice(&self) -> &[DefaultBox] {
        &self.boxes
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefaultBox> {
        self.boxes.iter()
    }

    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyAnchorSet);
        }
        Ok(())
    }
}

/// Spatial size of one feature map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureMapShape {
    pub height: usize,
    pub width: usize,
}

/// Produces the default boxes for a list of feature maps.
pub trait DefaultBoxGenerator {
    fn generate(&self, feature_maps: &[FeatureMapShape]) -> Result<DefaultBoxes>;
}

/// Box sizes and aspect ratios of one feature map scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Box sizes relative to the input image.
    pub sizes: Vec<R64>,
    /// Width to height ratios.
    pub ratios: Vec<R64>,
}

impl ScaleConfig {
    /// `len(sizes) + len(ratios) - 1`, zero for an empty scale.
    pub fn anchors_per_cell(&self) -> usize {
        (self.sizes.len() + self.ratios.len()).saturating_sub(1)
    }

    /// `(w, h)` of every box of a cell: each size with the first ratio, then
    /// the first size with each remaining ratio.
    fn box_extents(&self) -> Vec<(f32, f32)> {
        let extent = |size: R64, ratio: R64| {
            let sqrt_ratio = ratio.raw().sqrt();
            (
                (size.raw() * sqrt_ratio) as f32,
                (size.raw() / sqrt_ratio) as f32,
            )
        };
        let first_size = self.sizes[0];
        let first_ratio = self.ratios[0];

        self.sizes
            .iter()
            .map(|&size| extent(size, first_ratio))
            .chain(self.ratios[1..].iter().map(|&ratio| extent(first_size, ratio)))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() || self.ratios.is_empty() {
            return Err(Error::InvalidConfig(
                "sizes and ratios of a scale must not be empty".into(),
            ));
        }
        if self.sizes.iter().chain(&self.ratios).any(|&value| value <= 0.0) {
            return Err(Error::InvalidConfig(
                "sizes and ratios must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Multi-scale SSD prior boxes, one [ScaleConfig] per feature map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBoxPrior {
    pub scales: Vec<ScaleConfig>,
}

impl Default for MultiBoxPrior {
    /// Five scales with sizes growing from 0.2 to 0.961 and ratios 1, 2
    /// and 0.5.
    fn default() -> Self {
        let sizes = [
            [0.2, 0.272],
            [0.37, 0.447],
            [0.54, 0.619],
            [0.71, 0.79],
            [0.88, 0.961],
        ];
        let scales = sizes
            .iter()
            .map(|sizes| ScaleConfig {
                sizes: sizes.iter().map(|&size| r64(size)).collect(),
                ratios: vec![r64(1.0), r64(2.0), r64(0.5)],
            })
            .collect();
        Self { scales }
    }
}

impl DefaultBoxGenerator for MultiBoxPrior {
    fn generate(&self, feature_maps: &[FeatureMapShape]) -> Result<DefaultBoxes> {
        if feature_maps.len() != self.scales.len() {
            return Err(Error::InvalidConfig(format!(
                "expect {} feature maps, but get {}",
                self.scales.len(),
                feature_maps.len()
            )));
        }

        let mut boxes = vec![];

        for (index, (shape, scale)) in feature_maps.iter().zip(&self.scales).enumerate() {
            scale.validate()?;
            let FeatureMapShape { height, width } = *shape;
            let extents = scale.box_extents();

            for y in 0..height {
                let cy = (y as f32 + 0.5) / height as f32;
                for x in 0..width {
                    let cx = (x as f32 + 0.5) / width as f32;
                    boxes.extend(
                        extents
                            .iter()
                            .map(|&(w, h)| DefaultBox::from(&Center::from_center([cx, cy, w, h]))),
                    );
                }
            }

            debug!(
                "scale {} ({}x{}) with {} anchors",
                index,
                height,
                width,
                height * width * scale.anchors_per_cell()
            );
        }

        let boxes = DefaultBoxes::new(boxes);
        boxes.ensure_non_empty()?;
        Ok(boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_scale(sizes: &[f64], ratios: &[f64]) -> MultiBoxPrior {
        MultiBoxPrior {
            scales: vec![ScaleConfig {
                sizes: sizes.iter().map(|&v| r64(v)).collect(),
                ratios: ratios.iter().map(|&v| r64(v)).collect(),
            }],
        }
    }

    #[test]
    fn default_prior_counts() {
        let prior = MultiBoxPrior::default();
        let shapes: Vec<_> = [32, 16, 8, 4, 1]
            .iter()
            .map(|&size| FeatureMapShape {
                height: size,
                width: size,
            })
            .collect();
        let boxes = prior.generate(&shapes).unwrap();

        assert!(prior.scales.iter().all(|scale| scale.anchors_per_cell() == 4));
        assert_eq!(boxes.len(), (32 * 32 + 16 * 16 + 8 * 8 + 4 * 4 + 1) * 4);
    }

    #[test]
    fn cell_layout() {
        let prior = single_scale(&[0.5, 0.25], &[1.0, 4.0]);
        let boxes = prior
            .generate(&[FeatureMapShape {
                height: 1,
                width: 2,
            }])
            .unwrap();
        assert_eq!(boxes.len(), 6);

        let centers: Vec<_> = boxes.iter().map(|rect| rect.center()).collect();
        // first cell, size 0.5 ratio 1
        assert_eq!(centers[0], [0.25, 0.5, 0.5, 0.5]);
        // first cell, size 0.25 ratio 1
        assert_eq!(centers[1], [0.25, 0.5, 0.25, 0.25]);
        // first cell, size 0.5 ratio 4
        assert_abs_diff_eq!(centers[2][2], 1.0);
        assert_abs_diff_eq!(centers[2][3], 0.25);
        // second cell
        assert_eq!(centers[3][..2], [0.75, 0.5]);
    }

    #[test]
    fn empty_scale_has_no_anchors() {
        let scale = ScaleConfig {
            sizes: vec![],
            ratios: vec![],
        };
        assert_eq!(scale.anchors_per_cell(), 0);
        assert!(scale.validate().is_err());
    }

    #[test]
    fn shared_storage() {
        let boxes = DefaultBoxes::new(vec![Corners::from_corners([0.0, 0.0, 1.0, 1.0])]);
        let cloned = boxes.clone();
        assert!(std::ptr::eq(boxes.as_slice(), cloned.as_slice()));
    }

    #[test]
    fn invalid_configurations() {
        let prior = single_scale(&[0.5], &[1.0]);
        assert!(matches!(
            prior.generate(&[]),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            prior.generate(&[FeatureMapShape {
                height: 0,
                width: 0,
            }]),
            Err(Error::EmptyAnchorSet)
        ));
        assert!(matches!(
            single_scale(&[], &[1.0]).generate(&[FeatureMapShape {
                height: 1,
                width: 1,
            }]),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            single_scale(&[0.5], &[0.0]).generate(&[FeatureMapShape {
                height: 1,
                width: 1,
            }]),
            Err(Error::InvalidConfig(_))
        ));
    }
}
