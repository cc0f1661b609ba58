//! Box format conversion, resizing and normalization.

use crate::{
    common::*,
    config::MatchingConfig,
    dataset::AnnotationRecord,
    error::{Error, Result},
};

/// An annotation slot in resized pixel coordinates, corner format.
pub type PixelBox = Slot<Corners<f32>>;

/// An annotation slot relative to the network input, center format.
pub type NormalizedBox = Slot<Center<f32>>;

/// Convert `(xmin, ymin, xmax, ymax)` to `(cx, cy, w, h)`. The class passes
/// through.
pub fn to_center_form(slot: &PixelBox) -> Slot<Center<f32>> {
    slot.to_center()
}

/// Convert `(cx, cy, w, h)` back to `(xmin, ymin, xmax, ymax)`.
pub fn to_corner_form(slot: &NormalizedBox) -> Slot<Corners<f32>> {
    slot.map_rect(|rect| rect.to_corners())
}

/// Divide `cx` and `w` by the image width, `cy` and `h` by the image height.
///
/// Padding stays padding and keeps encoding to `(0, 0, 0, 0, -1)`.
pub fn normalize(
    slot: &Slot<Center<f32>>,
    image_width: f32,
    image_height: f32,
) -> Result<NormalizedBox> {
    let size = image_size(image_width, image_height)?;
    Ok(slot.normalize(&size))
}

/// Rescale raw pixel coordinates of an `orig_w` by `orig_h` image into the
/// `target_size` network input. x and y are scaled independently, the same
/// way the image preprocessor stretches the image.
pub fn resize_box(
    orig_h: usize,
    orig_w: usize,
    rect: &Corners<f32>,
    target_size: &Size<f32>,
) -> Result<Corners<f32>> {
    let orig_size = image_size(orig_w as f32, orig_h as f32)?;
    let transform = Transform::from_sizes_exact(&orig_size, target_size);
    Ok(&transform * rect)
}

/// The normalized ground truth of one record, one slot per box slot.
pub fn normalize_record(
    record: &AnnotationRecord,
    config: &MatchingConfig,
) -> Result<Vec<NormalizedBox>> {
    let width = config.image_width.get() as f32;
    let height = config.image_height.get() as f32;
    record
        .boxes
        .iter()
        .map(|slot| normalize(&to_center_form(slot), width, height))
        .collect()
}

fn image_size(width: f32, height: f32) -> Result<Size<f32>> {
    Size::try_from_wh([width, height]).map_err(|_| Error::InvalidImageSize { width, height })
}
