//! IoU-based assignment of ground truth to default boxes.

use crate::{
    anchor::DefaultBoxes,
    boxes::{to_corner_form, NormalizedBox},
    common::*,
};

/// The class id of negative anchors.
pub const BACKGROUND_CLASS: usize = 0;

/// A default box with its assigned class, [BACKGROUND_CLASS] for negatives.
pub type LabeledAnchor = Label<Corners<f32>>;

/// Intersection over union of two corner-format boxes.
///
/// Zero-area boxes yield zero.
pub fn iou(box_a: &Corners<f32>, box_b: &Corners<f32>) -> f32 {
    box_a.iou_with(box_b)
}

/// The `ground_truths × anchors` IoU matrix.
pub fn iou_matrix(ground_truths: &[Corners<f32>], anchors: &[Corners<f32>]) -> Array2<f32> {
    Array2::from_shape_fn((ground_truths.len(), anchors.len()), |(i, j)| {
        iou(&ground_truths[i], &anchors[j])
    })
}

/// The best ground truth index and its IoU for one anchor column. Ties go to
/// the lowest index.
fn best_match(column: ArrayView1<f32>) -> Option<(usize, f32)> {
    column
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((index, value)),
        })
}

/// Assign every default box a class.
///
/// Only object slots with a class id above zero take part. An anchor is
/// positive when the IoU with its best ground truth is strictly above
/// `iou_threshold` and then takes that ground truth's class, otherwise it
/// is background. Each anchor gets at most one ground truth. Anchor
/// coordinates are copied unchanged.
pub fn match_anchors(
    true_boxes: &[NormalizedBox],
    default_boxes: &DefaultBoxes,
    iou_threshold: f32,
) -> Vec<LabeledAnchor> {
    if default_boxes.is_empty() {
        warn!("matching against an empty default box set");
        return vec![];
    }

    let background = |rect: &Corners<f32>| Label {
        rect: rect.clone(),
        class: BACKGROUND_CLASS,
    };

    let valid = true_boxes
        .iter()
        .map(to_corner_form)
        .filter_map(|slot| match slot {
            Slot::Object(label) if label.class > BACKGROUND_CLASS => Some(label),
            _ => None,
        })
        .collect_vec();
    if valid.is_empty() {
        return default_boxes.iter().map(background).collect();
    }

    let gt_rects = valid.iter().map(|label| label.rect.clone()).collect_vec();
    let ious = iou_matrix(&gt_rects, default_boxes.as_slice());

    default_boxes
        .iter()
        .zip(ious.axis_iter(Axis(1)))
        .map(|(rect, column)| match best_match(column) {
            Some((gt_index, best_iou)) if best_iou > iou_threshold => Label {
                rect: rect.clone(),
                class: valid[gt_index].class,
            },
            _ => background(rect),
        })
        .collect()
}

/// The number of anchors with a foreground class.
pub fn count_positives(anchors: &[LabeledAnchor]) -> usize {
    anchors
        .iter()
        .filter(|anchor| anchor.class != BACKGROUND_CLASS)
        .count()
}
