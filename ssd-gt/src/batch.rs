//! Batched ground-truth generation.

use crate::{
    anchor::DefaultBoxes,
    boxes::{normalize_record, NormalizedBox},
    common::*,
    config::MatchingConfig,
    dataset::AnnotationRecord,
    error::{Error, Result},
    matching::{count_positives, match_anchors, LabeledAnchor},
};

/// Training targets of a batch, in the order of the input records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthBatch {
    /// `batch × max_boxes_per_image × 5` normalized `(cx, cy, w, h, class)`.
    pub true_boxes: Array3<f32>,
    /// `batch × num_anchors × 5` `(xmin, ymin, xmax, ymax, class)`.
    pub labeled_anchors: Array3<f32>,
}

impl GroundTruthBatch {
    pub fn batch_size(&self) -> usize {
        self.true_boxes.dim().0
    }

    /// The number of positive anchors per image.
    pub fn num_positives(&self) -> Vec<usize> {
        self.labeled_anchors
            .outer_iter()
            .map(|anchors| {
                anchors
                    .index_axis(Axis(1), 4)
                    .iter()
                    .filter(|&&class| class > 0.0)
                    .count()
            })
            .collect()
    }
}

/// The targets of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTargets {
    pub true_boxes: Vec<NormalizedBox>,
    pub labeled_anchors: Vec<LabeledAnchor>,
}

/// Matches records against a shared default box set.
#[derive(Debug, Clone)]
pub struct GroundTruthBuilder {
    config: Arc<MatchingConfig>,
    default_boxes: DefaultBoxes,
    cancel: Arc<AtomicBool>,
}

impl GroundTruthBuilder {
    pub fn new(config: Arc<MatchingConfig>, default_boxes: DefaultBoxes) -> Result<Self> {
        config.validate()?;
        if default_boxes.is_empty() {
            warn!("the default box set is empty, every batch will have no anchors");
        }

        Ok(Self {
            config,
            default_boxes,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Share a cancellation flag with the caller. Once set, pending and
    /// future builds fail with [Error::Cancelled].
    pub fn with_cancel_flag(self, cancel: Arc<AtomicBool>) -> Self {
        Self { cancel, ..self }
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn default_boxes(&self) -> &DefaultBoxes {
        &self.default_boxes
    }

    /// Normalize and match a single record.
    pub fn match_record(&self, record: &AnnotationRecord) -> Result<ImageTargets> {
        let true_boxes = normalize_record(record, &self.config)?;
        let labeled_anchors = match_anchors(
            &true_boxes,
            &self.default_boxes,
            self.config.iou_threshold(),
        );
        Ok(ImageTargets {
            true_boxes,
            labeled_anchors,
        })
    }

    /// Build the targets of a batch, one image per worker.
    pub async fn build(&self, records: &[AnnotationRecord]) -> Result<GroundTruthBatch> {
        let batch_size = records.len();
        let max_boxes = self.config.max_boxes_per_image.get();
        let num_anchors = self.default_boxes.len();

        let targets: Vec<ImageTargets> = {
            let builder = self.clone();
            stream::iter(records.to_vec())
                .par_map(None, move |record| {
                    let builder = builder.clone();
                    move || -> Result<_> {
                        if builder.cancel.load(Ordering::SeqCst) {
                            return Err(Error::Cancelled);
                        }
                        builder.match_record(&record)
                    }
                })
                .try_collect()
                .await?
        };

        let true_boxes: Vec<f32> = targets
            .iter()
            .flat_map(|targets| targets.true_boxes.iter().map(|slot| slot.to_row()))
            .flatten()
            .collect();
        let labeled_anchors: Vec<f32> = targets
            .iter()
            .flat_map(|targets| targets.labeled_anchors.iter().map(|anchor| anchor.to_row()))
            .flatten()
            .collect();

        let output = GroundTruthBatch {
            true_boxes: Array3::from_shape_vec((batch_size, max_boxes, 5), true_boxes)?,
            labeled_anchors: Array3::from_shape_vec((batch_size, num_anchors, 5), labeled_anchors)?,
        };

        let num_positives: usize = targets
            .iter()
            .map(|targets| count_positives(&targets.labeled_anchors))
            .sum();
        debug!(
            "matched {} images with {} positive anchors",
            batch_size, num_positives
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_annotation_line;
    use approx::assert_abs_diff_eq;

    fn config() -> Arc<MatchingConfig> {
        Arc::new(MatchingConfig {
            max_boxes_per_image: NonZeroUsize::new(3).unwrap(),
            image_width: NonZeroUsize::new(300).unwrap(),
            image_height: NonZeroUsize::new(300).unwrap(),
            iou_threshold: r64(0.5),
        })
    }

    fn default_boxes() -> DefaultBoxes {
        DefaultBoxes::new(vec![
            Corners::from_corners([0.1, 0.1, 0.5, 0.5]),
            Corners::from_corners([0.5, 0.5, 1.0, 1.0]),
            Corners::from_corners([0.0, 0.0, 1.0, 1.0]),
        ])
    }

    fn records(lines: &[&str]) -> Vec<AnnotationRecord> {
        let config = config();
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| parse_annotation_line(index, line, &config).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn build_batch() {
        let records = records(&[
            "a.png 100 100 10 10 50 50 2",
            "b.png 100 100",
            "c.png 200 200 100 100 200 200 5 0 0 200 200 1",
        ]);
        let builder = GroundTruthBuilder::new(config(), default_boxes()).unwrap();
        let batch = builder.build(&records).await.unwrap();

        assert_eq!(batch.batch_size(), 3);
        assert_eq!(batch.true_boxes.dim(), (3, 3, 5));
        assert_eq!(batch.labeled_anchors.dim(), (3, 3, 5));

        // (30, 30, 150, 150) on 300x300
        let first = batch.true_boxes.index_axis(Axis(0), 0);
        let expect = [0.3, 0.3, 0.4, 0.4, 2.0];
        first
            .index_axis(Axis(0), 0)
            .iter()
            .zip(expect)
            .for_each(|(&value, expect)| assert_abs_diff_eq!(value, expect, epsilon = 1e-6));
        for slot in 1..3 {
            assert_eq!(
                first.index_axis(Axis(0), slot).to_vec(),
                vec![0.0, 0.0, 0.0, 0.0, -1.0]
            );
        }

        let classes = batch.labeled_anchors.index_axis(Axis(2), 4).to_owned();
        assert_eq!(
            classes,
            ndarray::arr2(&[[2.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 5.0, 1.0]])
        );
        assert_eq!(batch.num_positives(), vec![1, 0, 2]);

        // anchor coordinates are kept
        for image in batch.labeled_anchors.outer_iter() {
            for (row, anchor) in image.outer_iter().zip(builder.default_boxes().iter()) {
                assert_eq!(row.slice(ndarray::s![..4]).to_vec(), anchor.corners().to_vec());
            }
        }
    }

    #[tokio::test]
    async fn build_is_deterministic() {
        let records = records(&[
            "a.png 640 480 0 0 320 240 1 100 100 600 400 2",
            "b.png 100 50 0 0 50 50 3",
        ]);
        let builder = GroundTruthBuilder::new(config(), default_boxes()).unwrap();
        let first = builder.build(&records).await.unwrap();
        let second = builder.build(&records).await.unwrap();
        assert_eq!(first, second);

        for (record, image) in records.iter().zip(first.labeled_anchors.outer_iter()) {
            let targets = builder.match_record(record).unwrap();
            let rows: Vec<f32> = targets
                .labeled_anchors
                .iter()
                .flat_map(|anchor| anchor.to_row())
                .collect();
            assert_eq!(rows, image.iter().copied().collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn build_empty_batch() {
        let builder = GroundTruthBuilder::new(config(), default_boxes()).unwrap();
        let batch = builder.build(&[]).await.unwrap();
        assert_eq!(batch.true_boxes.dim(), (0, 3, 5));
        assert_eq!(batch.labeled_anchors.dim(), (0, 3, 5));
    }

    #[tokio::test]
    async fn build_without_anchors() {
        let records = records(&["a.png 100 100 10 10 50 50 2"]);
        let builder = GroundTruthBuilder::new(config(), DefaultBoxes::new(vec![])).unwrap();
        let batch = builder.build(&records).await.unwrap();
        assert_eq!(batch.true_boxes.dim(), (1, 3, 5));
        assert_eq!(batch.labeled_anchors.dim(), (1, 0, 5));
    }

    #[tokio::test]
    async fn cancelled_build() {
        let records = records(&["a.png 100 100 10 10 50 50 2"]);
        let cancel = Arc::new(AtomicBool::new(false));
        let builder = GroundTruthBuilder::new(config(), default_boxes())
            .unwrap()
            .with_cancel_flag(cancel.clone());

        assert!(builder.build(&records).await.is_ok());
        cancel.store(true, Ordering::SeqCst);
        assert!(matches!(
            builder.build(&records).await,
            Err(Error::Cancelled)
        ));
    }
}
