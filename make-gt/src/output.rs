//! Batch output files.

use crate::common::*;

pub const FILE_STRFTIME: &str = "%Y-%m-%d-%H-%M-%S.%3f%z";

/// The content of a `batch_<index>.json` file.
#[derive(Debug, Serialize)]
pub struct BatchOutput<'a> {
    pub index: usize,
    pub image_paths: Vec<&'a Path>,
    pub true_boxes: &'a Array3<f32>,
    pub labeled_anchors: &'a Array3<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<&'a Array4<f32>>,
}

impl<'a> BatchOutput<'a> {
    pub fn new(
        index: usize,
        records: &'a [AnnotationRecord],
        targets: &'a GroundTruthBatch,
        images: Option<&'a Array4<f32>>,
    ) -> Self {
        Self {
            index,
            image_paths: records
                .iter()
                .map(|record| record.image_path.as_path())
                .collect(),
            true_boxes: &targets.true_boxes,
            labeled_anchors: &targets.labeled_anchors,
            images,
        }
    }

    pub fn file_name(&self) -> String {
        format!("batch_{}.json", self.index)
    }

    /// Write the batch into `dir` and return the file path.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        let text = serde_json::to_string(self)?;
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}
