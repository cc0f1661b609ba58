//! Program configuration format.

use crate::common::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub anchors: AnchorConfig,
    pub dataset: DatasetConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&text)?;
        config.matching.validate()?;
        Ok(config)
    }
}

/// Default box layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Feature map sizes, one per prior scale.
    pub feature_maps: Vec<FeatureMapShape>,
    #[serde(default)]
    pub prior: MultiBoxPrior,
}

/// Dataset options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The annotation file, one image per line.
    pub annotation_file: PathBuf,
    /// Decode and resize the referenced images along with the boxes.
    #[serde(default)]
    pub load_images: bool,
}

/// Batching options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub batch_size: NonZeroUsize,
    /// The number of batches buffered between the reader and the matcher.
    #[serde(default = "default_prefetch")]
    pub prefetch: NonZeroUsize,
}

fn default_prefetch() -> NonZeroUsize {
    NonZeroUsize::new(2).unwrap()
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Each run writes into a timestamped directory under this path.
    pub dir: PathBuf,
}
