//! SSD training target generation: annotation parsing, default boxes and
//! IoU-based ground-truth assignment.

pub mod anchor;
pub mod batch;
pub mod boxes;
mod common;
pub mod config;
pub mod dataset;
pub mod error;
pub mod matching;

pub use anchor::{DefaultBox, DefaultBoxGenerator, DefaultBoxes, FeatureMapShape, MultiBoxPrior};
pub use batch::{GroundTruthBatch, GroundTruthBuilder, ImageTargets};
pub use config::MatchingConfig;
pub use error::{Error, Result};
pub use matching::{LabeledAnchor, BACKGROUND_CLASS};
