//! Common imports from external crates.

pub use anyhow::{format_err, Context, Error, Result};
pub use chrono::Local;
pub use futures::future::FutureExt as _;
pub use ndarray::{Array3, Array4};
pub use serde::{Deserialize, Serialize};
pub use ssd_gt::{
    dataset::{AnnotationLine, AnnotationReader, AnnotationRecord, ResizePreprocessor},
    DefaultBoxGenerator as _, FeatureMapShape, GroundTruthBatch, GroundTruthBuilder,
    MatchingConfig, MultiBoxPrior,
};
pub use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
pub use tokio::sync::mpsc;
pub use tracing::{debug, info, info_span, warn, Instrument};

pub type Fallible<T> = Result<T, Error>;
