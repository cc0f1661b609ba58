//! Annotation parsing and batch reading.

mod annotation;
mod preprocess;
mod reader;

pub use annotation::*;
pub use preprocess::*;
pub use reader::*;
