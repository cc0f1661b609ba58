pub use bbox::{prelude::*, Center, Corners, Size, Transform};
pub use futures::stream::{self, StreamExt as _, TryStreamExt as _};
pub use itertools::Itertools as _;
pub use label::{Label, Slot};
pub use ndarray::{Array2, Array3, Array4, ArrayView1, Axis};
pub use noisy_float::prelude::*;
pub use par_stream::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::Debug,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
pub use tracing::{debug, info, warn};
