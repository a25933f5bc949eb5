//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use futures::stream::{self, StreamExt as _};
pub use ndarray::Array2;
pub use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
pub use tracing::{error, info};

