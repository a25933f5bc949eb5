pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use image::{imageops::FilterType, DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
pub use itertools::Itertools as _;
pub use log::{debug, info, warn};
pub use ndarray::{s, Array, Array2, Array3, ArrayBase, ArrayView, Axis, Data, Dimension, Slice};
pub use noisy_float::prelude::*;
pub use num_traits::Zero;
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::{self, Debug, Display},
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
pub use strum::{AsRefStr, Display as StrumDisplay, EnumString};
pub use tch::{Device, Kind, Tensor};

pub type Fallible<T> = Result<T, Error>;
