//! Dataset configuration format.

use crate::{
    common::*,
    dataset::{DatasetKind, Mode, Split, DEFAULT_MAX_DECODE_RETRIES, DEFAULT_VAL_HEIGHT},
    processor::{ColorJitterConfig, NormalizeInit},
};

pub use augmentation::*;
pub use dataset::*;
pub use size::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The prefix directory joined with the dataset root.
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub augmentation: AugmentationConfig,
    /// If set, images are normalized into float tensors.
    pub normalize: Option<NormalizeConfig>,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

mod dataset {
    use super::*;

    /// Dataset options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        pub kind: DatasetKind,
        /// The dataset directory relative to `root_path`.
        pub root: PathBuf,
        pub split: Split,
        /// The operating mode. It defaults to the split if not set.
        pub mode: Option<Mode>,
        /// The target size. It defaults to the preferred size of the dataset kind.
        pub base_size: Option<SizeSpec>,
        /// If set, transformed samples are written to `debug_dir`.
        #[serde(default)]
        pub debug: bool,
        #[serde(default = "default_debug_dir")]
        pub debug_dir: PathBuf,
        /// If set, image headers are verified when building the index.
        #[serde(default)]
        pub verify_images: bool,
        /// The maximum number of following records tried when an image fails to decode.
        #[serde(default = "default_max_decode_retries")]
        pub max_decode_retries: usize,
        /// The fixed height of rescaled rasters on the skeleton validation path.
        #[serde(default = "default_val_height")]
        pub val_height: NonZeroUsize,
    }
}

mod augmentation {
    use super::*;

    /// Data augmentation options.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct AugmentationConfig {
        #[serde(default)]
        pub color_jitter: Option<ColorJitterConfig>,
    }

    /// Per-channel normalization options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NormalizeConfig {
        #[serde(default = "default_mean")]
        pub mean: [R64; 3],
        #[serde(default = "default_std")]
        pub std: [R64; 3],
    }

    impl NormalizeConfig {
        pub fn to_init(&self) -> NormalizeInit {
            NormalizeInit {
                mean: self.mean,
                std: self.std,
            }
        }
    }

    fn default_mean() -> [R64; 3] {
        NormalizeInit::default().mean
    }

    fn default_std() -> [R64; 3] {
        NormalizeInit::default().std
    }
}

mod size {
    use super::*;

    /// The size specification, either a single edge length or a `[width, height]` pair.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum SizeSpec {
        Edge(R64),
        Pair(Vec<R64>),
    }

    impl SizeSpec {
        /// Converts the specification to a concrete width and height.
        pub fn to_tuple(&self) -> Result<BaseSize> {
            let (width, height) = match self {
                Self::Edge(edge) => (*edge, *edge),
                Self::Pair(pair) => match pair.as_slice() {
                    &[width, height] => (width, height),
                    _ => bail!(
                        "unsupported size specification: expect 2 values, but get {}",
                        pair.len()
                    ),
                },
            };
            Ok(BaseSize {
                width: to_edge(width)?,
                height: to_edge(height)?,
            })
        }
    }

    impl From<BaseSize> for SizeSpec {
        fn from(size: BaseSize) -> Self {
            Self::Pair(vec![r64(size.width as f64), r64(size.height as f64)])
        }
    }

    /// The target size in pixels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BaseSize {
        pub width: usize,
        pub height: usize,
    }

    impl BaseSize {
        pub fn new(width: usize, height: usize) -> Self {
            Self { width, height }
        }
    }

    impl Display for BaseSize {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}x{}", self.width, self.height)
        }
    }

    fn to_edge(value: R64) -> Result<usize> {
        let value = value.raw();
        ensure!(
            value >= 1.0 && value.fract() == 0.0,
            "size must be a positive integer, but get {}",
            value
        );
        Ok(value as usize)
    }
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from("trash")
}

fn default_max_decode_retries() -> usize {
    DEFAULT_MAX_DECODE_RETRIES
}

fn default_val_height() -> NonZeroUsize {
    DEFAULT_VAL_HEIGHT
}
