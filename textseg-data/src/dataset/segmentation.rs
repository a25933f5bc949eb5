use super::*;
use crate::{
    common::*,
    config::{BaseSize, Config, DatasetConfig, SizeSpec},
    processor::{
        color_jitter_init, crop_pad_width, image_to_array, label_to_array, resize_image,
        resize_label, scaled_size, ClassMap, ColorJitter, ColorJitterConfig, ImageTransform,
    },
    tensor::ArrayIntoTensor as _,
};

pub const CLASSES: [&str; 2] = ["background", "text"];

const INPUT_CHANNELS: usize = 3;

pub const DEFAULT_MAX_DECODE_RETRIES: usize = 8;

pub const DEFAULT_VAL_HEIGHT: NonZeroUsize = match NonZeroUsize::new(96) {
    Some(height) => height,
    None => panic!("the validation height must be non-zero"),
};

/// The options to build a [SegmentationDataset].
#[derive(Debug, Clone)]
pub struct SegmentationDatasetInit {
    /// The dataset directory containing `image` and `mask` folders.
    pub root: PathBuf,
    pub split: Split,
    /// The operating mode. It defaults to the split if not set.
    pub mode: Option<Mode>,
    pub kind: DatasetKind,
    /// It defaults to the preferred size of the dataset kind if not set.
    pub base_size: Option<SizeSpec>,
    /// The transform applied on the image at the end.
    pub transform: Option<Arc<dyn ImageTransform>>,
    pub color_jitter: Option<ColorJitterConfig>,
    /// If set, every transformed sample is written to this directory.
    pub debug_dir: Option<PathBuf>,
    /// If set, records with unreadable images are dropped when building the index.
    pub verify_images: bool,
    /// The maximum number of following records tried when an image fails to decode.
    pub max_decode_retries: usize,
    /// The fixed raster height of the skeleton validation path.
    pub val_height: NonZeroUsize,
}

impl SegmentationDatasetInit {
    pub fn new(root: impl Into<PathBuf>, split: Split, kind: DatasetKind) -> Self {
        Self {
            root: root.into(),
            split,
            mode: None,
            kind,
            base_size: None,
            transform: None,
            color_jitter: None,
            debug_dir: None,
            verify_images: false,
            max_decode_retries: DEFAULT_MAX_DECODE_RETRIES,
            val_height: DEFAULT_VAL_HEIGHT,
        }
    }

    pub fn build(self) -> Result<SegmentationDataset> {
        let Self {
            root,
            split,
            mode,
            kind,
            base_size,
            transform,
            color_jitter,
            debug_dir,
            verify_images,
            max_decode_retries,
            val_height,
        } = self;

        let mode = mode.unwrap_or_else(|| split.into());
        let base_size = match base_size {
            Some(spec) => spec.to_tuple()?,
            None => kind.default_base_size(),
        };
        let color_jitter = color_jitter_init(color_jitter.as_ref())?
            .map(|init| init.build())
            .transpose()?;

        ensure!(
            root.is_dir(),
            "please put the dataset in '{}'",
            root.display()
        );

        let records = discover_records(&root, kind.with_skeleton())?;
        let records = if verify_images {
            filter_readable(records)
        } else {
            records
        };
        if records.is_empty() {
            bail!("found 0 images in subfolders of '{}'", root.display());
        }

        info!(
            "loaded {} dataset '{}' with {} records, split {}, mode {}, size {}",
            kind,
            root.display(),
            records.len(),
            split,
            mode,
            base_size
        );

        Ok(SegmentationDataset {
            root,
            split,
            mode,
            kind,
            base_size,
            transform,
            color_jitter,
            class_map: ClassMap::binary(),
            records,
            debug_dir,
            max_decode_retries,
            val_height: val_height.get(),
        })
    }
}

/// The text segmentation dataset.
///
/// The index of file records is built once. Samples are not cached, every
/// access loads and transforms the files again.
#[derive(Debug)]
pub struct SegmentationDataset {
    root: PathBuf,
    split: Split,
    mode: Mode,
    kind: DatasetKind,
    base_size: BaseSize,
    transform: Option<Arc<dyn ImageTransform>>,
    color_jitter: Option<ColorJitter>,
    class_map: ClassMap,
    records: Vec<FileRecord>,
    debug_dir: Option<PathBuf>,
    max_decode_retries: usize,
    val_height: usize,
}

impl SegmentationDataset {
    /// Builds the dataset from the configuration file content.
    pub fn from_config(config: &Config) -> Result<Self> {
        let Config {
            root_path,
            dataset:
                DatasetConfig {
                    kind,
                    root,
                    split,
                    mode,
                    base_size,
                    debug,
                    debug_dir,
                    verify_images,
                    max_decode_retries,
                    val_height,
                },
            augmentation,
            normalize,
        } = config;

        let transform = match normalize {
            Some(normalize) => {
                let transform: Arc<dyn ImageTransform> = Arc::new(normalize.to_init().build()?);
                Some(transform)
            }
            None => None,
        };

        SegmentationDatasetInit {
            root: root_path.join(root),
            split: *split,
            mode: *mode,
            kind: *kind,
            base_size: base_size.clone(),
            transform,
            color_jitter: augmentation.color_jitter.clone(),
            debug_dir: debug.then(|| debug_dir.clone()),
            verify_images: *verify_images,
            max_decode_retries: *max_decode_retries,
            val_height: *val_height,
        }
        .build()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn base_size(&self) -> BaseSize {
        self.base_size
    }

    /// The color jitter built from configuration. It is not applied by the dataset.
    pub fn color_jitter(&self) -> Option<&ColorJitter> {
        self.color_jitter.as_ref()
    }

    pub fn pred_offset(&self) -> usize {
        0
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Loads and transforms the sample at `index`.
    ///
    /// If the image fails to decode, the following records are tried up to
    /// `max_decode_retries` times. The returned sample carries the path of
    /// the record that was actually decoded.
    pub fn get(&self, index: usize) -> Result<Sample> {
        let (index, image) = self.load_image(index)?;
        let record = &self.records[index];

        let rasters = match self.mode {
            Mode::Test => {
                let image = self.post_transform(image_to_array(image)?)?;
                return Ok(Sample::Test(TestSample {
                    image,
                    file_name: record.file_name(),
                }));
            }
            Mode::Train => {
                let (mask, skeleton) = load_labels(record)?;
                self.sync_transform(image, mask, skeleton)?
            }
            Mode::Val => {
                let (mask, skeleton) = load_labels(record)?;
                self.val_sync_transform(image, mask, skeleton)?
            }
            Mode::TestVal => {
                let (mask, skeleton) = load_labels(record)?;
                Rasters::from_images(image, mask, skeleton)?
            }
        };
        rasters
            .check_shape()
            .with_context(|| format!("invalid sample '{}'", record.image.display()))?;

        let Rasters {
            image,
            mask,
            skeleton,
        } = rasters;
        let classes = self
            .class_map
            .apply(&mask)
            .with_context(|| format!("invalid mask file '{}'", record.mask.display()))?;

        if let Some(dir) = &self.debug_dir {
            dump_sample(dir, &image, &classes)?;
        }

        Ok(Sample::Labeled(LabeledSample {
            image: self.post_transform(image)?,
            mask: classes.f_into_tensor()?,
            skeleton,
            path: record.image.clone(),
        }))
    }

    fn load_image(&self, index: usize) -> Result<(usize, RgbImage)> {
        let num_records = self.records.len();
        ensure!(
            index < num_records,
            "invalid index {}, the dataset has {} records",
            index,
            num_records
        );
        let last = index
            .saturating_add(self.max_decode_retries)
            .min(num_records - 1);

        for nth in index..=last {
            let path = &self.records[nth].image;
            match image::open(path) {
                Ok(image) => return Ok((nth, image.to_rgb8())),
                Err(err) => warn!("invalid image '{}': {}", path.display(), err),
            }
        }

        bail!(
            "unable to decode any image from index {} to {}",
            index,
            last
        )
    }

    /// The training transform. Every raster is resized to the base size.
    fn sync_transform(
        &self,
        image: RgbImage,
        mask: GrayImage,
        skeleton: Option<GrayImage>,
    ) -> Result<Rasters> {
        let size = self.base_size;
        Rasters::from_images(
            resize_image(&image, size),
            resize_label(&mask, size),
            skeleton.map(|skeleton| resize_label(&skeleton, size)),
        )
    }

    /// The validation transform.
    ///
    /// Image and mask pairs are resized to the base size like in training.
    /// With skeletons, rasters are scaled to a fixed height keeping the aspect
    /// ratio, and then cropped or padded to the base width.
    fn val_sync_transform(
        &self,
        image: RgbImage,
        mask: GrayImage,
        skeleton: Option<GrayImage>,
    ) -> Result<Rasters> {
        match self.kind {
            DatasetKind::TextSeg => self.sync_transform(image, mask, skeleton),
            DatasetKind::TotalText => {
                let height = self.val_height;
                let width = self.base_size.width;

                let image = {
                    let (w, h) = image.dimensions();
                    resize_image(&image, scaled_size(w, h, height)?)
                };
                let scale_label = |label: GrayImage| -> Result<_> {
                    let (w, h) = label.dimensions();
                    let label = resize_label(&label, scaled_size(w, h, height)?);
                    crop_pad_width(&label_to_array(label)?, width)
                };

                Ok(Rasters {
                    image: crop_pad_width(&image_to_array(image)?, width)?,
                    mask: scale_label(mask)?,
                    skeleton: skeleton.map(scale_label).transpose()?,
                })
            }
        }
    }

    fn post_transform(&self, image: Array3<u8>) -> Result<ImageOutput> {
        let output = match &self.transform {
            Some(transform) => ImageOutput::Tensor(transform.forward(&image)?),
            None => ImageOutput::Array(image),
        };
        Ok(output)
    }
}

impl GenericDataset for SegmentationDataset {
    fn input_channels(&self) -> usize {
        INPUT_CHANNELS
    }

    fn classes(&self) -> &[&'static str] {
        &CLASSES
    }
}

impl FileDataset for SegmentationDataset {
    fn records(&self) -> &[FileRecord] {
        &self.records
    }
}

impl RandomAccessDataset for SegmentationDataset {
    fn num_records(&self) -> usize {
        self.records.len()
    }

    fn nth(&self, index: usize) -> Result<Sample> {
        self.get(index)
    }
}

/// Aligned rasters of one sample.
#[derive(Debug)]
struct Rasters {
    image: Array3<u8>,
    mask: Array2<u8>,
    skeleton: Option<Array2<u8>>,
}

impl Rasters {
    fn from_images(image: RgbImage, mask: GrayImage, skeleton: Option<GrayImage>) -> Result<Self> {
        Ok(Self {
            image: image_to_array(image)?,
            mask: label_to_array(mask)?,
            skeleton: skeleton.map(label_to_array).transpose()?,
        })
    }

    fn check_shape(&self) -> Result<()> {
        let (height, width, _) = self.image.dim();
        ensure!(
            self.mask.dim() == (height, width),
            "mask size {:?} does not match image size {:?}",
            self.mask.dim(),
            (height, width)
        );
        if let Some(skeleton) = &self.skeleton {
            ensure!(
                skeleton.dim() == (height, width),
                "skeleton size {:?} does not match image size {:?}",
                skeleton.dim(),
                (height, width)
            );
        }
        Ok(())
    }
}

fn load_labels(record: &FileRecord) -> Result<(GrayImage, Option<GrayImage>)> {
    let mask = load_label(&record.mask)?;
    let skeleton = record.skeleton.as_deref().map(load_label).transpose()?;
    Ok((mask, skeleton))
}

/// Loads a single channel label raster keeping the raw pixel values.
///
/// 16-bit values are narrowed without rescaling. Values beyond 8 bits and
/// color images are rejected.
fn load_label(path: &Path) -> Result<GrayImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to load label file '{}'", path.display()))?;
    let label = match image {
        DynamicImage::ImageLuma8(label) => Ok(label),
        DynamicImage::ImageLumaA8(label) => {
            let (width, height) = label.dimensions();
            let values = label.into_raw().into_iter().step_by(2).map(u16::from);
            raw_label(width, height, values)
        }
        DynamicImage::ImageLuma16(label) => {
            let (width, height) = label.dimensions();
            raw_label(width, height, label.into_raw().into_iter())
        }
        DynamicImage::ImageLumaA16(label) => {
            let (width, height) = label.dimensions();
            raw_label(width, height, label.into_raw().into_iter().step_by(2))
        }
        image => Err(format_err!(
            "unsupported label color type {:?}, expect a grayscale image",
            image.color()
        )),
    }
    .with_context(|| format!("invalid label file '{}'", path.display()))?;
    Ok(label)
}

fn raw_label(width: u32, height: u32, values: impl Iterator<Item = u16>) -> Result<GrayImage> {
    let values: Vec<u8> = values
        .map(|value| {
            u8::try_from(value).map_err(|_| {
                format_err!("label value {} is out of the 8-bit range", value)
            })
        })
        .try_collect()?;
    GrayImage::from_raw(width, height, values)
        .ok_or_else(|| format_err!("the label buffer does not match size {}x{}", width, height))
}
