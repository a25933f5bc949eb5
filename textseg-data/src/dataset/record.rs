use crate::common::*;

/// The record with image and label paths, but without pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub image: PathBuf,
    pub mask: PathBuf,
    pub skeleton: Option<PathBuf>,
}

impl FileRecord {
    /// The base file name of the image.
    pub fn file_name(&self) -> String {
        self.image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The image part of a sample.
#[derive(Debug)]
pub enum ImageOutput {
    /// Raw H×W×3 pixels.
    Array(Array3<u8>),
    /// The output of the post-transform.
    Tensor(Tensor),
}

impl ImageOutput {
    pub fn as_array(&self) -> Option<&Array3<u8>> {
        match self {
            Self::Array(array) => Some(array),
            Self::Tensor(_) => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Self::Tensor(tensor) => Some(tensor),
            Self::Array(_) => None,
        }
    }
}

/// The sample returned in test mode.
#[derive(Debug)]
pub struct TestSample {
    pub image: ImageOutput,
    pub file_name: String,
}

/// The sample with labels.
#[derive(Debug)]
pub struct LabeledSample {
    pub image: ImageOutput,
    /// The H×W class index tensor of kind `Int64`.
    pub mask: Tensor,
    /// The H×W skeleton raster of the skeleton variant.
    pub skeleton: Option<Array2<u8>>,
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum Sample {
    Test(TestSample),
    Labeled(LabeledSample),
}

impl Sample {
    pub fn image(&self) -> &ImageOutput {
        match self {
            Self::Test(sample) => &sample.image,
            Self::Labeled(sample) => &sample.image,
        }
    }

    pub fn into_labeled(self) -> Result<LabeledSample> {
        match self {
            Self::Labeled(sample) => Ok(sample),
            Self::Test(sample) => bail!("the sample '{}' has no labels", sample.file_name),
        }
    }

    pub fn into_test(self) -> Result<TestSample> {
        match self {
            Self::Test(sample) => Ok(sample),
            Self::Labeled(sample) => bail!(
                "the sample '{}' is not a test sample",
                sample.path.display()
            ),
        }
    }
}
