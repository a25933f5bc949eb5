use crate::{common::*, config::BaseSize};

/// The dataset split.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
    TestVal,
}

/// The operating mode which selects the per-sample transform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Resize to the base size.
    Train,
    /// Validation transform.
    Val,
    /// Image only, no label is loaded.
    Test,
    /// No resizing.
    TestVal,
}

impl From<Split> for Mode {
    fn from(split: Split) -> Self {
        match split {
            Split::Train => Self::Train,
            Split::Val => Self::Val,
            Split::Test => Self::Test,
            Split::TestVal => Self::TestVal,
        }
    }
}

/// The dataset variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// Image and mask pairs.
    TextSeg,
    /// Image, mask and skeleton triples.
    TotalText,
}

impl DatasetKind {
    pub fn default_base_size(&self) -> BaseSize {
        match self {
            Self::TextSeg => BaseSize::new(128, 32),
            Self::TotalText => BaseSize::new(128, 128),
        }
    }

    pub fn with_skeleton(&self) -> bool {
        matches!(self, Self::TotalText)
    }
}
