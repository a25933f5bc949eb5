use super::*;
use crate::common::*;

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Debug + Send + Sync,
{
    /// The number of color channels of the dataset.
    fn input_channels(&self) -> usize;

    /// The list of class names of the dataset.
    fn classes(&self) -> &[&'static str];

    /// The number of classes.
    fn num_class(&self) -> usize {
        self.classes().len()
    }
}

/// The dataset with a list of file paths.
pub trait FileDataset
where
    Self: GenericDataset,
{
    /// Get the list of file records in the dataset.
    fn records(&self) -> &[FileRecord];
}

/// The dataset that can be random accessed.
///
/// Every access reads and transforms the files again, so that records can be
/// fetched independently from different threads.
pub trait RandomAccessDataset
where
    Self: GenericDataset,
{
    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Get the nth sample in the dataset.
    fn nth(&self, index: usize) -> Result<Sample>;
}
