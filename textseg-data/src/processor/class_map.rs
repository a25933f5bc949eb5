//! Raw mask value to class index mapping.

use crate::common::*;

/// Maps raw mask pixel values to contiguous class indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    /// Known raw values in ascending order.
    values: Vec<i64>,
    /// The class index of each known raw value.
    indices: Vec<i64>,
}

impl ClassMap {
    pub fn new(values: Vec<i64>, indices: Vec<i64>) -> Result<Self> {
        ensure!(
            values.len() == indices.len(),
            "the number of raw values ({}) and class indices ({}) do not match",
            values.len(),
            indices.len()
        );
        ensure!(!values.is_empty(), "the class map must not be empty");

        let mut pairs: Vec<_> = values.into_iter().zip(indices).collect();
        pairs.sort_by_key(|&(value, _)| value);
        ensure!(
            pairs.windows(2).all(|pair| pair[0].0 != pair[1].0),
            "duplicated raw values in the class map"
        );
        let (values, indices) = pairs.into_iter().unzip();

        Ok(Self { values, indices })
    }

    /// The mapping of binary text masks, `0 => background` and `1 => text`.
    pub fn binary() -> Self {
        Self {
            values: vec![0, 1],
            indices: vec![0, 1],
        }
    }

    pub fn num_classes(&self) -> usize {
        self.indices.iter().unique().count()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Maps every pixel of the mask to its class index.
    ///
    /// It fails if any pixel value is not a known raw value.
    pub fn apply<A, S>(&self, mask: &ArrayBase<S, ndarray::Ix2>) -> Result<Array2<i64>>
    where
        A: Copy + Into<i64>,
        S: Data<Elem = A>,
    {
        let unknown: Vec<i64> = mask
            .iter()
            .map(|&value| -> i64 { value.into() })
            .filter(|value| self.values.binary_search(value).is_err())
            .unique()
            .sorted()
            .collect();
        ensure!(
            unknown.is_empty(),
            "mask values {:?} are not in the known value set {:?}",
            unknown,
            self.values
        );

        let output = mask.mapv(|value| {
            let value: i64 = value.into();
            // lookup never fails since unknown values are rejected above
            let index = self.values.binary_search(&value).unwrap_or(0);
            self.indices[index]
        });
        Ok(output)
    }
}

impl Default for ClassMap {
    fn default() -> Self {
        Self::binary()
    }
}
