//! Dataset loading and augmentation toolkit for binary text segmentation.

mod common;
pub mod config;
pub mod dataset;
pub mod processor;
pub mod tensor;
