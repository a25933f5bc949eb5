//! Dataset processing toolkit.

mod dataset_;
mod debug;
mod mode;
mod pairing;
mod record;
mod segmentation;

pub use dataset_::*;
pub use debug::*;
pub use mode::*;
pub use pairing::*;
pub use record::*;
pub use segmentation::*;
