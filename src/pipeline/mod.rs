//! Design-to-implementation comparison pipeline.

mod compare;
mod result;

pub use compare::{CompareDesign, ComparisonRequest, Config, DEFAULT_MAX_INLINE_BYTES, Pipeline};
pub use result::{ComparisonResult, DiffImage, difference_percentage, package};
