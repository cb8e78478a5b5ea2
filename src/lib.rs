pub mod error;
pub mod math;
pub mod skeleton;

pub use error::{Diagnostic, PolygonError, Result, SkelisError};
pub use skeleton::{generate, GeneratedSkeleton, StraightSkeleton, StraightSkeletonGenerator};
