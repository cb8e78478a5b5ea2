pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Coincidence radius for wavefront event detection.
///
/// Coarser than [`TOLERANCE`]: offset vertices land on event points with
/// accumulated floating-point error, so the wavefront predicates accept a
/// wider band.
pub const EPSILON: f64 = 1e-6;
