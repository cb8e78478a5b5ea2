use thiserror::Error;

/// Top-level error type for the skelis skeleton generator.
#[derive(Debug, Error)]
pub enum SkelisError {
    #[error(transparent)]
    Polygon(#[from] PolygonError),
}

/// Errors raised while validating an input footprint polygon.
#[derive(Debug, Error)]
pub enum PolygonError {
    #[error("polygon must have at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("consecutive vertices at index {index} are coincident")]
    DuplicatePoint { index: usize },

    #[error("polygon has zero area")]
    ZeroArea,
}

/// Recoverable conditions encountered while generating a skeleton.
///
/// These are never returned as an `Err`: the generator logs them, degrades
/// to a partial skeleton and records what happened, so callers (e.g. roof
/// builders) can decide whether the partial result is acceptable or fall
/// back to a flat cap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("no finite offset candidate for an active wavefront; plan dropped")]
    UnresolvableOffset,

    #[error("iteration budget of {budget} exceeded; returning partial skeleton")]
    IterationBudgetExceeded { budget: usize },

    #[error("wavefront degenerated to a {vertices}-vertex loop")]
    DegeneratePlan { vertices: usize },

    #[error("vertex bisector is degenerate; wavefront cannot advance there")]
    InvalidBisector,
}

/// Convenience type alias for results using [`SkelisError`].
pub type Result<T> = std::result::Result<T, SkelisError>;
