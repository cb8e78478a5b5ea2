pub mod builder;
pub mod event;
pub mod generator;
pub mod plan;
pub mod resolve;

pub use builder::{SkeletonBuilder, StraightSkeleton};
pub use event::IntersectionEvent;
pub use generator::{generate, GeneratedSkeleton, StraightSkeletonGenerator};
pub use plan::{Plan, Vertex, VertexId};
