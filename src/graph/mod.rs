//! The file dependency graph: mirrored forward/reverse import maps,
//! parallel construction, and cycle detection.

pub mod builder;
pub mod cycles;
pub mod engine;

pub use engine::DependencyGraph;
