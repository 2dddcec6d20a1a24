//! Core projection logic

pub mod edge;
pub mod projection;

// Re-export commonly used types
pub use edge::{evaluate_edge, suggested_line};
pub use projection::{project, project_with_rest, ProjectionEngine};
