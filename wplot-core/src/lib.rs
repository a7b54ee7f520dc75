pub mod error;
pub mod expression;
pub mod projection;
pub mod viewport;

// Re-export primary types for convenience.
pub use error::CoreError;
pub use expression::{Builtin, Expression};
pub use num_complex::Complex64;
pub use projection::Projection;
pub use viewport::Viewport;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
