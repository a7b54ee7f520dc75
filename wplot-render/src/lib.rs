pub mod buffer;
pub mod colorize;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod value_buffer;
pub mod worker;

pub use buffer::RenderBuffer;
pub use colorize::{colorize, ColorMode, DomainStyle};
pub use error::RenderError;
pub use evaluator::{evaluate, evaluate_band, evaluate_par};
pub use export::{export_png, ExportMetadata};
pub use value_buffer::ValueBuffer;
pub use worker::{
    colorize_worker, evaluation_worker, ColorRequest, ColorResponse, EvalRequest, EvalResponse,
};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
