use thiserror::Error;

/// Errors originating from the core plotting model.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("unknown function: {0:?}")]
    UnknownFunction(String),

    #[error("unknown colorization mode: {0:?}")]
    UnknownMode(String),

    #[error("expression evaluation failed at w = {re} + {im}i: {reason}")]
    Evaluation { re: f64, im: f64, reason: String },
}
