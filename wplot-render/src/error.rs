use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("value buffer has {values} values but image has {pixels} pixels")]
    SizeMismatch { values: usize, pixels: usize },

    #[error("band assembly incomplete: got {got} of {expected} rows")]
    IncompleteAssembly { got: u32, expected: u32 },

    #[error(transparent)]
    Core(#[from] wplot_core::CoreError),

    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
