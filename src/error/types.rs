use thiserror::Error;

/// Unified result type for the Mosaic MVP crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the tiling engine.
///
/// Only malformed input is an error. A structurally impossible request
/// (swapping toward a container edge, closing the last pane) is a silent
/// no-op by design; callers check preconditions.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown side token `{0}`")]
    UnknownSide(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("malformed command `{0}`")]
    MalformedCommand(String),
    #[error("cannot resize container to {width}x{height}")]
    InvalidResize { width: u16, height: u16 },
}
