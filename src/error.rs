// Errors for the outer surfaces only (window + command line).
// Stroke sampling, meshing and history never fail; their edge cases are
// silent no-ops handled where they are detected.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("Window init error: {0}")]
    WindowInit(String),
    /// Pushing a frame to the window failed.
    #[error("Window update error: {0}")]
    WindowUpdate(String),
    /// Brush limits that would produce an empty or inverted thickness range.
    #[error("Invalid brush: {0}")]
    InvalidBrush(String),
}
