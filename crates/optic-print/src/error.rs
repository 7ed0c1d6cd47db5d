//! # Render Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  render_receipt()                                                       │
//! │       │                                                                 │
//! │       ├── font registration, page composition ──► RenderError::Content │
//! │       │                                                                 │
//! │       └── writing the PDF byte stream ──────────► RenderError::Stream  │
//! │                                                                         │
//! │  Either way the caller gets an error and no bytes.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Document generation failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Composing page content failed.
    #[error("PDF content generation error: {0}")]
    Content(String),

    /// Serializing the document to bytes failed.
    #[error("PDF stream error: {0}")]
    Stream(String),
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;
