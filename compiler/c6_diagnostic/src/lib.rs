//! Diagnostics for the c6 compiler.
//!
//! The pipeline stages only produce [`Diagnostic`] values: a code, a file,
//! a byte span and a message. Turning a byte offset into a line and column,
//! and rendering a caret excerpt, happens here and only when a diagnostic
//! is actually shown.

mod diagnostic;
mod error_code;
mod line_index;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use line_index::LineIndex;
