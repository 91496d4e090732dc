//! Error types for the richdoc engine.

use std::io;
use thiserror::Error;

use crate::options::EditorMode;

/// Result type alias for richdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while editing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document, option set or command script could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// A position or index lies outside the addressed sequence.
    #[error("Position {position} is out of range (length {len})")]
    OutOfRange {
        /// Offending position
        position: usize,
        /// Length of the addressed sequence
        len: usize,
    },

    /// A selection range is inverted or exceeds the zone length.
    #[error("Invalid range {start}..{end} (length {len})")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end
        end: usize,
        /// Length of the zone
        len: usize,
    },

    /// The command needs a non-empty selection.
    #[error("Command requires a non-empty selection")]
    NoSelection,

    /// Replace was issued without a search that produced a match.
    #[error("No active search match")]
    NoActiveSearch,

    /// The command is not allowed in the current editor mode.
    #[error("Command '{command}' is not allowed in {mode} mode")]
    ModeRestricted {
        /// Name of the rejected command
        command: &'static str,
        /// Mode the session was in
        mode: EditorMode,
    },

    /// The session has been destroyed.
    #[error("Editor session has been destroyed")]
    Disposed,

    /// A table command was issued while the cursor is not at a table.
    #[error("No table at cursor")]
    NoTable,

    /// An element cannot be inserted as given.
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// Editor options are inconsistent.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Error during export (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
