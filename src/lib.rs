//! # richdoc
//!
//! Rich-text document engine for Rust.
//!
//! A document is three ordered element sequences (header, body and
//! footer). The engine lays elements out into rows and pages, edits them
//! through a single command catalog, keeps a bounded undo history and
//! answers queries such as search, word count and the heading catalog.
//!
//! ## Quick Start
//!
//! ```
//! use richdoc::{Command, EditorOptions, EditorSession};
//! use richdoc::model::{Document, Element};
//!
//! fn main() -> richdoc::Result<()> {
//!     let doc = Document::with_main(vec![Element::text("Hello")]);
//!     let mut session = EditorSession::new(doc, EditorOptions::default())?;
//!
//!     session.dispatch(Command::InsertText(", world".into()))?;
//!     session.set_range(0, 5)?;
//!     session.dispatch(Command::bold())?;
//!
//!     assert_eq!(session.plain_text()?, "Hello, world");
//!     assert_eq!(session.layout()?.page_count(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Element model**: text, images, tables, hyperlinks, checkboxes, dates,
//!   controls, separators and page breaks
//! - **Layout**: word wrapping, alignment, paginated or continuous pages
//! - **Commands**: one serializable catalog, gated by the editor mode
//! - **History**: snapshot undo/redo with a capacity bound
//! - **Search**: case-insensitive literal search with replace
//! - **CJK support**: per-character wrapping and word counting

pub mod catalog;
pub mod command;
pub mod debounce;
pub mod error;
pub mod history;
pub mod layout;
pub mod model;
pub mod options;
pub mod painter;
pub mod render;
pub mod selection;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use catalog::{build_catalog, CatalogEntry};
pub use command::{apply, Command, CommandContext, CommandOutput, Direction, StyleAttribute};
pub use error::{Error, Result};
pub use history::History;
pub use layout::{Layout, LayoutConfig, LayoutEngine, Page, Row};
pub use model::{load_document, Document, Element, ElementKind, ElementStyle, Zone};
pub use options::{EditorMode, EditorOptions, Margins, PageMode, PaperDirection};
pub use painter::PainterGesture;
pub use render::{DocumentStats, JsonFormat, PageSelection, RenderOptions};
pub use selection::Selection;
pub use session::{EditorListener, EditorSession, SearchNavigateInfo};

use std::path::Path;

/// Open an editing session on a JSON document file.
///
/// # Example
///
/// ```no_run
/// use richdoc::{open_file, EditorOptions};
///
/// let session = open_file("document.json", EditorOptions::default()).unwrap();
/// println!("Words: {}", session.word_count().unwrap());
/// ```
pub fn open_file<P: AsRef<Path>>(path: P, options: EditorOptions) -> Result<EditorSession> {
    let doc = load_document(path)?;
    EditorSession::new(doc, options)
}

/// Lay out a document with the given options.
pub fn layout_document(doc: &Document, options: &EditorOptions) -> Result<Layout> {
    options.validate()?;
    Ok(LayoutEngine::new(LayoutConfig::from(options)).layout(doc))
}

/// Extract page-oriented plain text from a JSON document file.
///
/// # Example
///
/// ```no_run
/// use richdoc::extract_text;
///
/// let text = extract_text("document.json").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = load_document(path)?;
    let layout = layout_document(&doc, &EditorOptions::default())?;
    render::to_text(&doc, &layout, &RenderOptions::default())
}
