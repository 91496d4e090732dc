//! Document model types.
//!
//! A document is three ordered element sequences (header, body, footer).
//! Elements are plain values; edits replace them through the store rather
//! than mutating shared state, which keeps history snapshots cheap to reason
//! about.

mod date;
mod document;
mod element;
mod table;

pub use date::{format_date, to_chrono_pattern};
pub use document::{load_document, Document, Zone};
pub use element::{
    split_elements, Element, ElementKind, ElementStyle, RowFlex, Title, NEWLINE,
};
pub use table::{Table, TableCell, TableRow};
