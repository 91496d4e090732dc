//! Export of documents and layouts to text and JSON.

mod json;
mod options;
mod stats;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{PageSelection, RenderOptions};
pub use stats::{count_words, DocumentStats};
pub use text::to_text;
