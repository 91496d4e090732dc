//! Document-level types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::element::split_elements;
use super::Element;
use crate::error::Result;
use crate::store::ElementStore;

/// A document: three independent element sequences.
///
/// Only `main` is addressed by search and the catalog; header and footer
/// are repeated on every laid-out page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Elements repeated at the top of each page
    #[serde(default)]
    pub header: ElementStore,

    /// Document body
    #[serde(default)]
    pub main: ElementStore,

    /// Elements repeated at the bottom of each page
    #[serde(default)]
    pub footer: ElementStore,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a body element list.
    pub fn with_main(main: Vec<Element>) -> Self {
        Self::from_zones(Vec::new(), main, Vec::new())
    }

    /// Create a document from header, body and footer element lists.
    ///
    /// Text values are split into per-character elements.
    pub fn from_zones(header: Vec<Element>, main: Vec<Element>, footer: Vec<Element>) -> Self {
        Self {
            header: split_elements(header).into(),
            main: split_elements(main).into(),
            footer: split_elements(footer).into(),
        }
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Document = serde_json::from_str(json)?;
        Ok(raw.normalized())
    }

    /// Split multi-character text elements in every zone.
    pub fn normalized(self) -> Self {
        Self::from_zones(
            self.header.into_vec(),
            self.main.into_vec(),
            self.footer.into_vec(),
        )
    }

    /// Get a zone.
    pub fn zone(&self, zone: Zone) -> &ElementStore {
        match zone {
            Zone::Header => &self.header,
            Zone::Main => &self.main,
            Zone::Footer => &self.footer,
        }
    }

    /// Get a zone for editing.
    pub fn zone_mut(&mut self, zone: Zone) -> &mut ElementStore {
        match zone {
            Zone::Header => &mut self.header,
            Zone::Main => &mut self.main,
            Zone::Footer => &mut self.footer,
        }
    }

    /// Check if all zones are empty.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.main.is_empty() && self.footer.is_empty()
    }

    /// Get plain text content of the body.
    pub fn plain_text(&self) -> String {
        self.main.plain_text()
    }
}

/// Load a document from a JSON file.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let json = std::fs::read_to_string(path)?;
    Document::from_json(&json)
}

/// One of the three element sequences of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Page header
    Header,
    /// Document body
    #[default]
    Main,
    /// Page footer
    Footer,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Header => f.write_str("header"),
            Zone::Main => f.write_str("main"),
            Zone::Footer => f.write_str("footer"),
        }
    }
}
