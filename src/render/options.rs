//! Export options.

use std::ops::RangeInclusive;

/// Options for text export.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit header rows at the top of each page
    pub include_header: bool,

    /// Emit footer rows at the bottom of each page
    pub include_footer: bool,

    /// Pages to export
    pub page_selection: PageSelection,

    /// Text placed between pages
    pub page_separator: String,

    /// Text drawn for a separator element
    pub separator_line: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include header and footer rows.
    pub fn with_header_footer(mut self) -> Self {
        self.include_header = true;
        self.include_footer = true;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set the text placed between pages.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_header: false,
            include_footer: false,
            page_selection: PageSelection::All,
            page_separator: "\n\n".to_string(),
            separator_line: "-".repeat(40),
        }
    }
}

/// Page selection for export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Export all pages
    #[default]
    All,
    /// Export a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Export specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection such as `all`, `2-4` or `1,3,5-6`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let mut pages = Vec::new();
        for part in s.split(',').map(str::trim) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = parse_page(end)?;
                    if start > end {
                        return Err(format!("Invalid page range: {}", part));
                    }
                    pages.extend(start..=end);
                }
                None => pages.push(parse_page(part)?),
            }
        }

        if let [first, .., last] = pages.as_slice() {
            if pages.windows(2).all(|w| w[1] == w[0] + 1) {
                return Ok(PageSelection::Range(*first..=*last));
            }
        }
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err("Page numbers start at 1".to_string()),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("Invalid page number: {}", s.trim())),
    }
}
