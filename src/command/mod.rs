//! Command catalog and the `apply` dispatcher.
//!
//! Every edit of a document goes through [`apply`]. It never mutates its
//! inputs: a successful mutating command returns a fresh [`Document`] in its
//! [`Transition`], and a failing command returns an error without side
//! effects on the document or the selection.

mod format;
mod insert;
mod search;
mod table;

pub use format::{paragraph_ranges, PainterStyle, StyleAttribute};
pub use search::{Direction, SearchState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::model::{Document, Element, ElementKind, ElementStyle, RowFlex, Zone};
use crate::options::{EditorMode, EditorOptions, PageMode, PaperDirection};
use crate::selection::Selection;

/// A document command with its typed arguments.
///
/// Commands serialize as `{"command": "<name>", "args": ...}`, which is the
/// format of CLI command scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    /// Replace the selection with elements
    InsertElements(Vec<Element>),
    /// Type text at the cursor
    InsertText(String),
    /// Insert an image of declared size
    InsertImage {
        /// Image source, typically a data URL
        src: String,
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
    },
    /// Insert a hyperlink
    InsertHyperlink {
        /// Link text; the URL is shown when empty
        text: String,
        /// Link target
        url: String,
    },
    /// Insert a checkbox
    InsertCheckbox {
        /// Initial state
        #[serde(default)]
        checked: bool,
    },
    /// Insert a date stamp
    InsertDate {
        /// Display pattern such as `yyyy-MM-dd`
        format: String,
        /// Stamp; the current time when absent
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// Insert a control (code block)
    InsertControl(String),
    /// Insert a horizontal separator
    InsertSeparator,
    /// Insert a page break
    InsertPageBreak,
    /// Insert an empty table spanning the content width
    InsertTable {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
    /// Apply a formatting attribute to the selection
    FormatRange(StyleAttribute),
    /// Align the paragraphs touched by the selection
    RowFlex(RowFlex),
    /// Turn the touched paragraphs into headings, or back into body text
    Title(Option<u8>),
    /// Reset formatting of the selection, or of the whole zone at a cursor
    ClearFormat,
    /// Delete the selection or the element before the cursor
    Backspace,
    /// Delete the selection or the element after the cursor
    DeleteForward,
    /// Search the body; `None` or an empty keyword clears the search
    Search(Option<String>),
    /// Move to the next or previous match
    SearchNavigate(Direction),
    /// Replace the focused match
    Replace(String),
    /// Replace every match
    ReplaceAll(String),
    /// Undo the last edit
    Undo,
    /// Redo the last undone edit
    Redo,
    /// Capture the selection style for painting
    Painter {
        /// Persistent painting instead of single-shot
        #[serde(default)]
        double_click: bool,
    },
    /// Paint the captured style onto the selection
    ApplyPainter,
    /// Drop the captured style
    CancelPainter,
    /// Switch the interaction mode
    SetMode(EditorMode),
    /// Switch between paged and continuous layout
    PageMode(PageMode),
    /// Switch paper orientation
    PaperDirection(PaperDirection),
    /// Insert a row into the table at the cursor
    TableInsertRow {
        /// Row index the new row takes
        at: usize,
    },
    /// Insert a column into the table at the cursor
    TableInsertCol {
        /// Column index the new column takes
        at: usize,
    },
    /// Delete a row of the table at the cursor
    TableDeleteRow {
        /// Row index
        row: usize,
    },
    /// Delete a column of the table at the cursor
    TableDeleteCol {
        /// Column index
        col: usize,
    },
    /// Set the text of a cell of the table at the cursor
    SetTableCell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// New cell text
        value: String,
    },
    /// Remove the table at the cursor
    DeleteTable,
    /// Tick or untick a checkbox in the active zone
    SetCheckbox {
        /// Element index
        index: usize,
        /// New state
        checked: bool,
    },
    /// Fill a control in the active zone
    SetControlValue {
        /// Element index
        index: usize,
        /// New text
        value: String,
    },
    /// Move the cursor to a heading
    LocationCatalog(String),
    /// Make another zone active
    SwitchZone(Zone),
    /// Replace the editor options
    UpdateOptions(EditorOptions),
    /// Lay out the document for printing
    Print,
}

impl Command {
    /// Toggle bold on the selection.
    pub fn bold() -> Self {
        Command::FormatRange(StyleAttribute::Bold)
    }

    /// Toggle italic on the selection.
    pub fn italic() -> Self {
        Command::FormatRange(StyleAttribute::Italic)
    }

    /// Toggle underline on the selection.
    pub fn underline() -> Self {
        Command::FormatRange(StyleAttribute::Underline)
    }

    /// Search for `keyword`.
    pub fn search(keyword: impl Into<String>) -> Self {
        Command::Search(Some(keyword.into()))
    }

    /// Command name as it appears in scripts and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Command::InsertElements(_) => "insert_elements",
            Command::InsertText(_) => "insert_text",
            Command::InsertImage { .. } => "insert_image",
            Command::InsertHyperlink { .. } => "insert_hyperlink",
            Command::InsertCheckbox { .. } => "insert_checkbox",
            Command::InsertDate { .. } => "insert_date",
            Command::InsertControl(_) => "insert_control",
            Command::InsertSeparator => "insert_separator",
            Command::InsertPageBreak => "insert_page_break",
            Command::InsertTable { .. } => "insert_table",
            Command::FormatRange(_) => "format_range",
            Command::RowFlex(_) => "row_flex",
            Command::Title(_) => "title",
            Command::ClearFormat => "clear_format",
            Command::Backspace => "backspace",
            Command::DeleteForward => "delete_forward",
            Command::Search(_) => "search",
            Command::SearchNavigate(_) => "search_navigate",
            Command::Replace(_) => "replace",
            Command::ReplaceAll(_) => "replace_all",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Painter { .. } => "painter",
            Command::ApplyPainter => "apply_painter",
            Command::CancelPainter => "cancel_painter",
            Command::SetMode(_) => "set_mode",
            Command::PageMode(_) => "page_mode",
            Command::PaperDirection(_) => "paper_direction",
            Command::TableInsertRow { .. } => "table_insert_row",
            Command::TableInsertCol { .. } => "table_insert_col",
            Command::TableDeleteRow { .. } => "table_delete_row",
            Command::TableDeleteCol { .. } => "table_delete_col",
            Command::SetTableCell { .. } => "set_table_cell",
            Command::DeleteTable => "delete_table",
            Command::SetCheckbox { .. } => "set_checkbox",
            Command::SetControlValue { .. } => "set_control_value",
            Command::LocationCatalog(_) => "location_catalog",
            Command::SwitchZone(_) => "switch_zone",
            Command::UpdateOptions(_) => "update_options",
            Command::Print => "print",
        }
    }

    /// Check if the command may run in `mode`.
    pub fn allowed_in(&self, mode: EditorMode) -> bool {
        let always = matches!(
            self,
            Command::Search(_)
                | Command::SearchNavigate(_)
                | Command::Print
                | Command::SetMode(_)
                | Command::LocationCatalog(_)
        );
        match mode {
            EditorMode::Edit | EditorMode::Clean | EditorMode::Design => true,
            EditorMode::Readonly | EditorMode::Print => always,
            EditorMode::Form => {
                always
                    || matches!(
                        self,
                        Command::SetCheckbox { .. }
                            | Command::SetControlValue { .. }
                            | Command::Undo
                            | Command::Redo
                    )
            }
        }
    }
}

/// Value produced by a command besides its edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutput {
    /// Nothing to report
    #[default]
    None,
    /// A search ran
    Matches {
        /// Number of matches
        count: usize,
    },
    /// The focused match moved
    Navigated {
        /// Position of the focused match (1-indexed)
        index: usize,
        /// Number of matches
        count: usize,
    },
    /// Replacements were made
    Replaced {
        /// Number of replaced matches
        count: usize,
    },
    /// The cursor moved to a heading
    Located {
        /// Body index of the cursor
        index: usize,
    },
    /// The document was laid out for printing
    Printed {
        /// Number of pages
        pages: u32,
    },
}

/// Editor state that commands read and update besides the document.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Current options
    pub options: EditorOptions,
    /// Search keyword and matches
    pub search: SearchState,
    /// Style recorded at a collapsed cursor for the next typed text
    pub pending_style: Option<ElementStyle>,
    /// Style captured by the format painter
    pub painter: Option<PainterStyle>,
    next_id: u64,
}

impl CommandContext {
    /// Create a context for `options`.
    pub fn new(options: EditorOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Allocate an identifier such as `hyperlink-3`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    /// Check if the format painter holds a style.
    pub fn is_painting(&self) -> bool {
        self.painter.is_some()
    }
}

/// Outcome of applying a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The edited document; `None` when the command did not mutate
    pub document: Option<Document>,
    /// Selection after the command
    pub selection: Selection,
    /// Active zone after the command
    pub zone: Zone,
    /// Reported value
    pub output: CommandOutput,
}

impl Transition {
    /// A transition that leaves the document alone.
    pub fn unchanged(zone: Zone, selection: Selection) -> Self {
        Self {
            document: None,
            selection,
            zone,
            output: CommandOutput::None,
        }
    }

    /// A transition to an edited document.
    pub fn edited(document: Document, zone: Zone, selection: Selection) -> Self {
        Self {
            document: Some(document),
            selection,
            zone,
            output: CommandOutput::None,
        }
    }

    /// Attach an output.
    pub fn with_output(mut self, output: CommandOutput) -> Self {
        self.output = output;
        self
    }

    /// Whether the command produced a new document.
    pub fn mutated(&self) -> bool {
        self.document.is_some()
    }
}

/// Apply `command` to `doc` with `selection` in `zone`.
///
/// Undo and redo leave the document alone here; the session resolves them
/// against its history. A command whose result equals the input document
/// reports no mutation.
pub fn apply(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    command: &Command,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let mode = ctx.options.mode;
    if !command.allowed_in(mode) {
        return Err(Error::ModeRestricted {
            command: command.name(),
            mode,
        });
    }
    let len = doc.zone(zone).len();
    let selection = Selection::new(selection.start(), selection.end(), len)?;

    log::debug!(
        "Applying '{}' in {} at {}..{}",
        command.name(),
        zone,
        selection.start(),
        selection.end()
    );

    let mut transition = match command {
        Command::InsertElements(elements) => {
            insert::insert_elements(doc, zone, selection, elements.clone(), ctx)?
        }
        Command::InsertText(text) => insert::insert_text(doc, zone, selection, text, ctx)?,
        Command::InsertImage { src, width, height } => {
            if !(*width > 0.0 && *height > 0.0) {
                return Err(Error::InvalidElement(format!(
                    "image size must be positive, got {}x{}",
                    width, height
                )));
            }
            let image = Element::image(src.clone(), *width, *height);
            insert::insert_elements(doc, zone, selection, vec![image], ctx)?
        }
        Command::InsertHyperlink { text, url } => {
            insert::insert_hyperlink(doc, zone, selection, text, url, ctx)?
        }
        Command::InsertCheckbox { checked } => {
            insert::insert_elements(doc, zone, selection, vec![Element::checkbox(*checked)], ctx)?
        }
        Command::InsertDate { format, at } => {
            let date = Element::date(format.clone(), at.unwrap_or_else(Utc::now));
            insert::insert_elements(doc, zone, selection, vec![date], ctx)?
        }
        Command::InsertControl(value) => {
            insert::insert_elements(doc, zone, selection, vec![Element::control(value.clone())], ctx)?
        }
        Command::InsertSeparator => {
            insert::insert_elements(doc, zone, selection, vec![Element::separator()], ctx)?
        }
        Command::InsertPageBreak => {
            insert::insert_elements(doc, zone, selection, vec![Element::page_break()], ctx)?
        }
        Command::InsertTable { rows, cols } => {
            let table = crate::model::Table::new(
                *rows,
                *cols,
                ctx.options.content_width(),
                ctx.options.table_row_height,
            )?;
            insert::insert_elements(doc, zone, selection, vec![Element::table(table)], ctx)?
        }
        Command::FormatRange(attribute) => {
            format::format_range(doc, zone, selection, attribute, ctx)?
        }
        Command::RowFlex(row_flex) => format::set_row_flex(doc, zone, selection, *row_flex)?,
        Command::Title(level) => format::set_title(doc, zone, selection, *level, ctx)?,
        Command::ClearFormat => format::clear_format(doc, zone, selection)?,
        Command::Backspace => insert::backspace(doc, zone, selection)?,
        Command::DeleteForward => insert::delete_forward(doc, zone, selection)?,
        Command::Search(keyword) => {
            let count = ctx.search.search(doc, keyword.as_deref());
            Transition::unchanged(zone, selection).with_output(CommandOutput::Matches { count })
        }
        Command::SearchNavigate(direction) => match ctx.search.navigate(*direction) {
            Some(range) => {
                let found = Selection::new(range.start, range.end, doc.main.len())?;
                let (index, count) = ctx.search.position().unwrap_or((0, 0));
                Transition::unchanged(Zone::Main, found)
                    .with_output(CommandOutput::Navigated { index, count })
            }
            None => Transition::unchanged(zone, selection),
        },
        Command::Replace(text) => search::replace(doc, text, ctx)?,
        Command::ReplaceAll(text) => search::replace_all(doc, text, ctx)?,
        Command::Undo | Command::Redo => Transition::unchanged(zone, selection),
        Command::Painter { double_click } => {
            format::capture_painter(doc, zone, selection, *double_click, ctx)
        }
        Command::ApplyPainter => format::apply_painter(doc, zone, selection, ctx)?,
        Command::CancelPainter => {
            ctx.painter = None;
            Transition::unchanged(zone, selection)
        }
        Command::SetMode(mode) => {
            ctx.options.mode = *mode;
            Transition::unchanged(zone, selection)
        }
        Command::PageMode(page_mode) => {
            ctx.options.page_mode = *page_mode;
            Transition::unchanged(zone, selection)
        }
        Command::PaperDirection(direction) => {
            let mut options = ctx.options.clone();
            options.paper_direction = *direction;
            options.validate()?;
            ctx.options = options;
            Transition::unchanged(zone, selection)
        }
        Command::UpdateOptions(options) => {
            options.validate()?;
            ctx.options = options.clone();
            Transition::unchanged(zone, selection)
        }
        Command::TableInsertRow { at } => {
            table::edit_table(doc, zone, selection, |t| t.insert_row(*at))?
        }
        Command::TableInsertCol { at } => {
            table::edit_table(doc, zone, selection, |t| t.insert_col(*at))?
        }
        Command::TableDeleteRow { row } => {
            table::edit_table(doc, zone, selection, |t| t.delete_row(*row))?
        }
        Command::TableDeleteCol { col } => {
            table::edit_table(doc, zone, selection, |t| t.delete_col(*col))?
        }
        Command::SetTableCell { row, col, value } => {
            table::edit_table(doc, zone, selection, |t| t.set_cell(*row, *col, value.clone()))?
        }
        Command::DeleteTable => table::delete_table(doc, zone, selection)?,
        Command::SetCheckbox { index, checked } => {
            edit_field(doc, zone, selection, *index, |kind, _| match kind {
                ElementKind::Checkbox { checked: state } => {
                    *state = *checked;
                    true
                }
                _ => false,
            })?
        }
        Command::SetControlValue { index, value } => {
            edit_field(doc, zone, selection, *index, |kind, current| match kind {
                ElementKind::Control { .. } => {
                    *current = value.clone();
                    true
                }
                _ => false,
            })?
        }
        Command::LocationCatalog(id) => {
            let index = doc
                .main
                .iter()
                .rposition(|e| e.title.as_ref().is_some_and(|t| &t.id == id))
                .ok_or_else(|| Error::InvalidElement(format!("no heading with id '{}'", id)))?;
            Transition::unchanged(Zone::Main, Selection::collapsed(index + 1))
                .with_output(CommandOutput::Located { index: index + 1 })
        }
        Command::SwitchZone(target) => {
            let end = doc.zone(*target).len();
            Transition::unchanged(*target, Selection::collapsed(end))
        }
        Command::Print => {
            let engine = LayoutEngine::new(LayoutConfig::from(&ctx.options));
            let pages = engine.layout(doc).page_count();
            Transition::unchanged(zone, selection).with_output(CommandOutput::Printed { pages })
        }
    };

    if transition.document.as_ref() == Some(doc) {
        transition.document = None;
    }
    Ok(transition)
}

/// Copy `doc` and splice its `zone`.
pub(crate) fn spliced(
    doc: &Document,
    zone: Zone,
    position: usize,
    delete_count: usize,
    new_elements: Vec<Element>,
) -> Result<Document> {
    let mut next = doc.clone();
    next.zone_mut(zone)
        .splice(position, delete_count, new_elements)?;
    Ok(next)
}

/// Update a form field in place; `update` returns false for the wrong kind.
fn edit_field<F>(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    index: usize,
    update: F,
) -> Result<Transition>
where
    F: FnOnce(&mut ElementKind, &mut String) -> bool,
{
    let mut next = doc.clone();
    let store = next.zone_mut(zone);
    let len = store.len();
    let element = store
        .element_mut(index)
        .ok_or(Error::OutOfRange { position: index, len })?;
    let kind_name = element.kind_name();
    if !update(&mut element.kind, &mut element.value) {
        return Err(Error::InvalidElement(format!(
            "element {} is a {}",
            index, kind_name
        )));
    }
    Ok(Transition::edited(next, zone, selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::with_main(vec![Element::text(text)])
    }

    fn run(doc: &Document, selection: Selection, command: Command) -> Result<Transition> {
        let mut ctx = CommandContext::default();
        apply(doc, Zone::Main, selection, &command, &mut ctx)
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::InsertText("a".into()).name(), "insert_text");
        assert_eq!(Command::Print.name(), "print");
        assert_eq!(Command::bold().name(), "format_range");
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&Command::InsertText("hi".into())).unwrap();
        assert_eq!(json, r#"{"command":"insert_text","args":"hi"}"#);

        let undo: Command = serde_json::from_str(r#"{"command":"undo"}"#).unwrap();
        assert_eq!(undo, Command::Undo);

        let table: Command =
            serde_json::from_str(r#"{"command":"insert_table","args":{"rows":2,"cols":3}}"#)
                .unwrap();
        assert_eq!(table, Command::InsertTable { rows: 2, cols: 3 });
    }

    #[test]
    fn test_mode_allow_lists() {
        assert!(Command::search("x").allowed_in(EditorMode::Readonly));
        assert!(Command::Print.allowed_in(EditorMode::Print));
        assert!(!Command::InsertText("x".into()).allowed_in(EditorMode::Readonly));
        assert!(!Command::Undo.allowed_in(EditorMode::Readonly));
        assert!(Command::Undo.allowed_in(EditorMode::Form));
        assert!(Command::SetCheckbox {
            index: 0,
            checked: true
        }
        .allowed_in(EditorMode::Form));
        assert!(!Command::Backspace.allowed_in(EditorMode::Form));
        assert!(Command::Backspace.allowed_in(EditorMode::Design));
    }

    #[test]
    fn test_readonly_rejects_edit() {
        let d = doc("abc");
        let mut ctx = CommandContext::new(EditorOptions::new().with_mode(EditorMode::Readonly));
        let err = apply(
            &d,
            Zone::Main,
            Selection::collapsed(0),
            &Command::InsertText("x".into()),
            &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ModeRestricted {
                command: "insert_text",
                mode: EditorMode::Readonly
            }
        ));
    }

    #[test]
    fn test_invalid_selection_rejected() {
        let d = doc("abc");
        let sel = Selection::collapsed(7);
        assert!(matches!(
            run(&d, sel, Command::Backspace),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_unchanged_result_reports_no_mutation() {
        let d = doc("abc");
        let t = run(&d, Selection::collapsed(0), Command::Backspace).unwrap();
        assert!(!t.mutated());
        let t = run(&d, Selection::collapsed(0), Command::ClearFormat).unwrap();
        assert!(!t.mutated());
    }

    #[test]
    fn test_set_checkbox() {
        let d = Document::with_main(vec![Element::text("a"), Element::checkbox(false)]);
        let sel = Selection::collapsed(0);
        let t = run(
            &d,
            sel,
            Command::SetCheckbox {
                index: 1,
                checked: true,
            },
        )
        .unwrap();
        let next = t.document.unwrap();
        assert_eq!(
            next.main.element(1).map(|e| e.kind.clone()),
            Some(ElementKind::Checkbox { checked: true })
        );

        assert!(matches!(
            run(
                &d,
                sel,
                Command::SetCheckbox {
                    index: 0,
                    checked: true
                }
            ),
            Err(Error::InvalidElement(_))
        ));
        assert!(matches!(
            run(
                &d,
                sel,
                Command::SetCheckbox {
                    index: 5,
                    checked: true
                }
            ),
            Err(Error::OutOfRange { position: 5, len: 2 })
        ));
    }

    #[test]
    fn test_set_control_value() {
        let d = Document::with_main(vec![Element::control("")]);
        let t = run(
            &d,
            Selection::collapsed(0),
            Command::SetControlValue {
                index: 0,
                value: "fn main() {}".into(),
            },
        )
        .unwrap();
        assert_eq!(t.document.unwrap().plain_text(), "fn main() {}");
    }

    #[test]
    fn test_switch_zone_moves_cursor_to_zone_end() {
        let d = Document::from_zones(vec![Element::text("head")], Vec::new(), Vec::new());
        let t = run(&d, Selection::collapsed(0), Command::SwitchZone(Zone::Header)).unwrap();
        assert_eq!(t.zone, Zone::Header);
        assert_eq!(t.selection, Selection::collapsed(4));
    }

    #[test]
    fn test_update_options_validates() {
        let d = doc("a");
        let mut ctx = CommandContext::default();
        let bad = EditorOptions::new().with_history_capacity(0);
        assert!(apply(
            &d,
            Zone::Main,
            Selection::collapsed(0),
            &Command::UpdateOptions(bad),
            &mut ctx
        )
        .is_err());
        assert_eq!(ctx.options.history_capacity, 100);
    }

    #[test]
    fn test_print_reports_pages() {
        let d = Document::with_main(vec![
            Element::text("a"),
            Element::page_break(),
            Element::text("b"),
        ]);
        let t = run(&d, Selection::collapsed(0), Command::Print).unwrap();
        assert_eq!(t.output, CommandOutput::Printed { pages: 2 });
    }

    #[test]
    fn test_next_id_is_unique() {
        let mut ctx = CommandContext::default();
        assert_eq!(ctx.next_id("title"), "title-1");
        assert_eq!(ctx.next_id("hyperlink"), "hyperlink-2");
    }
}
