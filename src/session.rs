//! Editor session: the owner of a document and everything derived from it.
//!
//! A session holds the document, the selection, the undo history, the
//! current layout and the search state. Commands go in through
//! [`EditorSession::dispatch_at`]; time only advances through the instants
//! callers pass in, so debounced notifications and the painter window are
//! driven by [`EditorSession::poll`].

use std::time::Instant;

use serde::Serialize;

use crate::catalog::{build_catalog, CatalogEntry};
use crate::command::{apply, Command, CommandContext, CommandOutput, Transition};
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::history::{History, HistoryEntry, Snapshot};
use crate::layout::{Layout, LayoutConfig, LayoutEngine};
use crate::model::{Document, Zone};
use crate::options::{EditorMode, EditorOptions, PageMode};
use crate::painter::{PainterGesture, PainterMachine};
use crate::render::{count_words, DocumentStats};
use crate::selection::Selection;

/// Receives session notifications.
///
/// All methods do nothing by default.
pub trait EditorListener {
    /// Called once per burst of committed edits, after the debounce window.
    fn content_change(&mut self) {}

    /// Called when the layout mode changes.
    fn page_mode_change(&mut self, page_mode: PageMode) {
        let _ = page_mode;
    }
}

/// Position of the focused search match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchNavigateInfo {
    /// Focused match (1-indexed)
    pub index: usize,
    /// Number of matches
    pub count: usize,
}

/// An editing session over one document.
///
/// # Example
///
/// ```
/// use richdoc::{Command, EditorOptions, EditorSession};
/// use richdoc::model::{Document, Element};
///
/// let doc = Document::with_main(vec![Element::text("hello world")]);
/// let mut session = EditorSession::new(doc, EditorOptions::default()).unwrap();
///
/// session.dispatch(Command::search("world")).unwrap();
/// session.dispatch(Command::Replace("earth".into())).unwrap();
/// assert_eq!(session.plain_text().unwrap(), "hello earth");
///
/// session.dispatch(Command::Undo).unwrap();
/// assert_eq!(session.plain_text().unwrap(), "hello world");
/// ```
pub struct EditorSession {
    state: Option<SessionState>,
}

struct SessionState {
    document: Document,
    zone: Zone,
    selection: Selection,
    ctx: CommandContext,
    history: History,
    layout: Layout,
    debouncer: Debouncer,
    painter: PainterMachine,
    listeners: Vec<Box<dyn EditorListener>>,
}

impl EditorSession {
    /// Open a session on `document`. The cursor starts at the end of the body.
    pub fn new(document: Document, options: EditorOptions) -> Result<Self> {
        options.validate()?;
        let document = document.normalized();
        let layout = LayoutEngine::new(LayoutConfig::from(&options)).layout(&document);
        let selection = Selection::collapsed(document.main.len());
        log::debug!(
            "Opened session: {} body elements, {} pages",
            document.main.len(),
            layout.page_count()
        );

        let state = SessionState {
            zone: Zone::Main,
            selection,
            history: History::new(options.history_capacity),
            debouncer: Debouncer::new(options.debounce_window()),
            painter: PainterMachine::new(options.painter_timeout()),
            ctx: CommandContext::new(options),
            layout,
            document,
            listeners: Vec::new(),
        };
        Ok(Self { state: Some(state) })
    }

    fn state(&self) -> Result<&SessionState> {
        self.state.as_ref().ok_or(Error::Disposed)
    }

    fn state_mut(&mut self) -> Result<&mut SessionState> {
        self.state.as_mut().ok_or(Error::Disposed)
    }

    /// Run a command now.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutput> {
        self.dispatch_at(command, Instant::now())
    }

    /// Run a command at `now`.
    ///
    /// Either the command succeeds and its edit is committed, recorded in
    /// history and laid out, or it fails and nothing changes.
    pub fn dispatch_at(&mut self, command: Command, now: Instant) -> Result<CommandOutput> {
        self.state_mut()?.dispatch(&command, now)
    }

    /// Tell the session the time is `now`.
    ///
    /// Issues a due single-shot painter and flushes a due content-change
    /// notification. Returns whether listeners were notified.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        let state = self.state_mut()?;
        if let Some(command) = state.painter.poll(now) {
            if let Err(e) = state.dispatch(&command, now) {
                log::warn!("Single-shot painter failed: {}", e);
            }
        }
        if state.debouncer.poll(now) {
            log::debug!("Notifying {} listeners of content change", state.listeners.len());
            for listener in &mut state.listeners {
                listener.content_change();
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Single click on the painter button at `now`.
    pub fn painter_click(&mut self, now: Instant) -> Result<CommandOutput> {
        let state = self.state_mut()?;
        state.check_painter_allowed()?;
        match state.painter.click(now) {
            Some(command) => state.dispatch(&command, now),
            None => Ok(CommandOutput::None),
        }
    }

    /// Double click on the painter button at `now`.
    pub fn painter_double_click(&mut self, now: Instant) -> Result<CommandOutput> {
        let state = self.state_mut()?;
        state.check_painter_allowed()?;
        match state.painter.double_click() {
            Some(command) => state.dispatch(&command, now),
            None => Ok(CommandOutput::None),
        }
    }

    /// Current painter gesture state.
    pub fn painter_state(&self) -> Result<PainterGesture> {
        Ok(self.state()?.painter.state())
    }

    /// Check if the format painter holds a captured style.
    pub fn is_painting(&self) -> Result<bool> {
        Ok(self.state()?.ctx.is_painting())
    }

    /// Select `start..end` in the active zone.
    pub fn set_range(&mut self, start: usize, end: usize) -> Result<()> {
        let state = self.state_mut()?;
        let len = state.document.zone(state.zone).len();
        state.selection = Selection::new(start, end, len)?;
        state.ctx.pending_style = None;
        Ok(())
    }

    /// Collapse the selection onto `position` in the active zone.
    pub fn collapse_to_point(&mut self, position: usize) -> Result<()> {
        let state = self.state_mut()?;
        let len = state.document.zone(state.zone).len();
        state.selection.collapse_to(position, len)?;
        state.ctx.pending_style = None;
        Ok(())
    }

    /// Current selection.
    pub fn selection(&self) -> Result<Selection> {
        Ok(self.state()?.selection)
    }

    /// Active zone.
    pub fn zone(&self) -> Result<Zone> {
        Ok(self.state()?.zone)
    }

    /// Register a listener.
    pub fn add_listener(&mut self, listener: Box<dyn EditorListener>) -> Result<()> {
        self.state_mut()?.listeners.push(listener);
        Ok(())
    }

    /// Tear the session down. Every later call fails with [`Error::Disposed`].
    pub fn destroy(&mut self) -> Result<()> {
        let state = self.state.take().ok_or(Error::Disposed)?;
        log::debug!(
            "Destroyed session with {} undo entries",
            state.history.undo_len()
        );
        Ok(())
    }

    /// Check if [`EditorSession::destroy`] has been called.
    pub fn is_destroyed(&self) -> bool {
        self.state.is_none()
    }

    /// The document.
    pub fn document(&self) -> Result<&Document> {
        Ok(&self.state()?.document)
    }

    /// The current layout.
    pub fn layout(&self) -> Result<&Layout> {
        Ok(&self.state()?.layout)
    }

    /// The current options.
    pub fn options(&self) -> Result<&EditorOptions> {
        Ok(&self.state()?.ctx.options)
    }

    /// The interaction mode.
    pub fn mode(&self) -> Result<EditorMode> {
        Ok(self.state()?.ctx.options.mode)
    }

    /// Plain text of the body.
    pub fn plain_text(&self) -> Result<String> {
        self.zone_text(Zone::Main)
    }

    /// Plain text of a zone.
    pub fn zone_text(&self, zone: Zone) -> Result<String> {
        Ok(self.state()?.document.zone(zone).plain_text())
    }

    /// Word count of the body.
    pub fn word_count(&self) -> Result<usize> {
        Ok(count_words(&self.state()?.document.main.plain_text()))
    }

    /// Statistics of the body.
    pub fn stats(&self) -> Result<DocumentStats> {
        let state = self.state()?;
        Ok(DocumentStats::collect(&state.document, &state.layout))
    }

    /// Heading tree of the body.
    pub fn catalog(&self) -> Result<Vec<CatalogEntry>> {
        let state = self.state()?;
        Ok(build_catalog(&state.document, &state.layout))
    }

    /// Focused search match and match count; `None` without matches.
    pub fn search_navigate_info(&self) -> Result<Option<SearchNavigateInfo>> {
        Ok(self
            .state()?
            .ctx
            .search
            .position()
            .map(|(index, count)| SearchNavigateInfo { index, count }))
    }

    /// Check if undo would change anything.
    pub fn can_undo(&self) -> Result<bool> {
        Ok(self.state()?.history.can_undo())
    }

    /// Check if redo would change anything.
    pub fn can_redo(&self) -> Result<bool> {
        Ok(self.state()?.history.can_redo())
    }

    /// Number of undoable edits.
    pub fn undo_depth(&self) -> Result<usize> {
        Ok(self.state()?.history.undo_len())
    }
}

impl SessionState {
    fn dispatch(&mut self, command: &Command, now: Instant) -> Result<CommandOutput> {
        let mut ctx = self.ctx.clone();
        let transition = apply(&self.document, self.zone, self.selection, command, &mut ctx)
            .map_err(|e| {
                log::warn!("Command '{}' rejected: {}", command.name(), e);
                e
            })?;

        let previous = std::mem::replace(&mut self.ctx, ctx);
        let output = transition.output.clone();
        match command {
            Command::Undo => {
                if let Some(snapshot) = self.history.undo() {
                    self.restore(snapshot, now);
                }
            }
            Command::Redo => {
                if let Some(snapshot) = self.history.redo() {
                    self.restore(snapshot, now);
                }
            }
            _ => self.commit(transition, now),
        }
        if previous.options != self.ctx.options {
            self.options_changed(&previous.options);
        }
        Ok(output)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection: self.selection,
            zone: self.zone,
        }
    }

    fn commit(&mut self, transition: Transition, now: Instant) {
        let Transition {
            document,
            selection,
            zone,
            ..
        } = transition;
        let Some(document) = document else {
            self.selection = selection;
            self.zone = zone;
            return;
        };
        let before = Snapshot {
            document: std::mem::replace(&mut self.document, document),
            selection: self.selection,
            zone: self.zone,
        };
        self.selection = selection;
        self.zone = zone;
        let after = self.snapshot();
        self.history.push(HistoryEntry { before, after });
        self.edited(now);
    }

    fn restore(&mut self, snapshot: Snapshot, now: Instant) {
        self.document = snapshot.document;
        self.selection = snapshot.selection;
        self.zone = snapshot.zone;
        self.ctx.pending_style = None;
        self.edited(now);
    }

    /// Refresh everything derived from the document.
    fn edited(&mut self, now: Instant) {
        self.relayout();
        self.ctx.search.refresh(&self.document);
        self.debouncer.touch(now);
    }

    fn relayout(&mut self) {
        self.layout = LayoutEngine::new(LayoutConfig::from(&self.ctx.options)).layout(&self.document);
    }

    fn options_changed(&mut self, previous: &EditorOptions) {
        let options = &self.ctx.options;
        self.history.set_capacity(options.history_capacity);
        self.debouncer.set_window(options.debounce_window());
        self.painter.set_timeout(options.painter_timeout());
        if previous.mode != options.mode {
            log::debug!("Mode changed from {} to {}", previous.mode, options.mode);
            self.painter.reset();
        }
        self.relayout();

        let page_mode = self.ctx.options.page_mode;
        if previous.page_mode != page_mode {
            for listener in &mut self.listeners {
                listener.page_mode_change(page_mode);
            }
        }
    }

    fn check_painter_allowed(&self) -> Result<()> {
        let probe = Command::Painter {
            double_click: false,
        };
        let mode = self.ctx.options.mode;
        if probe.allowed_in(mode) {
            Ok(())
        } else {
            Err(Error::ModeRestricted {
                command: probe.name(),
                mode,
            })
        }
    }
}
