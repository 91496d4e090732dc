//! Integration tests for editor sessions.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use richdoc::model::{Document, Element, Table};
use richdoc::{
    Command, CommandOutput, EditorListener, EditorMode, EditorOptions, EditorSession, Error,
    Margins, PageMode, PainterGesture, SearchNavigateInfo,
};

fn session(text: &str) -> EditorSession {
    EditorSession::new(
        Document::with_main(vec![Element::text(text)]),
        EditorOptions::default(),
    )
    .unwrap()
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Listener that records what it was told.
#[derive(Default)]
struct Recorder {
    content_changes: usize,
    page_modes: Vec<PageMode>,
}

struct SharedRecorder(Rc<RefCell<Recorder>>);

impl EditorListener for SharedRecorder {
    fn content_change(&mut self) {
        self.0.borrow_mut().content_changes += 1;
    }

    fn page_mode_change(&mut self, page_mode: PageMode) {
        self.0.borrow_mut().page_modes.push(page_mode);
    }
}

fn recorded(session: &mut EditorSession) -> Rc<RefCell<Recorder>> {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    session
        .add_listener(Box::new(SharedRecorder(Rc::clone(&recorder))))
        .unwrap();
    recorder
}

#[test]
fn test_undo_restores_every_step() {
    let mut s = session("abc");
    let original = s.document().unwrap().clone();

    s.dispatch(Command::InsertText("def".into())).unwrap();
    s.set_range(0, 3).unwrap();
    s.dispatch(Command::bold()).unwrap();
    s.collapse_to_point(6).unwrap();
    s.dispatch(Command::Backspace).unwrap();
    let edited = s.document().unwrap().clone();
    assert_eq!(s.plain_text().unwrap(), "abcde");
    assert_eq!(s.undo_depth().unwrap(), 3);

    for _ in 0..3 {
        s.dispatch(Command::Undo).unwrap();
    }
    assert_eq!(s.document().unwrap(), &original);
    assert!(!s.can_undo().unwrap());

    // Undo on an empty stack does nothing
    s.dispatch(Command::Undo).unwrap();
    assert_eq!(s.document().unwrap(), &original);

    for _ in 0..3 {
        s.dispatch(Command::Redo).unwrap();
    }
    assert_eq!(s.document().unwrap(), &edited);
    assert!(!s.can_redo().unwrap());
}

fn assert_every_element_laid_out(s: &EditorSession) {
    let expected: Vec<usize> = (0..s.document().unwrap().main.len()).collect();
    assert_eq!(s.layout().unwrap().main_indices(), expected);
}

#[test]
fn test_layout_stays_lossless_across_edits() {
    // 100px of content width, so most steps wrap
    let options = EditorOptions::new()
        .with_paper_size(140.0, 200.0)
        .with_margins(Margins::new(20.0, 20.0, 20.0, 20.0));
    let mut s = EditorSession::new(Document::new(), options).unwrap();
    assert_every_element_laid_out(&s);

    let steps = vec![
        Command::InsertText("The quick brown dog jumps ".into()),
        Command::InsertElements(vec![
            Element::text(" ").with_size(2),
            Element::text("b".repeat(14)),
            Element::text("BIG").with_size(40),
        ]),
        Command::InsertElements(vec![
            Element::separator(),
            Element::page_break(),
            Element::image("img", 300.0, 30.0),
            Element::table(Table::new(2, 2, 600.0, 30.0).unwrap()),
        ]),
        Command::InsertText("tail\nmore".into()),
        Command::Backspace,
    ];
    for command in steps {
        s.dispatch(command).unwrap();
        assert_every_element_laid_out(&s);
    }

    s.set_range(4, 9).unwrap();
    s.dispatch(Command::InsertText("slow".into())).unwrap();
    assert_every_element_laid_out(&s);
    assert!(s.plain_text().unwrap().starts_with("The slow brown"));

    s.dispatch(Command::search("dog")).unwrap();
    s.dispatch(Command::Replace("cat".into())).unwrap();
    assert_every_element_laid_out(&s);

    for command in [Command::Undo, Command::Undo, Command::Undo, Command::Redo, Command::Redo] {
        s.dispatch(command).unwrap();
        assert_every_element_laid_out(&s);
    }
    assert!(s.layout().unwrap().page_count() > 1);
}

#[test]
fn test_moving_the_cursor_drops_recorded_style() {
    let mut s = session("ab");
    s.dispatch(Command::bold()).unwrap();
    s.collapse_to_point(0).unwrap();
    s.dispatch(Command::InsertText("x".into())).unwrap();
    assert!(!s.document().unwrap().main.iter().any(|e| e.style.bold));

    s.dispatch(Command::bold()).unwrap();
    s.set_range(1, 2).unwrap();
    s.collapse_to_point(3).unwrap();
    s.dispatch(Command::InsertText("y".into())).unwrap();
    assert_eq!(s.plain_text().unwrap(), "xaby");
    assert!(!s.document().unwrap().main.iter().any(|e| e.style.bold));
}

#[test]
fn test_edit_after_undo_clears_redo() {
    let mut s = session("a");
    s.dispatch(Command::InsertText("b".into())).unwrap();
    s.dispatch(Command::Undo).unwrap();
    assert!(s.can_redo().unwrap());

    s.dispatch(Command::InsertText("c".into())).unwrap();
    assert!(!s.can_redo().unwrap());
    assert_eq!(s.plain_text().unwrap(), "ac");
}

#[test]
fn test_undo_restores_selection() {
    let mut s = session("abc");
    s.set_range(1, 2).unwrap();
    s.dispatch(Command::Backspace).unwrap();
    assert_eq!(s.selection().unwrap().range(), 1..1);

    s.dispatch(Command::Undo).unwrap();
    assert_eq!(s.selection().unwrap().range(), 1..2);
}

#[test]
fn test_history_capacity() {
    let options = EditorOptions::new().with_history_capacity(2);
    let mut s = EditorSession::new(Document::new(), options).unwrap();
    for text in ["a", "b", "c"] {
        s.dispatch(Command::InsertText(text.into())).unwrap();
    }
    assert_eq!(s.undo_depth().unwrap(), 2);

    for _ in 0..3 {
        s.dispatch(Command::Undo).unwrap();
    }
    assert_eq!(s.plain_text().unwrap(), "a");
}

#[test]
fn test_non_mutating_commands_skip_history() {
    let mut s = session("hello");
    s.dispatch(Command::search("ell")).unwrap();
    s.dispatch(Command::Print).unwrap();
    s.dispatch(Command::Backspace).unwrap();
    assert_eq!(s.undo_depth().unwrap(), 1);

    // Backspace at the start is a no-op
    let mut s = session("ab");
    s.set_range(0, 2).unwrap();
    s.dispatch(Command::DeleteForward).unwrap();
    s.dispatch(Command::Undo).unwrap();
    s.collapse_to_point(0).unwrap();
    s.dispatch(Command::Backspace).unwrap();
    assert_eq!(s.undo_depth().unwrap(), 0);
}

#[test]
fn test_readonly_blocks_edits() {
    let options = EditorOptions::new().with_mode(EditorMode::Readonly);
    let mut s = EditorSession::new(
        Document::with_main(vec![Element::text("cat dog")]),
        options,
    )
    .unwrap();
    let before = s.document().unwrap().clone();

    let err = s.dispatch(Command::InsertText("x".into())).unwrap_err();
    assert!(matches!(
        err,
        Error::ModeRestricted {
            command: "insert_text",
            mode: EditorMode::Readonly
        }
    ));
    assert!(matches!(
        s.dispatch(Command::ReplaceAll("x".into())),
        Err(Error::ModeRestricted { .. })
    ));
    assert!(matches!(
        s.dispatch(Command::Undo),
        Err(Error::ModeRestricted { .. })
    ));
    assert_eq!(s.document().unwrap(), &before);

    assert_eq!(
        s.dispatch(Command::search("dog")).unwrap(),
        CommandOutput::Matches { count: 1 }
    );
    assert!(matches!(
        s.dispatch(Command::Print).unwrap(),
        CommandOutput::Printed { pages: 1 }
    ));

    s.dispatch(Command::SetMode(EditorMode::Edit)).unwrap();
    s.dispatch(Command::InsertText("!".into())).unwrap();
    assert_eq!(s.plain_text().unwrap(), "cat dog!");
}

#[test]
fn test_form_mode_allows_fields_only() {
    let doc = Document::with_main(vec![Element::text("ok "), Element::checkbox(false)]);
    let options = EditorOptions::new().with_mode(EditorMode::Form);
    let mut s = EditorSession::new(doc, options).unwrap();

    s.dispatch(Command::SetCheckbox {
        index: 3,
        checked: true,
    })
    .unwrap();
    assert!(matches!(
        s.dispatch(Command::InsertText("x".into())),
        Err(Error::ModeRestricted { .. })
    ));
    assert_eq!(s.stats().unwrap().checkbox_count, 1);

    s.dispatch(Command::Undo).unwrap();
    s.dispatch(Command::Redo).unwrap();
    assert_eq!(s.undo_depth().unwrap(), 1);
}

#[test]
fn test_content_change_is_debounced() {
    let t0 = Instant::now();
    let mut s = session("");
    let recorder = recorded(&mut s);

    s.dispatch_at(Command::InsertText("a".into()), t0).unwrap();
    s.dispatch_at(Command::InsertText("b".into()), t0 + ms(100))
        .unwrap();

    assert!(!s.poll(t0 + ms(250)).unwrap());
    assert!(s.poll(t0 + ms(300)).unwrap());
    assert!(!s.poll(t0 + ms(900)).unwrap());
    assert_eq!(recorder.borrow().content_changes, 1);

    // Searching changes nothing, so nothing is reported
    s.dispatch_at(Command::search("a"), t0 + ms(1000)).unwrap();
    assert!(!s.poll(t0 + ms(2000)).unwrap());
    assert_eq!(recorder.borrow().content_changes, 1);
}

#[test]
fn test_undo_reports_content_change() {
    let t0 = Instant::now();
    let mut s = session("a");
    let recorder = recorded(&mut s);

    s.dispatch_at(Command::Backspace, t0).unwrap();
    assert!(s.poll(t0 + ms(200)).unwrap());
    s.dispatch_at(Command::Undo, t0 + ms(500)).unwrap();
    assert!(s.poll(t0 + ms(700)).unwrap());
    assert_eq!(recorder.borrow().content_changes, 2);
}

#[test]
fn test_page_mode_change_notifies() {
    let doc = Document::with_main(vec![
        Element::text("one"),
        Element::page_break(),
        Element::text("two"),
    ]);
    let mut s = EditorSession::new(doc, EditorOptions::default()).unwrap();
    let recorder = recorded(&mut s);
    assert_eq!(s.layout().unwrap().page_count(), 2);

    s.dispatch(Command::PageMode(PageMode::Continuity)).unwrap();
    assert_eq!(s.layout().unwrap().page_count(), 1);

    // Same mode again is not a change
    s.dispatch(Command::PageMode(PageMode::Continuity)).unwrap();

    let options = s.options().unwrap().clone();
    s.dispatch(Command::UpdateOptions(EditorOptions {
        page_mode: PageMode::Paging,
        ..options
    }))
    .unwrap();

    assert_eq!(
        recorder.borrow().page_modes,
        vec![PageMode::Continuity, PageMode::Paging]
    );
    assert_eq!(s.undo_depth().unwrap(), 0);
}

#[test]
fn test_single_click_painter() {
    let t0 = Instant::now();
    let doc = Document::with_main(vec![Element::text("ab")]);
    let mut s = EditorSession::new(doc, EditorOptions::default()).unwrap();
    s.set_range(0, 1).unwrap();
    s.dispatch(Command::bold()).unwrap();

    s.painter_click(t0).unwrap();
    assert!(matches!(
        s.painter_state().unwrap(),
        PainterGesture::Armed { .. }
    ));
    s.poll(t0 + ms(150)).unwrap();
    assert!(!s.is_painting().unwrap());

    s.poll(t0 + ms(200)).unwrap();
    assert!(s.is_painting().unwrap());
    assert_eq!(s.painter_state().unwrap(), PainterGesture::Idle);

    s.set_range(1, 2).unwrap();
    s.dispatch(Command::ApplyPainter).unwrap();
    assert!(s.document().unwrap().main.iter().all(|e| e.style.bold));
    assert!(!s.is_painting().unwrap());
}

#[test]
fn test_second_click_cancels_single_shot() {
    let t0 = Instant::now();
    let mut s = session("ab");
    s.painter_click(t0).unwrap();
    s.painter_click(t0 + ms(50)).unwrap();
    s.poll(t0 + ms(500)).unwrap();
    assert!(!s.is_painting().unwrap());
}

#[test]
fn test_double_click_painter_persists() {
    let t0 = Instant::now();
    let mut s = session("abcd");
    s.set_range(0, 1).unwrap();
    s.dispatch(Command::italic()).unwrap();

    s.painter_double_click(t0).unwrap();
    assert_eq!(s.painter_state().unwrap(), PainterGesture::Persistent);

    for start in [1, 2] {
        s.set_range(start, start + 1).unwrap();
        s.dispatch(Command::ApplyPainter).unwrap();
    }
    assert!(s.is_painting().unwrap());

    s.painter_click(t0 + ms(1000)).unwrap();
    assert!(!s.is_painting().unwrap());
    let italic: Vec<bool> = s
        .document()
        .unwrap()
        .main
        .iter()
        .map(|e| e.style.italic)
        .collect();
    assert_eq!(italic, vec![true, true, true, false]);
}

#[test]
fn test_painter_rejected_in_readonly() {
    let options = EditorOptions::new().with_mode(EditorMode::Readonly);
    let mut s = EditorSession::new(Document::new(), options).unwrap();
    assert!(matches!(
        s.painter_click(Instant::now()),
        Err(Error::ModeRestricted {
            command: "painter",
            ..
        })
    ));
    assert_eq!(s.painter_state().unwrap(), PainterGesture::Idle);
}

#[test]
fn test_search_replace_and_undo() {
    let mut s = session("cat dog cat");
    s.dispatch(Command::search("CAT")).unwrap();
    assert_eq!(
        s.search_navigate_info().unwrap(),
        Some(SearchNavigateInfo { index: 1, count: 2 })
    );

    s.dispatch(Command::SearchNavigate(richdoc::Direction::Next))
        .unwrap();
    assert_eq!(s.selection().unwrap().range(), 8..11);

    s.dispatch(Command::ReplaceAll("bird".into())).unwrap();
    assert_eq!(s.plain_text().unwrap(), "bird dog bird");
    assert_eq!(s.search_navigate_info().unwrap(), None);

    s.dispatch(Command::Undo).unwrap();
    assert_eq!(s.plain_text().unwrap(), "cat dog cat");
    assert_eq!(
        s.search_navigate_info().unwrap().map(|info| info.count),
        Some(2)
    );
}

#[test]
fn test_replace_without_search() {
    let mut s = session("abc");
    assert!(matches!(
        s.dispatch(Command::Replace("x".into())),
        Err(Error::NoActiveSearch)
    ));
}

#[test]
fn test_catalog_and_location() {
    let mut s = session("Intro\nBody text");
    s.collapse_to_point(2).unwrap();
    s.dispatch(Command::Title(Some(1))).unwrap();

    let catalog = s.catalog().unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].name, "Intro");
    assert_eq!(catalog[0].page_no, 1);

    let id = catalog[0].id.clone();
    s.collapse_to_point(0).unwrap();
    assert_eq!(
        s.dispatch(Command::LocationCatalog(id)).unwrap(),
        CommandOutput::Located { index: 5 }
    );
    assert_eq!(s.selection().unwrap().range(), 5..5);
}

#[test]
fn test_switch_zone_edits_header() {
    let mut s = session("body");
    s.dispatch(Command::SwitchZone(richdoc::Zone::Header)).unwrap();
    s.dispatch(Command::InsertText("Head".into())).unwrap();
    assert_eq!(s.zone_text(richdoc::Zone::Header).unwrap(), "Head");
    assert_eq!(s.plain_text().unwrap(), "body");
    assert_eq!(s.layout().unwrap().pages[0].header.len(), 1);
}

#[test]
fn test_destroyed_session_rejects_everything() {
    let mut s = session("abc");
    s.destroy().unwrap();

    assert!(matches!(
        s.dispatch(Command::search("a")),
        Err(Error::Disposed)
    ));
    assert!(matches!(s.set_range(0, 1), Err(Error::Disposed)));
    assert!(matches!(s.poll(Instant::now()), Err(Error::Disposed)));
    assert!(matches!(s.catalog(), Err(Error::Disposed)));
    assert!(matches!(
        s.painter_click(Instant::now()),
        Err(Error::Disposed)
    ));
}
