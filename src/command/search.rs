//! Body search and replace.

use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{spliced, CommandContext, CommandOutput, Transition};
use crate::error::{Error, Result};
use crate::model::{Document, Element, Zone};
use crate::selection::Selection;

/// Navigation direction among search matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the end of the document
    Next,
    /// Towards the start of the document
    Prev,
}

/// Keyword, matches and the focused match of the last search.
///
/// Matches are element ranges in the body. Runs of text and hyperlink
/// characters are searched as one string; any other element, line breaks
/// included, ends a run.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    keyword: Option<String>,
    regex: Option<Regex>,
    matches: Vec<Range<usize>>,
    current: Option<usize>,
}

impl SearchState {
    /// Create an inactive search state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `doc` for `keyword`, case-insensitively and literally.
    ///
    /// An absent or empty keyword clears the state. Focus starts on the
    /// first match. Returns the number of matches.
    pub fn search(&mut self, doc: &Document, keyword: Option<&str>) -> usize {
        self.clear();
        let keyword = match keyword {
            Some(k) if !k.is_empty() => k,
            _ => return 0,
        };
        let pattern = format!("(?i){}", regex::escape(keyword));
        match Regex::new(&pattern) {
            Ok(regex) => {
                self.keyword = Some(keyword.to_string());
                self.regex = Some(regex);
            }
            Err(e) => {
                log::warn!("Cannot search for '{}': {}", keyword, e);
                return 0;
            }
        }
        self.refresh(doc);
        log::debug!("Search '{}' found {} matches", keyword, self.matches.len());
        self.matches.len()
    }

    /// Recompute matches of the current keyword against `doc`.
    ///
    /// Focus stays on the same match number, clamped to the new count.
    pub fn refresh(&mut self, doc: &Document) {
        let Some(regex) = &self.regex else {
            return;
        };
        self.matches = find_matches(regex, doc.main.as_slice());
        self.current = match self.matches.len() {
            0 => None,
            count => Some(self.current.map_or(0, |i| i.min(count - 1))),
        };
    }

    /// Forget keyword and matches.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Move focus cyclically and return the newly focused match.
    pub fn navigate(&mut self, direction: Direction) -> Option<Range<usize>> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let next = match (self.current, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Prev) => count - 1,
            (Some(i), Direction::Next) => (i + 1) % count,
            (Some(i), Direction::Prev) => (i + count - 1) % count,
        };
        self.current = Some(next);
        self.matches.get(next).cloned()
    }

    /// Focus the first match starting at or after `position`, wrapping.
    fn focus_from(&mut self, position: usize) {
        if self.matches.is_empty() {
            self.current = None;
            return;
        }
        let index = self
            .matches
            .iter()
            .position(|m| m.start >= position)
            .unwrap_or(0);
        self.current = Some(index);
    }

    /// Keyword of the active search.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// All matches in document order.
    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    /// The focused match.
    pub fn current_match(&self) -> Option<Range<usize>> {
        self.current.and_then(|i| self.matches.get(i)).cloned()
    }

    /// Focused match number (1-indexed) and match count; `None` without matches.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current.map(|i| (i + 1, self.matches.len()))
    }
}

fn find_matches(regex: &Regex, elements: &[Element]) -> Vec<Range<usize>> {
    let mut matches = Vec::new();
    let mut run = String::new();
    let mut offsets: Vec<usize> = Vec::new();
    let mut run_start = 0;

    for (index, element) in elements.iter().enumerate() {
        if element.is_text_like() && !element.is_newline() {
            if offsets.is_empty() {
                run_start = index;
            }
            offsets.push(run.len());
            run.push_str(&element.value);
        } else if !offsets.is_empty() {
            scan_run(regex, &run, &offsets, run_start, &mut matches);
            run.clear();
            offsets.clear();
        }
    }
    if !offsets.is_empty() {
        scan_run(regex, &run, &offsets, run_start, &mut matches);
    }
    matches
}

/// Map byte ranges of regex matches in `run` back to element ranges.
fn scan_run(
    regex: &Regex,
    run: &str,
    offsets: &[usize],
    run_start: usize,
    matches: &mut Vec<Range<usize>>,
) {
    let owner = |byte: usize| match offsets.binary_search(&byte) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };
    for m in regex.find_iter(run) {
        if m.start() == m.end() {
            continue;
        }
        let first = owner(m.start());
        let last = owner(m.end() - 1);
        matches.push(run_start + first..run_start + last + 1);
    }
}

/// Characters of `text` carrying the kind and formatting of `template`.
fn replacement(template: &Element, text: &str) -> Vec<Element> {
    text.chars()
        .map(|c| {
            let mut element = template.clone();
            element.value = c.to_string();
            element
        })
        .collect()
}

/// Replace the focused match with `text`.
pub(super) fn replace(doc: &Document, text: &str, ctx: &mut CommandContext) -> Result<Transition> {
    let range = ctx.search.current_match().ok_or(Error::NoActiveSearch)?;
    let template = doc
        .main
        .element(range.start)
        .ok_or(Error::NoActiveSearch)?;
    let elements = replacement(template, text);
    let cursor = range.start + elements.len();
    let next = spliced(doc, Zone::Main, range.start, range.len(), elements)?;

    ctx.search.refresh(&next);
    ctx.search.focus_from(cursor);
    Ok(Transition::edited(next, Zone::Main, Selection::collapsed(cursor))
        .with_output(CommandOutput::Replaced { count: 1 }))
}

/// Replace every match with `text`.
pub(super) fn replace_all(
    doc: &Document,
    text: &str,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    if ctx.search.matches().is_empty() {
        return Err(Error::NoActiveSearch);
    }
    let mut next = doc.clone();
    let mut shift: isize = 0;
    let mut cursor = 0;
    for range in ctx.search.matches() {
        let template = doc
            .main
            .element(range.start)
            .ok_or(Error::NoActiveSearch)?;
        let elements = replacement(template, text);
        let inserted = elements.len();
        let position = range.start.checked_add_signed(shift).ok_or(Error::OutOfRange {
            position: range.start,
            len: next.main.len(),
        })?;
        next.main.splice(position, range.len(), elements)?;
        shift += inserted as isize - range.len() as isize;
        cursor = position + inserted;
    }
    let count = ctx.search.matches().len();
    ctx.search.refresh(&next);
    ctx.search.focus_from(cursor);
    Ok(Transition::edited(next, Zone::Main, Selection::collapsed(cursor))
        .with_output(CommandOutput::Replaced { count }))
}
