//! Per-node rich-text notes: previews, debounced auto-save and HTML formatting helpers.

use std::ops::Range;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use web_time::Instant;

use crate::error::StorageError;
use crate::storage::{self, KeyValueStore};

pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);
/// How long the "Saving…" label stays up after an explicit save.
pub const SAVING_FEEDBACK: Duration = Duration::from_millis(500);
pub const PREVIEW_MAX_CHARS: usize = 40;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>?").unwrap();
}

/// Plain text shown on node cards: tags stripped, whitespace collapsed, cut to
/// [`PREVIEW_MAX_CHARS`] with a trailing `...`. Empty when the note has no text.
pub fn preview_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, " ");
    let text = stripped
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.chars().count() <= PREVIEW_MAX_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Trailing-edge debounce: fires once `delay` has passed since the last [`AutoSave::schedule`].
#[derive(Debug, Clone)]
pub struct AutoSave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY)
    }
}

impl AutoSave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Time left until the save fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

/// Formatting commands of the note toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Heading(u8),
    Bold,
    Italic,
    Strike,
    BulletList,
    OrderedList,
    Quote,
    CodeBlock,
}

impl Format {
    pub const ALL: [Format; 10] = [
        Format::Heading(1),
        Format::Heading(2),
        Format::Heading(3),
        Format::Bold,
        Format::Italic,
        Format::Strike,
        Format::BulletList,
        Format::OrderedList,
        Format::Quote,
        Format::CodeBlock,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Format::Heading(1) => "H1",
            Format::Heading(2) => "H2",
            Format::Heading(_) => "H3",
            Format::Bold => "B",
            Format::Italic => "I",
            Format::Strike => "S",
            Format::BulletList => "•",
            Format::OrderedList => "1.",
            Format::Quote => "❝",
            Format::CodeBlock => "</>",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Format::Heading(_) => "Heading",
            Format::Bold => "Bold",
            Format::Italic => "Italic",
            Format::Strike => "Strikethrough",
            Format::BulletList => "Bullet list",
            Format::OrderedList => "Numbered list",
            Format::Quote => "Quote",
            Format::CodeBlock => "Code block",
        }
    }

    /// Applies the command to `text` at the character range `selection`.
    ///
    /// Returns the character range to select afterwards.
    pub fn apply(self, text: &mut String, selection: Range<usize>) -> Range<usize> {
        match self {
            Format::Heading(level) => {
                toggle_block(text, selection, &format!("h{}", level.clamp(1, 3)))
            }
            Format::Bold => wrap_inline(text, selection, "strong"),
            Format::Italic => wrap_inline(text, selection, "em"),
            Format::Strike => wrap_inline(text, selection, "s"),
            Format::BulletList => toggle_list(text, selection, "ul"),
            Format::OrderedList => toggle_list(text, selection, "ol"),
            Format::Quote => toggle_block(text, selection, "blockquote"),
            Format::CodeBlock => toggle_block(text, selection, "pre"),
        }
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(i, _)| i)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn ordered(selection: Range<usize>, text: &str) -> Range<usize> {
    let len = char_len(text);
    let (a, b) = (selection.start.min(len), selection.end.min(len));
    a.min(b)..a.max(b)
}

/// Surrounds the selection with `<tag>`…`</tag>`.
pub fn wrap_inline(text: &mut String, selection: Range<usize>, tag: &str) -> Range<usize> {
    let sel = ordered(selection, text);
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let end = byte_index(text, sel.end);
    text.insert_str(end, &close);
    let start = byte_index(text, sel.start);
    text.insert_str(start, &open);

    let inner_start = sel.start + char_len(&open);
    inner_start..inner_start + sel.len()
}

/// Character range of the whole lines touched by `sel`.
fn line_span(text: &str, sel: &Range<usize>) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut start = sel.start;
    while start > 0 && chars[start - 1] != '\n' {
        start -= 1;
    }
    let mut end = sel.end;
    while end < chars.len() && chars[end] != '\n' {
        end += 1;
    }
    start..end
}

fn replace_chars(text: &mut String, span: Range<usize>, with: &str) {
    let (a, b) = (byte_index(text, span.start), byte_index(text, span.end));
    text.replace_range(a..b, with);
}

/// Wraps the selected lines in a `<tag>` block, or unwraps them when they already are one.
pub fn toggle_block(text: &mut String, selection: Range<usize>, tag: &str) -> Range<usize> {
    let sel = ordered(selection, text);
    let span = line_span(text, &sel);
    let lines: String = text.chars().skip(span.start).take(span.len()).collect();
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let replacement = match lines
        .strip_prefix(open.as_str())
        .and_then(|rest| rest.strip_suffix(close.as_str()))
    {
        Some(inner) => inner.to_owned(),
        None => format!("{open}{lines}{close}"),
    };
    replace_chars(text, span.clone(), &replacement);
    span.start..span.start + char_len(&replacement)
}

/// Turns the selected lines into list items of a `<ul>`/`<ol>`, or back into plain lines.
pub fn toggle_list(text: &mut String, selection: Range<usize>, tag: &str) -> Range<usize> {
    let sel = ordered(selection, text);
    let span = line_span(text, &sel);
    let lines: String = text.chars().skip(span.start).take(span.len()).collect();
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let trimmed = lines.trim();
    let replacement = match trimmed
        .strip_prefix(open.as_str())
        .and_then(|rest| rest.strip_suffix(close.as_str()))
    {
        Some(inner) => inner
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| {
                l.strip_prefix("<li>")
                    .and_then(|l| l.strip_suffix("</li>"))
                    .unwrap_or(l)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => {
            let items: Vec<String> = lines
                .lines()
                .map(|l| format!("<li>{l}</li>"))
                .collect();
            let items = if items.is_empty() {
                "<li></li>".to_owned()
            } else {
                items.join("\n")
            };
            format!("{open}\n{items}\n{close}")
        }
    };
    replace_chars(text, span.clone(), &replacement);
    span.start..span.start + char_len(&replacement)
}

/// Note being edited for the selected node, with its pending auto-save.
#[derive(Debug, Default)]
pub struct NoteSession {
    node_id: Option<String>,
    content: String,
    autosave: AutoSave,
    saving_until: Option<Instant>,
}

impl NoteSession {
    pub fn new(autosave_delay: Duration) -> Self {
        Self {
            autosave: AutoSave::new(autosave_delay),
            ..Default::default()
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Buffer bound to the editor widget. Call [`NoteSession::edited`] after it changes.
    pub fn content_mut(&mut self) -> &mut String {
        &mut self.content
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Binds the editor to `node_id`.
    ///
    /// A pending save for the previous node is written first; its result is returned.
    /// Stored content is loaded unless the editor has keyboard focus.
    pub fn select(
        &mut self,
        node_id: Option<&str>,
        store: &mut impl KeyValueStore,
        focused: bool,
    ) -> Option<Result<(), StorageError>> {
        if self.node_id.as_deref() == node_id {
            return None;
        }

        let flushed = if self.autosave.is_pending() {
            Some(self.write(store))
        } else {
            None
        };

        self.node_id = node_id.map(str::to_owned);
        self.saving_until = None;
        if !focused {
            self.content = match node_id {
                Some(id) => storage::load_note(store, id).unwrap_or_else(|e| {
                    log::error!("loading note for {id} failed: {e}");
                    String::new()
                }),
                None => String::new(),
            };
        }
        flushed
    }

    /// Records an edit; the save fires after the debounce delay.
    pub fn edited(&mut self, now: Instant) {
        if self.node_id.is_some() {
            self.autosave.schedule(now);
        }
    }

    /// Writes the note when the debounce delay has passed. `None` when nothing was due.
    pub fn tick(
        &mut self,
        store: &mut impl KeyValueStore,
        now: Instant,
    ) -> Option<Result<(), StorageError>> {
        if !self.autosave.is_due(now) {
            return None;
        }
        Some(self.write(store))
    }

    /// Explicit save. Shows the saving label for [`SAVING_FEEDBACK`].
    pub fn save(
        &mut self,
        store: &mut impl KeyValueStore,
        now: Instant,
    ) -> Result<(), StorageError> {
        self.saving_until = Some(now + SAVING_FEEDBACK);
        self.write(store)
    }

    pub fn is_saving(&self, now: Instant) -> bool {
        self.saving_until.is_some_and(|t| now < t)
    }

    /// Time until the next state change (auto-save or end of feedback), for repaint scheduling.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let feedback = self
            .saving_until
            .filter(|t| now < *t)
            .map(|t| t.duration_since(now));
        match (self.autosave.remaining(now), feedback) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn write(&mut self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        self.autosave.cancel();
        match &self.node_id {
            Some(id) => storage::save_note(store, id, &self.content),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn preview_strips_and_truncates() {
        assert_eq!(preview_text("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(preview_text("<p>a</p>\n\n<p>b&nbsp;c</p>"), "a b c");
        assert_eq!(preview_text("<p></p>"), "");
        assert_eq!(preview_text("broken <b"), "broken");

        let long = format!("<p>{}</p>", "x".repeat(50));
        assert_eq!(preview_text(&long), format!("{}...", "x".repeat(40)));
        assert_eq!(preview_text(&"é".repeat(40)), "é".repeat(40));
    }

    #[test]
    fn autosave_fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut a = AutoSave::default();
        assert!(!a.is_due(t0));

        a.schedule(t0);
        assert!(!a.is_due(t0 + Duration::from_millis(1499)));
        a.schedule(t0 + Duration::from_millis(1000));
        assert!(!a.is_due(t0 + Duration::from_millis(2000)));
        assert!(a.is_due(t0 + Duration::from_millis(2500)));

        a.cancel();
        assert!(!a.is_due(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn inline_wrap_keeps_inner_selection() {
        let mut s = String::from("say héllo now");
        let sel = wrap_inline(&mut s, 4..9, "strong");
        assert_eq!(s, "say <strong>héllo</strong> now");
        assert_eq!(sel, 12..17);

        let mut s = String::from("ab");
        let sel = Format::Italic.apply(&mut s, 2..1);
        assert_eq!(s, "a<em>b</em>");
        assert_eq!(sel, 5..6);

        let mut empty = String::new();
        assert_eq!(Format::Strike.apply(&mut empty, 0..0), 3..3);
        assert_eq!(empty, "<s></s>");
    }

    #[test]
    fn block_toggles_whole_lines() {
        let mut s = String::from("one\ntwo\nthree");
        let sel = Format::Heading(2).apply(&mut s, 5..5);
        assert_eq!(s, "one\n<h2>two</h2>\nthree");
        assert_eq!(sel, 4..16);

        Format::Heading(2).apply(&mut s, sel);
        assert_eq!(s, "one\ntwo\nthree");

        let mut q = String::from("quote me");
        Format::Quote.apply(&mut q, 0..0);
        assert_eq!(q, "<blockquote>quote me</blockquote>");
    }

    #[test]
    fn list_toggle_roundtrip() {
        let mut s = String::from("intro\napples\npears");
        let sel = Format::BulletList.apply(&mut s, 7..15);
        assert_eq!(s, "intro\n<ul>\n<li>apples</li>\n<li>pears</li>\n</ul>");

        Format::BulletList.apply(&mut s, sel);
        assert_eq!(s, "intro\napples\npears");
    }

    #[test]
    fn session_flushes_before_switching() {
        let mut store = MemoryStore::new();
        storage::save_note(&mut store, "b", "<p>bee</p>").unwrap();

        let t0 = Instant::now();
        let mut session = NoteSession::default();
        assert!(session.select(Some("a"), &mut store, false).is_none());
        assert_eq!(session.content(), "");

        session.content_mut().push_str("<p>ay</p>");
        session.edited(t0);
        assert!(session.tick(&mut store, t0).is_none());

        let flushed = session.select(Some("b"), &mut store, false);
        assert!(matches!(flushed, Some(Ok(()))));
        assert_eq!(storage::load_note(&store, "a").unwrap(), "<p>ay</p>");
        assert_eq!(session.content(), "<p>bee</p>");
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn session_keeps_buffer_while_focused() {
        let mut store = MemoryStore::new();
        storage::save_note(&mut store, "b", "stored").unwrap();
        let mut session = NoteSession::default();
        session.select(Some("a"), &mut store, false);
        session.content_mut().push_str("typing");

        session.select(Some("b"), &mut store, true);
        assert_eq!(session.node_id(), Some("b"));
        assert_eq!(session.content(), "typing");
    }

    #[test]
    fn session_autosaves_and_reports_saving() {
        let mut store = MemoryStore::new();
        let t0 = Instant::now();
        let mut session = NoteSession::default();
        session.select(Some("a"), &mut store, false);
        session.content_mut().push_str("draft");
        session.edited(t0);

        assert!(session.tick(&mut store, t0 + Duration::from_millis(1400)).is_none());
        assert!(matches!(
            session.tick(&mut store, t0 + AUTOSAVE_DELAY),
            Some(Ok(()))
        ));
        assert_eq!(storage::load_note(&store, "a").unwrap(), "draft");

        let t1 = t0 + Duration::from_secs(5);
        session.save(&mut store, t1).unwrap();
        assert!(session.is_saving(t1 + Duration::from_millis(100)));
        assert!(!session.is_saving(t1 + SAVING_FEEDBACK));
    }
}
