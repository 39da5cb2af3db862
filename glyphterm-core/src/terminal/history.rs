use std::collections::VecDeque;

use chrono::NaiveTime;
use compact_str::CompactString;
use glyphterm_data::TerminalPalette;

use super::ColoredLine;

/// What produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A line submitted with [`super::TerminalState::enter`]
    Input,
    /// Output pushed by the host, such as command errors
    Message,
    /// The startup greeting
    Greeting,
}

/// One line of terminal scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Origin of the line
    pub kind: EntryKind,
    /// Local time the line was recorded, if it is shown
    pub timestamp: Option<NaiveTime>,
    /// Line text
    pub text: CompactString,
}

impl HistoryEntry {
    /// A submitted input line.
    pub fn input(text: impl Into<CompactString>, timestamp: NaiveTime) -> Self {
        Self { kind: EntryKind::Input, timestamp: Some(timestamp), text: text.into() }
    }

    /// A host message without timestamp.
    pub fn message(text: impl Into<CompactString>) -> Self {
        Self { kind: EntryKind::Message, timestamp: None, text: text.into() }
    }

    /// The startup greeting.
    pub fn greeting(text: impl Into<CompactString>, timestamp: NaiveTime) -> Self {
        Self { kind: EntryKind::Greeting, timestamp: Some(timestamp), text: text.into() }
    }

    /// Colors the entry with `palette`.
    ///
    /// Inputs render as `[HH:MM:SS]: text `, the greeting as
    /// `[HH:MM:SS] text ` and messages as plain text.
    pub fn render(&self, palette: TerminalPalette) -> ColoredLine {
        let mut line = ColoredLine::builder(palette);
        if let Some(time) = self.timestamp {
            line = line.timestamp(time);
        }

        match self.kind {
            EntryKind::Input => line
                .text(": ", TerminalPalette::TEXT)
                .text(&self.text, TerminalPalette::TEXT)
                .text(" ", TerminalPalette::TEXT),
            EntryKind::Greeting => line
                .text(" ", TerminalPalette::TEXT)
                .text(&self.text, TerminalPalette::TEXT)
                .text(" ", TerminalPalette::TEXT),
            EntryKind::Message => line.text(&self.text, TerminalPalette::TEXT),
        }
        .build()
    }
}

/// Bounded scrollback; once full, the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    committed: u64,
}

impl History {
    /// Creates an empty history holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            capacity,
            committed: 0,
        }
    }

    /// Appends an entry, evicting the oldest if the history is full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if entry.kind == EntryKind::Input {
            self.committed += 1;
        }

        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of input lines ever submitted, including evicted ones.
    pub fn committed_count(&self) -> u64 {
        self.committed
    }

    /// Retained entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Retained entries, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Text of retained input lines, newest first.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.recent()
            .filter(|e| e.kind == EntryKind::Input)
            .map(|e| e.text.as_str())
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}
