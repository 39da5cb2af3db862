/// A decoded editing event for [`super::TerminalState::handle`].
///
/// `word` is set when the control modifier is held and selects the
/// word-wise variant of an edit or motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    /// A printable character was typed
    CharTyped(char),
    /// Erase before the cursor
    Backspace {
        /// Word-wise variant
        word: bool,
    },
    /// Erase at the cursor
    Delete {
        /// Word-wise variant
        word: bool,
    },
    /// Submit the line
    Enter,
    /// Move the cursor left
    CursorLeft {
        /// Word-wise variant
        word: bool,
    },
    /// Move the cursor right
    CursorRight {
        /// Word-wise variant
        word: bool,
    },
    /// Move the cursor to the start of the line
    Home,
    /// Move the cursor to the end of the line
    End,
    /// Recall the previous submitted line
    HistoryUp,
    /// Recall the next submitted line, or the draft
    HistoryDown,
}
