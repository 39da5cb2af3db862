use chrono::Local;
use glyphterm_data::TerminalPalette;

use super::{CommandError, History, HistoryEntry, TerminalInput};
use crate::config::TerminalConfig;

const DIVIDERS: &[u8] = b" ,./\\'\"!@#$%^&*()_+{}[]/?-=<>:;|`~";

fn is_divider(b: u8) -> bool {
    DIVIDERS.contains(&b)
}

/// Input recall position while browsing submitted lines.
#[derive(Debug, Clone)]
struct Recall {
    /// 0 is the most recent submitted line
    depth: usize,
    /// The line being edited before browsing started
    draft: String,
}

/// Line-editing model of a terminal, independent of rendering.
///
/// The input line holds printable ASCII only, so the cursor is both a byte
/// and a column offset. It always satisfies `0 <= cursor_x <= line length`.
#[derive(Debug, Clone)]
pub struct TerminalState {
    config: TerminalConfig,
    active: bool,
    line: String,
    cursor: usize,
    history: History,
    palette: usize,
    recall: Option<Recall>,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new(TerminalConfig::default())
    }
}

impl TerminalState {
    /// Creates an active terminal; the configured greeting becomes the
    /// first history entry.
    pub fn new(config: TerminalConfig) -> Self {
        let mut history = History::new(config.history_capacity);
        if let Some(greeting) = &config.greeting {
            history.push(HistoryEntry::greeting(greeting.clone(), Local::now().time()));
        }

        Self {
            active: true,
            line: String::new(),
            cursor: 0,
            palette: config.palette,
            history,
            recall: None,
            config,
        }
    }

    /// Inserts `c` at the cursor and advances the cursor.
    ///
    /// Characters outside printable ASCII are ignored.
    pub fn add_char(&mut self, c: char) {
        if !(c.is_ascii_graphic() || c == ' ') {
            return;
        }

        self.line.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Erases the character before the cursor, or in word mode everything
    /// back to the previous divider. No-op at column 0.
    pub fn backspace(&mut self, word: bool) {
        while self.cursor > 0 {
            self.cursor -= 1;
            self.line.remove(self.cursor);

            if !word || self.cursor == 0 || is_divider(self.line.as_bytes()[self.cursor - 1]) {
                break;
            }
        }
    }

    /// Erases the character at the cursor, or in word mode everything up to
    /// the next divider. No-op at the end of the line.
    pub fn delete_key(&mut self, word: bool) {
        while self.cursor < self.line.len() {
            self.line.remove(self.cursor);

            if !word || self.cursor >= self.line.len() || is_divider(self.line.as_bytes()[self.cursor]) {
                break;
            }
        }
    }

    /// Moves the cursor one column left, or in word mode to just after the
    /// previous divider.
    pub fn cursor_left(&mut self, word: bool) {
        if self.cursor == 0 {
            return;
        }

        self.cursor -= 1;
        if word {
            let bytes = self.line.as_bytes();
            while self.cursor > 0 && !is_divider(bytes[self.cursor - 1]) {
                self.cursor -= 1;
            }
        }
    }

    /// Moves the cursor one column right, or in word mode onto the next divider.
    pub fn cursor_right(&mut self, word: bool) {
        if self.cursor >= self.line.len() {
            return;
        }

        self.cursor += 1;
        if word {
            let bytes = self.line.as_bytes();
            while self.cursor < bytes.len() && !is_divider(bytes[self.cursor]) {
                self.cursor += 1;
            }
        }
    }

    /// Moves the cursor to column 0.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor past the last character.
    pub fn end(&mut self) {
        self.cursor = self.line.len();
    }

    /// Commits the current line to the history and returns it.
    ///
    /// Exactly one history entry is added, even for an empty line; the
    /// input line is left empty with the cursor at column 0. Running the
    /// line as a command is up to the caller, see
    /// [`super::CommandRegistry::execute`].
    pub fn enter(&mut self) -> String {
        let line = std::mem::take(&mut self.line);
        self.cursor = 0;
        self.recall = None;

        tracing::trace!(line = %line, "terminal line submitted");
        self.history
            .push(HistoryEntry::input(line.as_str(), Local::now().time()));

        line
    }

    /// Replaces the input line with the previous submitted line, caching the
    /// line being edited on the first step.
    pub fn history_up(&mut self) {
        let depth = match &self.recall {
            Some(recall) => recall.depth + 1,
            None => 0,
        };

        let Some(recalled) = self.history.inputs().nth(depth).map(str::to_owned) else {
            return;
        };

        let draft = match self.recall.take() {
            Some(recall) => recall.draft,
            None => std::mem::take(&mut self.line),
        };
        self.recall = Some(Recall { depth, draft });
        self.set_line(recalled);
    }

    /// Steps back towards the most recent line; past it, restores the
    /// cached draft.
    pub fn history_down(&mut self) {
        let Some(recall) = self.recall.take() else {
            return;
        };

        if recall.depth == 0 {
            self.set_line(recall.draft);
            return;
        }

        let depth = recall.depth - 1;
        let recalled = self.history.inputs().nth(depth).map(str::to_owned);
        self.recall = Some(Recall { depth, ..recall });
        if let Some(line) = recalled {
            self.set_line(line);
        }
    }

    fn set_line(&mut self, line: String) {
        self.line = line;
        self.cursor = self.line.len();
    }

    /// Applies one input event; returns the submitted line on
    /// [`TerminalInput::Enter`].
    pub fn handle(&mut self, input: TerminalInput) -> Option<String> {
        match input {
            TerminalInput::CharTyped(c) => self.add_char(c),
            TerminalInput::Backspace { word } => self.backspace(word),
            TerminalInput::Delete { word } => self.delete_key(word),
            TerminalInput::Enter => return Some(self.enter()),
            TerminalInput::CursorLeft { word } => self.cursor_left(word),
            TerminalInput::CursorRight { word } => self.cursor_right(word),
            TerminalInput::Home => self.home(),
            TerminalInput::End => self.end(),
            TerminalInput::HistoryUp => self.history_up(),
            TerminalInput::HistoryDown => self.history_down(),
        }
        None
    }

    /// Appends a host output line to the history.
    pub fn push_message(&mut self, text: &str) {
        self.history.push(HistoryEntry::message(text));
    }

    /// Echoes a failed command into the history.
    pub fn push_command_error(&mut self, error: &CommandError) {
        for line in error.history_lines() {
            self.push_message(&line);
        }
    }

    /// Shows or hides the cursor; an inactive terminal still renders.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// True while the terminal takes input.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Selects one of the built-in palettes; indices wrap.
    pub fn set_palette(&mut self, index: usize) {
        self.palette = index % TerminalPalette::PRESETS.len();
    }

    /// The selected palette.
    pub fn palette(&self) -> TerminalPalette {
        TerminalPalette::preset(self.palette)
    }

    /// The line being edited.
    pub fn current_line(&self) -> &str {
        &self.line
    }

    /// Cursor column within the input line.
    pub fn cursor_x(&self) -> usize {
        self.cursor
    }

    /// Scrollback, including submitted lines and messages.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Text drawn before the input line.
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// Placement and size of the terminal.
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::terminal::{CommandRegistry, EntryKind};

    fn quiet() -> TerminalState {
        TerminalState::new(TerminalConfig { greeting: None, ..Default::default() })
    }

    fn typed(text: &str) -> TerminalState {
        let mut term = quiet();
        text.chars().for_each(|c| term.add_char(c));
        term
    }

    #[test]
    fn greeting_is_the_first_entry() {
        let term = TerminalState::default();
        let first = term.history().iter().next().unwrap();
        assert_eq!(first.kind, EntryKind::Greeting);
        assert_eq!(first.text, "Welcome to glyphterm");
        assert!(first.timestamp.is_some());
    }

    #[test]
    fn word_backspace_stops_at_divider() {
        let mut term = typed("hello world");
        term.backspace(true);
        assert_eq!(term.current_line(), "hello ");
        assert_eq!(term.cursor_x(), 6);

        // the divider goes along with the word before it
        term.backspace(true);
        assert_eq!(term.current_line(), "");
        term.backspace(true);
        assert_eq!(term.cursor_x(), 0);
    }

    #[test]
    fn backspace_and_delete_at_edges_are_noops() {
        let mut term = typed("ab");
        term.delete_key(false);
        term.delete_key(true);
        assert_eq!(term.current_line(), "ab");

        term.home();
        term.backspace(false);
        term.backspace(true);
        assert_eq!(term.current_line(), "ab");
        assert_eq!(term.cursor_x(), 0);
    }

    #[test]
    fn word_delete_erases_up_to_divider() {
        let mut term = typed("rm -rf build");
        term.home();
        term.delete_key(true);
        assert_eq!(term.current_line(), " -rf build");
        term.delete_key(false);
        term.delete_key(true);
        assert_eq!(term.current_line(), " build");
    }

    #[test]
    fn word_motion() {
        let mut term = typed("cargo test --all");

        term.cursor_left(true);
        assert_eq!(term.cursor_x(), 13);
        term.cursor_left(true);
        assert_eq!(term.cursor_x(), 12);
        term.cursor_left(true);
        assert_eq!(term.cursor_x(), 11);
        term.cursor_left(true);
        assert_eq!(term.cursor_x(), 6);

        term.home();
        term.cursor_right(true);
        assert_eq!(term.cursor_x(), 5);
        term.cursor_right(true);
        assert_eq!(term.cursor_x(), 10);
        term.end();
        term.cursor_right(true);
        assert_eq!(term.cursor_x(), 16);
    }

    #[test]
    fn insertion_happens_at_the_cursor() {
        let mut term = typed("hllo");
        term.home();
        term.cursor_right(false);
        term.add_char('e');
        term.add_char('\u{7}');
        term.add_char('é');

        assert_eq!(term.current_line(), "hello");
        assert_eq!(term.cursor_x(), 2);
    }

    #[test]
    fn enter_adds_exactly_one_entry() {
        let mut term = quiet();
        for line in ["", "ls", "  "] {
            line.chars().for_each(|c| term.add_char(c));
            let before = term.history().len();

            assert_eq!(term.enter(), line);
            assert_eq!(term.history().len(), before + 1);
            assert_eq!(term.current_line(), "");
            assert_eq!(term.cursor_x(), 0);
        }
        assert_eq!(term.history().committed_count(), 3);
    }

    #[test]
    fn cursor_stays_within_the_line() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut term = quiet();

        for _ in 0..5000 {
            let word = rng.r#gen();
            match rng.gen_range(0..8) {
                0 | 1 => term.add_char(if rng.gen_bool(0.3) { ' ' } else { 'x' }),
                2 => term.backspace(word),
                3 => term.delete_key(word),
                4 => term.cursor_left(word),
                5 => term.cursor_right(word),
                6 => term.history_up(),
                _ if rng.gen_bool(0.1) => {
                    term.enter();
                },
                _ => term.history_down(),
            }
            assert!(term.cursor_x() <= term.current_line().len());
        }
    }

    #[test]
    fn recall_walks_inputs_and_restores_the_draft() {
        let mut term = quiet();
        for line in ["first", "second"] {
            line.chars().for_each(|c| term.add_char(c));
            term.enter();
        }
        term.push_message("  output");
        "dra".chars().for_each(|c| term.add_char(c));

        term.history_up();
        assert_eq!(term.current_line(), "second");
        term.history_up();
        assert_eq!(term.current_line(), "first");
        term.history_up();
        assert_eq!(term.current_line(), "first");
        assert_eq!(term.cursor_x(), 5);

        term.history_down();
        assert_eq!(term.current_line(), "second");
        term.history_down();
        assert_eq!(term.current_line(), "dra");
        term.history_down();
        assert_eq!(term.current_line(), "dra");
    }

    #[test]
    fn handle_dispatches_events() {
        let mut term = quiet();
        for c in "echo hi".chars() {
            assert_eq!(term.handle(TerminalInput::CharTyped(c)), None);
        }
        term.handle(TerminalInput::Backspace { word: true });
        term.handle(TerminalInput::Home);
        term.handle(TerminalInput::Delete { word: false });

        assert_eq!(term.handle(TerminalInput::Enter).as_deref(), Some("cho "));
    }

    #[test]
    fn commands_can_write_to_the_terminal() {
        let mut registry = CommandRegistry::<TerminalState>::new();
        registry.register("palette", "cycles the palette", |term: &mut TerminalState| {
            term.set_palette(term.palette + 1);
            term.push_message("  palette changed");
        });

        let mut term = quiet();
        "palette".chars().for_each(|c| term.add_char(c));
        let line = term.enter();
        registry.execute(&mut term, &line).unwrap();
        assert_eq!(term.palette(), TerminalPalette::preset(2));

        let err = registry.execute(&mut term, "nope").unwrap_err();
        term.push_command_error(&err);
        let last = term.history().last().unwrap();
        assert_eq!(last.text, "  Command nope not found");
        assert_eq!(term.history().len(), 3);
    }
}
