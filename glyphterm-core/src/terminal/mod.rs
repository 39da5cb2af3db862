//! Line-editing terminal model.
//!
//! [`TerminalState`] owns the input line, the cursor and the scrollback; it
//! knows nothing about layers. [`crate::LayerManager::draw_terminal`] reads
//! it once per frame. Submitted lines can be run through a
//! [`CommandRegistry`].

mod colored;
mod command;
mod history;
mod input;
mod state;

pub use colored::{ColoredLine, ColoredLineBuilder};
pub use command::{ArgType, ArgValue, Args, CommandError, CommandRegistry};
pub use history::{EntryKind, History, HistoryEntry};
pub use input::TerminalInput;
pub use state::TerminalState;
