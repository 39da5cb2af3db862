//! Value types shared by the glyphterm overlay crates.
//!
//! Nothing in here touches the GPU or the file system: cells, colors,
//! palettes and glyph bitmaps are plain data that the atlas loader produces
//! and the layer renderer consumes.

mod cell;
mod glyph;
mod palette;

pub use cell::{Cell, Rgb};
pub use glyph::{Glyph, GlyphBitmap, codes};
pub use palette::{TerminalPalette, colors};
