//! Glyph atlas ingestion for the glyphterm overlay.
//!
//! A glyph atlas source image holds monospace glyph footprints drawn in two
//! marker colors, each followed by an index pixel. [`GlyphAtlas::load`]
//! turns such an image into a read-only table of glyph bitmaps, and
//! [`GlyphAtlas::texture`] packs the 8-bit glyphs into the texture the
//! compositing shader samples.

mod atlas;
mod error;
mod image;
mod texture;

pub use atlas::{BACKGROUND_MARKER, CLEARED, FOREGROUND_MARKER, GlyphAtlas, decode_index};
pub use error::AtlasError;
pub use glyphterm_data::{Glyph, GlyphBitmap};
pub use image::RgbaImage;
pub use texture::{AtlasTexture, GLYPH_HEIGHT, GLYPH_WIDTH, SLOTS_PER_ROW};
