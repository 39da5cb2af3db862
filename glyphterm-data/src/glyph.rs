/// A glyph extracted from a bitmap font atlas.
///
/// The `index` is the glyph code the overlay cells refer to; for the
/// bundled code-page fonts it is the byte value of the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Glyph code, unique within an atlas
    pub index: u32,
    /// Monochrome footprint of the glyph
    pub bitmap: GlyphBitmap,
}

impl Glyph {
    /// Creates a glyph from its code and footprint.
    pub fn new(index: u32, bitmap: GlyphBitmap) -> Self {
        Self { index, bitmap }
    }

    /// Width of the glyph in pixels.
    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    /// Height of the glyph in pixels.
    pub fn height(&self) -> usize {
        self.bitmap.height()
    }
}

/// A rectangular, non-empty grid of foreground/background pixels.
///
/// Pixels are stored row-major, top row first; `true` is foreground.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl GlyphBitmap {
    /// Creates a bitmap from row-major pixels.
    ///
    /// Returns `None` if either dimension is zero or `bits` does not hold
    /// exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, bits: Vec<bool>) -> Option<Self> {
        if width == 0 || height == 0 || bits.len() != width * height {
            return None;
        }

        Some(Self { width, height, bits })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the pixel at `(x, y)` is foreground.
    ///
    /// Out-of-range coordinates read as background.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    /// Iterates over the rows of the bitmap, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.bits.chunks_exact(self.width)
    }

    /// Number of foreground pixels.
    pub fn coverage(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }
}

impl std::fmt::Debug for GlyphBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("coverage", &self.coverage())
            .finish()
    }
}

/// Glyph codes of the code-page 437 drawing characters used by the overlay.
#[rustfmt::skip]
pub mod codes {
    /// `╔`
    pub const TOP_LEFT_DOUBLE_CORNER: u8     = 201;
    /// `╗`
    pub const TOP_RIGHT_DOUBLE_CORNER: u8    = 187;
    /// `╚`
    pub const BOTTOM_LEFT_DOUBLE_CORNER: u8  = 200;
    /// `╝`
    pub const BOTTOM_RIGHT_DOUBLE_CORNER: u8 = 188;
    /// `║`
    pub const VERTICAL_DOUBLE: u8            = 186;
    /// `═`
    pub const HORIZONTAL_DOUBLE: u8          = 205;

    /// `┌`
    pub const TOP_LEFT_SINGLE_CORNER: u8     = 218;
    /// `┐`
    pub const TOP_RIGHT_SINGLE_CORNER: u8    = 191;
    /// `└`
    pub const BOTTOM_LEFT_SINGLE_CORNER: u8  = 192;
    /// `┘`
    pub const BOTTOM_RIGHT_SINGLE_CORNER: u8 = 217;
    /// `│`
    pub const VERTICAL_SINGLE: u8            = 179;
    /// `─`
    pub const HORIZONTAL_SINGLE: u8          = 196;

    /// `⌠`
    pub const CURLY_SCROLL_TOP: u8           = 244;
    /// `⌡`
    pub const CURLY_SCROLL_BOTTOM: u8        = 245;
    /// `│`
    pub const CURLY_SCROLL_MIDDLE: u8        = 179;

    /// Empty cell (space)
    pub const FILL_0: u8                     = 32;
    /// `░`
    pub const FILL_25: u8                    = 176;
    /// `▒`
    pub const FILL_50: u8                    = 177;
    /// `▓`
    pub const FILL_75: u8                    = 178;
    /// `█`
    pub const FILL_100: u8                   = 219;

    /// The five fill-density levels, emptiest first.
    pub const FILLS: [u8; 5] = [FILL_0, FILL_25, FILL_50, FILL_75, FILL_100];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_rejects_empty_and_ragged_input() {
        assert!(GlyphBitmap::new(0, 16, vec![]).is_none());
        assert!(GlyphBitmap::new(8, 16, vec![false; 127]).is_none());
        assert!(GlyphBitmap::new(8, 16, vec![false; 128]).is_some());
    }

    #[test]
    fn bitmap_reads_row_major() {
        // 3x2:
        // #..
        // ..#
        let bits = vec![true, false, false, false, false, true];
        let bitmap = GlyphBitmap::new(3, 2, bits).unwrap();

        assert!(bitmap.is_set(0, 0));
        assert!(bitmap.is_set(2, 1));
        assert!(!bitmap.is_set(1, 0));
        assert!(!bitmap.is_set(3, 0));
        assert_eq!(bitmap.coverage(), 2);
        assert_eq!(bitmap.rows().count(), 2);
    }
}
