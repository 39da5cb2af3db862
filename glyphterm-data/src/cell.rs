/// An 8-bit per channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its three components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a grey with all three channels set to `value`.
    pub const fn grey(value: u8) -> Self {
        Self { r: value, g: value, b: value }
    }

    /// Converts normalized `[0.0, 1.0]` channels to 8-bit values.
    ///
    /// Each channel is scaled by 255 and truncated; values outside the unit
    /// range are clamped first.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self { r: channel(r), g: channel(g), b: channel(b) }
    }

    /// Returns the color packed as `0xRRGGBB`.
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

impl From<u32> for Rgb {
    /// Unpacks a `0xRRGGBB` value.
    fn from(packed: u32) -> Self {
        let bytes = packed.to_le_bytes();
        Self { r: bytes[2], g: bytes[1], b: bytes[0] }
    }
}

/// A single character cell of an overlay layer.
///
/// A cell pairs an 8-bit glyph code with a foreground color. Cells are plain
/// values and are copied freely between layers and colored lines.
///
/// # GPU Layout
/// Each cell is uploaded as one RGBA8UI texel:
/// - `[0]`: red
/// - `[1]`: green
/// - `[2]`: blue
/// - `[3]`: glyph code
///
/// Glyph code `0` is the blank cell; the compositing shader skips it, so a
/// blank cell never overwrites what lower layers drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Foreground color of the glyph
    pub color: Rgb,
    /// Glyph code, indexing the glyph atlas
    pub glyph: u8,
}

impl Cell {
    /// The all-zero cell: no glyph, black.
    pub const BLANK: Cell = Cell { color: Rgb::new(0, 0, 0), glyph: 0 };

    /// Size in bytes of one cell in the GPU upload buffer.
    pub const TEXEL_SIZE: usize = 4;

    /// Creates a cell showing `glyph` in `color`.
    pub const fn new(color: Rgb, glyph: u8) -> Self {
        Self { color, glyph }
    }

    /// Returns true if the cell carries no glyph.
    pub const fn is_blank(&self) -> bool {
        self.glyph == 0
    }

    /// Returns the RGBA8UI texel for this cell.
    pub const fn to_texel(self) -> [u8; 4] {
        [self.color.r, self.color.g, self.color.b, self.glyph]
    }

    /// Reconstructs a cell from its texel representation.
    pub const fn from_texel(texel: [u8; 4]) -> Self {
        Self {
            color: Rgb::new(texel[0], texel[1], texel[2]),
            glyph: texel[3],
        }
    }
}
