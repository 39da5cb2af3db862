use crate::GlyphAtlas;

/// Width of one glyph slot in the GPU atlas texture.
pub const GLYPH_WIDTH: usize = 8;
/// Height of one glyph slot in the GPU atlas texture.
pub const GLYPH_HEIGHT: usize = 16;
/// Glyph slots per texture row; 16x16 slots cover every 8-bit glyph code.
pub const SLOTS_PER_ROW: usize = 16;

/// The glyph atlas packed for upload as an RGBA8UI image.
///
/// Glyph code `n` occupies the 8x16 slot at column `n % 16`, row `n / 16`.
/// Lit pixels are `[255, 255, 255, 255]`, everything else is zero. Only
/// glyphs with an 8-bit index and an exact 8x16 footprint are packed.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasTexture {
    /// Texture width in pixels
    pub width: usize,
    /// Texture height in pixels
    pub height: usize,
    /// Tightly packed RGBA texels, top row first
    pub texels: Vec<u8>,
}

impl std::fmt::Debug for AtlasTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("texture_data_kb", &(self.texels.len() / 1024))
            .finish()
    }
}

impl AtlasTexture {
    /// Returns the texel of pixel `(gx, gy)` within the slot of glyph `code`,
    /// or `None` if the coordinate lies outside the 8x16 slot.
    pub fn glyph_texel(&self, code: u8, gx: usize, gy: usize) -> Option<[u8; 4]> {
        if gx >= GLYPH_WIDTH || gy >= GLYPH_HEIGHT {
            return None;
        }

        let (x, y) = slot_origin(code);
        let offset = ((y + gy) * self.width + x + gx) * 4;
        let texel = self.texels.get(offset..offset + 4)?;
        Some([texel[0], texel[1], texel[2], texel[3]])
    }
}

impl GlyphAtlas {
    /// Packs the 8-bit glyphs of the atlas into a GPU texture image.
    pub fn texture(&self) -> AtlasTexture {
        let width = GLYPH_WIDTH * SLOTS_PER_ROW;
        let height = GLYPH_HEIGHT * SLOTS_PER_ROW;
        let mut texels = vec![0; width * height * 4];

        for glyph in self.iter() {
            let Ok(code) = u8::try_from(glyph.index) else {
                tracing::debug!(index = glyph.index, "glyph index outside 8-bit range; not packed");
                continue;
            };
            if (glyph.width(), glyph.height()) != (GLYPH_WIDTH, GLYPH_HEIGHT) {
                tracing::warn!(
                    index = glyph.index,
                    width = glyph.width(),
                    height = glyph.height(),
                    "glyph is not 8x16; not packed"
                );
                continue;
            }

            let (x, y) = slot_origin(code);
            for (gy, row) in glyph.bitmap.rows().enumerate() {
                for (gx, _) in row.iter().enumerate().filter(|(_, lit)| **lit) {
                    let offset = ((y + gy) * width + x + gx) * 4;
                    texels[offset..offset + 4].copy_from_slice(&[255; 4]);
                }
            }
        }

        AtlasTexture { width, height, texels }
    }
}

fn slot_origin(code: u8) -> (usize, usize) {
    let code = code as usize;
    ((code % SLOTS_PER_ROW) * GLYPH_WIDTH, (code / SLOTS_PER_ROW) * GLYPH_HEIGHT)
}
