use std::collections::BTreeMap;

use glyphterm_data::{Glyph, GlyphBitmap};

use crate::{AtlasError, RgbaImage};

/// Marker color of a foreground (lit) glyph pixel.
pub const FOREGROUND_MARKER: [u8; 4] = [205, 205, 205, 255];
/// Marker color of a background (unlit) glyph pixel.
pub const BACKGROUND_MARKER: [u8; 4] = [69, 69, 69, 255];
/// Value written over consumed footprint pixels.
pub const CLEARED: [u8; 4] = [0, 0, 0, 0];

/// A read-only table of glyphs, keyed by glyph index.
///
/// The atlas is built once from a source image in which every glyph is a
/// rectangle of [`FOREGROUND_MARKER`] and [`BACKGROUND_MARKER`] pixels. The
/// glyph's index is stored in the pixel diagonally below-right of the
/// rectangle's bottom-right corner, encoded as `b * 255² + g * 255 + r`.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    glyphs: BTreeMap<u32, Glyph>,
}

impl GlyphAtlas {
    /// Scans `image` for glyph footprints.
    ///
    /// The image is consumed: footprints are cleared as they are extracted so
    /// that the row-major scan never rediscovers a glyph.
    ///
    /// # Errors
    /// - [`AtlasError::InconsistentGlyphFootprint`] if a footprint rectangle
    ///   contains a non-marker pixel.
    /// - [`AtlasError::MalformedAtlas`] if a footprint has no usable index pixel.
    /// - [`AtlasError::DuplicateIndex`] if two footprints share an index.
    /// - [`AtlasError::EmptyAtlas`] if no footprint is found.
    pub fn load(mut image: RgbaImage) -> Result<Self, AtlasError> {
        let mut glyphs = BTreeMap::new();

        for y in 0..image.height() {
            let mut x = 0;
            while x < image.width() {
                if !image.get(x, y).is_some_and(is_marker) {
                    x += 1;
                    continue;
                }

                let glyph = read_glyph_at(&mut image, x, y).inspect_err(|e| {
                    tracing::warn!(x, y, error = %e, "rejecting glyph atlas");
                })?;
                tracing::debug!(
                    index = glyph.index,
                    x,
                    y,
                    width = glyph.width(),
                    height = glyph.height(),
                    "extracted glyph"
                );

                let index = glyph.index;
                x += glyph.width();
                if glyphs.insert(index, glyph).is_some() {
                    tracing::warn!(index, "duplicate glyph index");
                    return Err(AtlasError::DuplicateIndex(index));
                }
            }
        }

        if glyphs.is_empty() {
            return Err(AtlasError::EmptyAtlas);
        }

        tracing::info!(glyph_count = glyphs.len(), "glyph atlas loaded");
        Ok(Self { glyphs })
    }

    /// Decodes and scans a PNG atlas from disk.
    ///
    /// # Errors
    /// Fails if the file cannot be decoded or [`GlyphAtlas::load`] rejects it.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, AtlasError> {
        Self::load(RgbaImage::open(path)?)
    }

    /// Returns the glyph with the given index.
    pub fn get(&self, index: u32) -> Option<&Glyph> {
        self.glyphs.get(&index)
    }

    /// Number of glyphs in the atlas.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns true if the atlas holds no glyphs.
    ///
    /// Always false for an atlas built by [`GlyphAtlas::load`].
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Iterates over the glyphs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }
}

fn is_marker(pixel: [u8; 4]) -> bool {
    pixel == FOREGROUND_MARKER || pixel == BACKGROUND_MARKER
}

/// Extracts the glyph whose footprint has its top-left corner at `(x, y)`.
fn read_glyph_at(image: &mut RgbaImage, x: usize, y: usize) -> Result<Glyph, AtlasError> {
    let is_marker_at =
        |image: &RgbaImage, px: usize, py: usize| image.get(px, py).is_some_and(is_marker);

    // the scan runs row-major, so (x, y) is the top-left corner
    let mut right = x;
    while is_marker_at(image, right + 1, y) {
        right += 1;
    }

    let mut bottom = y;
    while is_marker_at(image, x, bottom + 1) {
        bottom += 1;
    }

    let width = right - x + 1;
    let height = bottom - y + 1;

    let index_pixel = image
        .get(right + 1, bottom + 1)
        .ok_or_else(|| AtlasError::missing_index_pixel(x, y))?;
    if index_pixel[3] == 0 || is_marker(index_pixel) {
        return Err(AtlasError::blank_index_pixel(x, y));
    }

    let mut bits = Vec::with_capacity(width * height);
    for py in y..=bottom {
        for px in x..=right {
            match image.get(px, py) {
                Some(FOREGROUND_MARKER) => bits.push(true),
                Some(BACKGROUND_MARKER) => bits.push(false),
                Some(found) => {
                    return Err(AtlasError::InconsistentGlyphFootprint { x: px, y: py, found });
                },
                None => return Err(AtlasError::missing_index_pixel(x, y)),
            }
        }
    }

    for py in y..=bottom {
        for px in x..=right {
            image.set(px, py, CLEARED);
        }
    }

    let bitmap = GlyphBitmap::new(width, height, bits)
        .ok_or_else(|| AtlasError::MalformedAtlas {
            x,
            y,
            reason: format!("empty {width}x{height} footprint"),
        })?;

    Ok(Glyph::new(decode_index(index_pixel), bitmap))
}

/// Decodes the base-255 glyph index stored in an RGBA pixel.
pub fn decode_index(pixel: [u8; 4]) -> u32 {
    let [r, g, b, _] = pixel.map(u32::from);
    b * 255 * 255 + g * 255 + r
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Paints an 8x16 glyph with its top-left at `(x, y)`; the first column is lit.
    pub(crate) fn paint_glyph(image: &mut RgbaImage, x: usize, y: usize, index: u32) {
        for gy in 0..16 {
            for gx in 0..8 {
                let marker = if gx == 0 || gy == 0 { FOREGROUND_MARKER } else { BACKGROUND_MARKER };
                image.set(x + gx, y + gy, marker);
            }
        }

        let r = (index % 255) as u8;
        let g = ((index / 255) % 255) as u8;
        let b = (index / (255 * 255)) as u8;
        image.set(x + 8, y + 16, [r, g, b, 255]);
    }

    pub(crate) fn two_glyph_image() -> RgbaImage {
        let mut image = RgbaImage::new(24, 20);
        paint_glyph(&mut image, 0, 0, 65);
        paint_glyph(&mut image, 12, 1, 66);
        image
    }

    #[test]
    fn loads_two_glyphs() {
        let atlas = GlyphAtlas::load(two_glyph_image()).unwrap();

        assert_eq!(atlas.len(), 2);
        let indices: Vec<u32> = atlas.iter().map(|g| g.index).collect();
        assert_eq!(indices, vec![65, 66]);

        for glyph in atlas.iter() {
            assert_eq!((glyph.width(), glyph.height()), (8, 16));
            assert!(glyph.bitmap.is_set(0, 5));
            assert!(glyph.bitmap.is_set(5, 0));
            assert!(!glyph.bitmap.is_set(5, 5));
        }
    }

    #[test]
    fn index_decoding_uses_base_255() {
        assert_eq!(decode_index([65, 0, 0, 255]), 65);
        assert_eq!(decode_index([1, 2, 3, 255]), 3 * 65025 + 2 * 255 + 1);
    }

    #[test]
    fn large_indices_survive_the_scan() {
        let mut image = RgbaImage::new(12, 20);
        paint_glyph(&mut image, 0, 0, 70_000);

        let atlas = GlyphAtlas::load(image).unwrap();
        assert!(atlas.get(70_000).is_some());
    }

    #[test]
    fn missing_index_pixel_is_malformed() {
        // footprint touches the image edge; no room for the index pixel
        let mut image = RgbaImage::new(8, 16);
        for y in 0..16 {
            for x in 0..8 {
                image.set(x, y, BACKGROUND_MARKER);
            }
        }

        let err = GlyphAtlas::load(image).unwrap_err();
        assert!(matches!(err, AtlasError::MalformedAtlas { x: 0, y: 0, .. }));
    }

    #[test]
    fn transparent_index_pixel_is_malformed() {
        let mut image = two_glyph_image();
        image.set(8, 16, CLEARED);

        let err = GlyphAtlas::load(image).unwrap_err();
        assert!(matches!(err, AtlasError::MalformedAtlas { .. }));
    }

    #[test]
    fn stray_pixel_inside_footprint_is_rejected() {
        let mut image = two_glyph_image();
        image.set(3, 7, [255, 0, 0, 255]);

        let err = GlyphAtlas::load(image).unwrap_err();
        assert!(matches!(
            err,
            AtlasError::InconsistentGlyphFootprint { x: 3, y: 7, found: [255, 0, 0, 255] }
        ));
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let mut image = RgbaImage::new(24, 20);
        paint_glyph(&mut image, 0, 0, 65);
        paint_glyph(&mut image, 12, 0, 65);

        let err = GlyphAtlas::load(image).unwrap_err();
        assert!(matches!(err, AtlasError::DuplicateIndex(65)));
    }

    #[test]
    fn image_without_markers_is_empty() {
        let err = GlyphAtlas::load(RgbaImage::new(4, 4)).unwrap_err();
        assert!(matches!(err, AtlasError::EmptyAtlas));
    }
}
