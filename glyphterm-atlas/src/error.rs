/// Errors raised while decoding or scanning a glyph atlas image.
#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    /// A glyph footprint has no usable index pixel, or the image ends inside it.
    #[error("Malformed atlas at ({x}, {y}): {reason}")]
    MalformedAtlas {
        /// Column of the footprint's top-left corner
        x: usize,
        /// Row of the footprint's top-left corner
        y: usize,
        /// What was wrong
        reason: String,
    },

    /// A pixel inside a glyph rectangle is neither marker color.
    #[error("Inconsistent glyph footprint: pixel ({x}, {y}) is {found:?}")]
    InconsistentGlyphFootprint {
        /// Column of the offending pixel
        x: usize,
        /// Row of the offending pixel
        y: usize,
        /// The RGBA value found there
        found: [u8; 4],
    },

    /// Two footprints decode to the same glyph index.
    #[error("Duplicate glyph index {0}")]
    DuplicateIndex(u32),

    /// The image contains no glyph footprints.
    #[error("Atlas image contains no glyphs")]
    EmptyAtlas,

    /// The pixel buffer does not match the stated dimensions.
    #[error("Pixel buffer of {len} bytes does not match a {width}x{height} RGBA image")]
    BufferSize {
        /// Stated width
        width: usize,
        /// Stated height
        height: usize,
        /// Actual buffer length in bytes
        len: usize,
    },

    /// The PNG uses a pixel format that cannot be normalized to RGBA8.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// PNG decoding failed.
    #[error("PNG decoding failed: {0}")]
    Decode(#[from] png::DecodingError),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    /// Reading or writing the image file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    pub(crate) fn missing_index_pixel(x: usize, y: usize) -> Self {
        Self::MalformedAtlas {
            x,
            y,
            reason: "index pixel is outside the image".to_string(),
        }
    }

    pub(crate) fn blank_index_pixel(x: usize, y: usize) -> Self {
        Self::MalformedAtlas {
            x,
            y,
            reason: "index pixel is transparent or a marker color".to_string(),
        }
    }
}
