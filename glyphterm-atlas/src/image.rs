use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::AtlasError;

/// A decoded 8-bit RGBA image, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl RgbaImage {
    /// Creates a fully transparent image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width * height],
        }
    }

    /// Wraps a tightly packed RGBA byte buffer.
    ///
    /// # Errors
    /// Returns [`AtlasError::BufferSize`] if `bytes` is not `width * height * 4` long.
    pub fn from_rgba_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, AtlasError> {
        if bytes.len() != width * height * 4 {
            return Err(AtlasError::BufferSize { width, height, len: bytes.len() });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();

        Ok(Self { width, height, pixels })
    }

    /// Decodes a PNG file from disk.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not a decodable PNG.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let bytes = std::fs::read(path)?;
        Self::decode_png(&bytes)
    }

    /// Decodes an in-memory PNG, normalizing any color type to RGBA8.
    ///
    /// # Errors
    /// Fails on malformed PNG data or on pixel formats that do not expand to 8-bit channels.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, AtlasError> {
        let mut decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let (width, height) = {
            let info = reader.info();
            (info.width as usize, info.height as usize)
        };

        // expanded output never exceeds four 8-bit channels
        let mut buf = vec![0; width * height * 4];
        let frame = reader.next_frame(&mut buf)?;
        if frame.bit_depth != png::BitDepth::Eight {
            return Err(AtlasError::UnsupportedPixelFormat(format!(
                "bit depth {:?}",
                frame.bit_depth
            )));
        }

        let data = &buf[..frame.buffer_size()];
        let pixels: Vec<[u8; 4]> = match frame.color_type {
            png::ColorType::Rgba => data
                .chunks_exact(4)
                .map(|px| [px[0], px[1], px[2], px[3]])
                .collect(),
            png::ColorType::Rgb => data
                .chunks_exact(3)
                .map(|px| [px[0], px[1], px[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => data
                .chunks_exact(2)
                .map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
            png::ColorType::Grayscale => data
                .iter()
                .map(|&g| [g, g, g, 255])
                .collect(),
            other => {
                return Err(AtlasError::UnsupportedPixelFormat(format!("{other:?}")));
            },
        };

        if pixels.len() != width * height {
            return Err(AtlasError::BufferSize { width, height, len: data.len() });
        }

        Ok(Self { width, height, pixels })
    }

    /// Encodes the image as an RGBA8 PNG.
    ///
    /// # Errors
    /// Fails if the PNG encoder rejects the data.
    pub fn encode_png(&self) -> Result<Vec<u8>, AtlasError> {
        let mut out = Vec::new();
        self.write_png(&mut out)?;
        Ok(out)
    }

    /// Writes the image to disk as a PNG.
    ///
    /// # Errors
    /// Fails if the file cannot be created or the encoder rejects the data.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), AtlasError> {
        self.write_png(BufWriter::new(File::create(path)?))
    }

    fn write_png(&self, out: impl Write) -> Result<(), AtlasError> {
        let mut encoder = png::Encoder::new(out, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_rgba_bytes())?;

        Ok(())
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Overwrites the pixel at `(x, y)`; out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = pixel;
        }
    }

    /// Returns the pixels as a tightly packed RGBA byte buffer.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut image = RgbaImage::new(3, 2);
        image.set(0, 0, [205, 205, 205, 255]);
        image.set(2, 1, [65, 0, 0, 255]);

        let encoded = image.encode_png().unwrap();
        let decoded = RgbaImage::decode_png(&encoded).unwrap();

        assert_eq!(decoded, image);
    }

    #[test]
    fn rejects_short_buffers() {
        let err = RgbaImage::from_rgba_bytes(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(err, AtlasError::BufferSize { len: 15, .. }));
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut image = RgbaImage::new(1, 1);
        image.set(5, 5, [1, 2, 3, 4]);
        assert_eq!(image.get(5, 5), None);
        assert_eq!(image.get(0, 0), Some([0; 4]));
    }
}
