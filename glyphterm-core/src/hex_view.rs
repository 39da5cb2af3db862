use std::path::Path;

use glyphterm_data::{Cell, Rgb, codes, colors};

use crate::{
    config::HexViewConfig,
    error::Error,
    layer::{CellPos, Layer},
};

/// Bytes per column group.
const GROUP: usize = 8;
/// Column of the `0x` address label.
const ADDRESS_X: i32 = 8;
/// Column of the first hex digit pair.
const HEX_X: i32 = 22;
/// Cells taken by one group of hex pairs, including the gap after it.
const GROUP_CELLS: i32 = 3 * GROUP as i32 + 1;
/// Rows kept clear above and below the dump.
const MARGIN_ROWS: usize = 6;

/// A scrollable hex dump of a byte buffer.
#[derive(Debug, Clone, Default)]
pub struct HexView {
    data: Vec<u8>,
    /// Byte offset shown on the first row; always a multiple of the row stride
    offset: usize,
    config: HexViewConfig,
}

impl HexView {
    /// Creates an empty view.
    pub fn new(config: HexViewConfig) -> Self {
        Self { data: Vec::new(), offset: 0, config }
    }

    /// Reads a whole file into the view and scrolls back to the start.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "hex dump loaded");

        self.load_bytes(data);
        Ok(())
    }

    /// Replaces the viewed bytes and scrolls back to the start.
    pub fn load_bytes(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
        self.offset = 0;
    }

    /// The viewed bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte offset of the first row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes shown per row.
    pub fn row_stride(&self) -> usize {
        GROUP * self.columns()
    }

    fn columns(&self) -> usize {
        self.config.columns.max(1)
    }

    /// Moves the view by `rows`; positive scrolls towards the end of the buffer.
    /// The first row always shows data when any is loaded.
    pub fn scroll(&mut self, rows: isize) {
        let stride = self.row_stride();
        let last_row = self.data.len().saturating_sub(1) / stride;
        let row = (self.offset / stride).saturating_add_signed(rows).min(last_row);
        self.offset = row * stride;
    }

    /// Width of the dump in cells, from the left edge to past the character column.
    pub fn field_width(&self) -> usize {
        let columns = self.columns();
        8 + 8 + (3 * GROUP + 1) * columns + 3 + GROUP * columns + 14
    }

    /// First cell of the character column.
    fn char_column_x(&self) -> i32 {
        20 + 3 + self.columns() as i32 * GROUP_CELLS + 1
    }

    /// Grey ramp from mid grey for `0x00` to white for `0xFF`.
    pub fn byte_color(byte: u8) -> Rgb {
        Rgb::grey(127 + byte / 2)
    }

    /// Glyph shown for `byte` in the character column.
    pub fn char_for_byte(&self, byte: u8) -> u8 {
        if self.config.printable_only && !(32..127).contains(&byte) {
            b'.'
        } else {
            byte
        }
    }

    /// Renders the dump into a background and a foreground layer.
    ///
    /// Rows run from `grid_height - 6` down to row 6, so the start of the
    /// visible range is at the top. Each row shows its address, the hex pairs
    /// of every column group and the raw characters between two separators.
    pub fn draw<T: Copy>(&self, background: &mut Layer<T>, foreground: &mut Layer<T>) {
        let grid_width = foreground.width() as i32;
        let grid_height = foreground.height();
        let top = CellPos::new(self.field_width() as i32, grid_height as i32 - 1);

        background.draw_rect_constant(
            CellPos::new(0, 0),
            top,
            Cell::new(colors::BLACK, codes::FILL_100),
        );
        foreground.draw_rect_constant(CellPos::new(0, 0), top, Cell::BLANK);

        let columns = self.columns();
        let char_x = self.char_column_x();
        let separator = Cell::new(colors::GREY_D, codes::VERTICAL_SINGLE);

        let rows = (MARGIN_ROWS..=grid_height.saturating_sub(MARGIN_ROWS)).rev();
        for (row, row_start) in rows.zip((self.offset..).step_by(self.row_stride())) {
            if row_start >= self.data.len() {
                break;
            }

            let y = row as i32;
            let row_end = CellPos::new(grid_width, y + 1);

            let address = format!("0x{row_start:08x}");
            foreground.write_string(CellPos::new(ADDRESS_X, y), row_end, &address, colors::GREY);

            foreground.write_char_at(CellPos::new(char_x - 1, y), separator);
            foreground.write_char_at(
                CellPos::new(char_x + (GROUP * columns) as i32, y),
                separator,
            );

            for column in 0..columns {
                for x in 0..GROUP {
                    let Some(&byte) = self.data.get(row_start + x + GROUP * column) else {
                        continue;
                    };
                    let color = Self::byte_color(byte);

                    let hex_x = HEX_X + 3 * x as i32 + GROUP_CELLS * column as i32;
                    foreground.write_string(
                        CellPos::new(hex_x, y),
                        row_end,
                        &format!("{byte:02x}"),
                        color,
                    );

                    let glyph = self.char_for_byte(byte);
                    foreground.write_char_at(
                        CellPos::new(char_x + (x + GROUP * column) as i32, y),
                        Cell::new(color, glyph),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gl::RecordingRaster, layer::LayerRole};

    fn layers(width: usize, height: usize) -> (Layer<u32>, Layer<u32>) {
        let mut raster = RecordingRaster::default();
        (
            Layer::new(width, height, LayerRole::HexBackground, &mut raster).unwrap(),
            Layer::new(width, height, LayerRole::HexForeground, &mut raster).unwrap(),
        )
    }

    fn text_at(layer: &Layer<u32>, x: i32, y: i32, len: i32) -> String {
        (x..x + len)
            .filter_map(|x| layer.get_char_at(CellPos::new(x, y)))
            .map(|c| c.glyph as char)
            .collect()
    }

    #[test]
    fn layout_of_the_first_row() {
        let mut view = HexView::new(HexViewConfig { columns: 2, printable_only: false });
        view.load_bytes((0u8..40).collect::<Vec<_>>());
        let (mut bg, mut fg) = layers(120, 20);

        view.draw(&mut bg, &mut fg);

        // first row at the top of the dump region
        let y = 20 - 6;
        assert_eq!(text_at(&fg, 8, y, 10), "0x00000000");
        assert_eq!(text_at(&fg, 22, y, 2), "00");
        assert_eq!(text_at(&fg, 25, y, 2), "01");
        // second column group starts 25 cells later with byte 8
        assert_eq!(text_at(&fg, 47, y, 2), "08");

        let char_x = 20 + 3 + 2 * 25 + 1;
        let glyph = |x| fg.get_char_at(CellPos::new(x, y)).map(|c| c.glyph);
        assert_eq!(glyph(char_x - 1), Some(codes::VERTICAL_SINGLE));
        assert_eq!(glyph(char_x + 16), Some(codes::VERTICAL_SINGLE));
        assert_eq!(glyph(char_x + 9), Some(9));

        // second row continues at the row stride
        assert_eq!(text_at(&fg, 8, y - 1, 10), "0x00000010");
        assert_eq!(text_at(&fg, 22, y - 1, 2), "10");
    }

    #[test]
    fn rows_past_the_end_stay_clear() {
        let mut view = HexView::new(HexViewConfig::default());
        view.load_bytes(vec![0xAB; 70]);
        let (mut bg, mut fg) = layers(200, 20);

        view.draw(&mut bg, &mut fg);

        // 70 bytes at 64 per row fill two rows
        assert_eq!(text_at(&fg, 8, 14, 2), "0x");
        assert_eq!(text_at(&fg, 8, 13, 2), "0x");
        assert_eq!(fg.get_char_at(CellPos::new(8, 12)), Some(Cell::BLANK));
        // the partial row has only the six remaining bytes
        assert_eq!(text_at(&fg, 22 + 3 * 5, 13, 2), "ab");
        assert_eq!(fg.get_char_at(CellPos::new(22 + 3 * 6, 13)), Some(Cell::BLANK));

        let backing = bg.get_char_at(CellPos::new(0, 0)).map(|c| c.glyph);
        assert_eq!(backing, Some(codes::FILL_100));
    }

    #[test]
    fn byte_colors_ramp_from_mid_grey() {
        assert_eq!(HexView::byte_color(0x00), Rgb::grey(127));
        assert_eq!(HexView::byte_color(0xFF), Rgb::grey(254));
        assert!(HexView::byte_color(0x80).r > HexView::byte_color(0x7F).r);
    }

    #[test]
    fn printable_only_masks_control_bytes() {
        let view = HexView::new(HexViewConfig { columns: 8, printable_only: true });
        assert_eq!(view.char_for_byte(b'A'), b'A');
        assert_eq!(view.char_for_byte(0x07), b'.');
        assert_eq!(view.char_for_byte(0xC8), b'.');

        let raw = HexView::new(HexViewConfig::default());
        assert_eq!(raw.char_for_byte(0xC8), 0xC8);
    }

    #[test]
    fn scroll_is_clamped_to_the_data() {
        let mut view = HexView::new(HexViewConfig { columns: 1, printable_only: false });
        view.load_bytes(vec![0; 30]);

        view.scroll(2);
        assert_eq!(view.offset(), 16);
        view.scroll(10);
        assert_eq!(view.offset(), 24);
        view.scroll(-10);
        assert_eq!(view.offset(), 0);

        view.load_bytes(Vec::new());
        view.scroll(3);
        assert_eq!(view.offset(), 0);
    }

    #[test]
    fn field_width_matches_layout() {
        let view = HexView::new(HexViewConfig::default());
        assert_eq!(view.field_width(), 8 + 8 + 25 * 8 + 3 + 64 + 14);
    }
}
