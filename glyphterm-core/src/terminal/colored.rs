use chrono::{Local, NaiveTime};
use glyphterm_data::{Cell, Rgb, TerminalPalette};

use crate::layer::glyph_code;

/// A sequence of pre-colored cells, written with [`crate::Layer::write_cell_line`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColoredLine {
    cells: Vec<Cell>,
}

impl ColoredLine {
    /// Starts a line whose palette-slot text is colored from `palette`.
    pub fn builder(palette: TerminalPalette) -> ColoredLineBuilder {
        ColoredLineBuilder::new(palette)
    }

    /// The cells of the line.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a line without cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The glyphs of the line as text, without colors.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| char::from(c.glyph)).collect()
    }
}

impl From<ColoredLine> for Vec<Cell> {
    fn from(line: ColoredLine) -> Self {
        line.cells
    }
}

/// Chainable construction of a [`ColoredLine`].
///
/// ```
/// use glyphterm_core::terminal::ColoredLine;
/// use glyphterm_data::{TerminalPalette, colors};
///
/// let line = ColoredLine::builder(TerminalPalette::preset(1))
///     .text("> ", TerminalPalette::HIGHLIGHT)
///     .text_rgb("make all ", colors::INPUT)
///     .build();
/// assert_eq!(line.text(), "> make all ");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct ColoredLineBuilder {
    palette: TerminalPalette,
    cells: Vec<Cell>,
}

impl ColoredLineBuilder {
    fn new(palette: TerminalPalette) -> Self {
        Self { palette, cells: Vec::new() }
    }

    /// Appends `text` in the color of palette `slot`.
    pub fn text(self, text: &str, slot: usize) -> Self {
        let color = self.palette.color(slot);
        self.text_rgb(text, color)
    }

    /// Appends `text` in an explicit color.
    pub fn text_rgb(mut self, text: &str, color: Rgb) -> Self {
        self.cells
            .extend(text.chars().map(|c| Cell::new(color, glyph_code(c))));
        self
    }

    /// Appends a single cell.
    pub fn cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Appends `[HH:MM:SS]` with the brackets and colons in the text color
    /// and the digits in the highlight color.
    pub fn timestamp(mut self, time: NaiveTime) -> Self {
        let text = time.format("[%H:%M:%S]").to_string();
        let punctuation = self.palette.text();
        let digits = self.palette.highlight();

        self.cells.extend(text.bytes().map(|b| {
            let color = if b.is_ascii_digit() { digits } else { punctuation };
            Cell::new(color, b)
        }));
        self
    }

    /// Appends the current local time, see [`ColoredLineBuilder::timestamp`].
    pub fn timestamp_now(self) -> Self {
        self.timestamp(Local::now().time())
    }

    /// Drops every cell past the first `max_cells`.
    pub fn trim(mut self, max_cells: usize) -> Self {
        self.cells.truncate(max_cells);
        self
    }

    /// Finishes the line.
    pub fn build(self) -> ColoredLine {
        ColoredLine { cells: self.cells }
    }
}

#[cfg(test)]
mod tests {
    use glyphterm_data::colors;

    use super::*;

    #[test]
    fn timestamp_colors_digits_and_punctuation() {
        let palette = TerminalPalette::preset(1);
        let time = NaiveTime::from_hms_opt(9, 5, 42).unwrap();
        let line = ColoredLine::builder(palette).timestamp(time).build();

        assert_eq!(line.text(), "[09:05:42]");
        let colors: Vec<Rgb> = line.cells().iter().map(|c| c.color).collect();
        for idx in [0, 3, 6, 9] {
            assert_eq!(colors[idx], palette.text(), "cell {idx}");
        }
        for idx in [1, 2, 4, 5, 7, 8] {
            assert_eq!(colors[idx], palette.highlight(), "cell {idx}");
        }
    }

    #[test]
    fn segments_keep_their_colors() {
        let palette = TerminalPalette::preset(0);
        let line = ColoredLine::builder(palette)
            .text("> ", TerminalPalette::HIGHLIGHT)
            .text_rgb("ls", colors::INPUT)
            .cell(Cell::new(colors::RED, b'!'))
            .build();

        assert_eq!(line.text(), "> ls!");
        assert_eq!(line.cells()[0].color, palette.highlight());
        assert_eq!(line.cells()[2].color, colors::INPUT);
        assert_eq!(line.cells()[4].color, colors::RED);
    }

    #[test]
    fn trim_and_wide_characters() {
        let line = ColoredLine::builder(TerminalPalette::default())
            .text("naïve ✓ check", TerminalPalette::TEXT)
            .trim(7)
            .build();

        assert_eq!(line.len(), 7);
        assert_eq!(line.cells()[2].glyph, 0xEF);
        assert_eq!(line.cells()[6].glyph, b'?');
    }
}
