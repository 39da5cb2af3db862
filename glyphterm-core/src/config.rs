use compact_str::CompactString;

/// Width of one glyph cell in pixels.
pub const CELL_WIDTH_PX: u32 = 8;
/// Height of one glyph cell in pixels.
pub const CELL_HEIGHT_PX: u32 = 16;

/// Geometry of the overlay render target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    /// Render target width in pixels
    pub width_px: u32,
    /// Render target height in pixels
    pub height_px: u32,
    /// Layout of the hex dump view
    pub hex_view: HexViewConfig,
}

impl OverlayConfig {
    /// Creates a configuration for a `width_px` x `height_px` target.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self { width_px, height_px, ..Self::default() }
    }

    /// Number of whole glyph cells covering the target, `(columns, rows)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (
            (self.width_px / CELL_WIDTH_PX) as usize,
            (self.height_px / CELL_HEIGHT_PX) as usize,
        )
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width_px: 1920,
            height_px: 1080,
            hex_view: HexViewConfig::default(),
        }
    }
}

/// Layout of the hex dump view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HexViewConfig {
    /// Groups of eight bytes per row
    pub columns: usize,
    /// Show `.` for bytes outside printable ASCII in the character column
    pub printable_only: bool,
}

impl Default for HexViewConfig {
    fn default() -> Self {
        Self { columns: 8, printable_only: false }
    }
}

/// Placement and behavior of a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerminalConfig {
    /// Column of the input row's first cell
    pub base_x: usize,
    /// Row of the input line; history grows upwards from here
    pub base_y: usize,
    /// Width in cells
    pub width: usize,
    /// Visible history rows
    pub height: usize,
    /// Text shown before the input line
    pub prompt: CompactString,
    /// Index into the built-in palettes
    pub palette: usize,
    /// History entries kept before the oldest is evicted
    pub history_capacity: usize,
    /// Timestamped line placed in the history at startup
    pub greeting: Option<CompactString>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            base_x: 10,
            base_y: 5,
            width: 120,
            height: 42,
            prompt: CompactString::const_new("> "),
            palette: 1,
            history_capacity: 4096,
            greeting: Some(CompactString::const_new("Welcome to glyphterm")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_counts_whole_cells() {
        assert_eq!(OverlayConfig::new(1920, 1080).grid_size(), (240, 67));
        assert_eq!(OverlayConfig::new(7, 15).grid_size(), (0, 0));
        assert_eq!(OverlayConfig::new(17, 33).grid_size(), (2, 2));
    }
}
