use std::path::Path;

use glyphterm_data::{Cell, Rgb, TerminalPalette, codes, colors};

use crate::{
    config::OverlayConfig,
    error::Error,
    frame_timer::FrameTimer,
    gl::{ImageAccess, ImageSlot, RasterService},
    hex_view::HexView,
    layer::{CellPos, Layer, LayerRole, allocate_cells},
    progress::ProgressBar,
    terminal::{ColoredLine, TerminalState},
};

/// Owns the overlay's layers and draws the built-in widgets into them.
///
/// The grid covers the render target in whole 8x16 pixel cells; every layer
/// has the same dimensions. [`LayerManager::draw`] composites the layers in
/// [`LayerRole`] order. `T` and `P` are the texture and program handles of
/// the [`RasterService`] the manager was created with.
#[derive(Debug)]
pub struct LayerManager<T, P> {
    config: OverlayConfig,
    bins_width: usize,
    bins_height: usize,
    /// Indexed by [`LayerRole::index`]
    layers: Vec<Layer<T>>,
    program: P,
    atlas_texture: T,
    frame_timer: FrameTimer,
    hex: HexView,
}

impl<T: Copy, P: Copy> LayerManager<T, P> {
    /// Creates one blank layer per [`LayerRole`], sized to the grid of `config`.
    ///
    /// `program` is the glyph compositing program and `atlas_texture` the
    /// packed glyph atlas, both created through `raster`.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the target is smaller than one cell
    /// or a layer cannot be allocated.
    pub fn new<R>(
        config: OverlayConfig,
        program: P,
        atlas_texture: T,
        raster: &mut R,
    ) -> Result<Self, Error>
    where
        R: RasterService<Texture = T, Program = P>,
    {
        let (bins_width, bins_height) = config.grid_size();
        let layers = LayerRole::ALL
            .iter()
            .map(|&role| Layer::new(bins_width, bins_height, role, raster))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            width_px = config.width_px,
            height_px = config.height_px,
            bins_width,
            bins_height,
            layers = layers.len(),
            "layer manager created"
        );

        Ok(Self {
            hex: HexView::new(config.hex_view),
            config,
            bins_width,
            bins_height,
            layers,
            program,
            atlas_texture,
            frame_timer: FrameTimer::new(),
        })
    }

    /// Grid dimensions in cells, `(columns, rows)`.
    pub fn bins(&self) -> (usize, usize) {
        (self.bins_width, self.bins_height)
    }

    /// The current configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The layer drawn for `role`.
    pub fn layer(&self, role: LayerRole) -> &Layer<T> {
        &self.layers[role.index()]
    }

    /// Mutable access to the layer drawn for `role`.
    pub fn layer_mut(&mut self, role: LayerRole) -> &mut Layer<T> {
        &mut self.layers[role.index()]
    }

    /// Resizes the grid to a new render target; every layer is cleared.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the target is smaller than one cell
    /// or a grid cannot be allocated; the manager is then left unchanged.
    pub fn resize(&mut self, width_px: u32, height_px: u32) -> Result<(), Error> {
        let config = OverlayConfig { width_px, height_px, ..self.config.clone() };
        let (bins_width, bins_height) = config.grid_size();

        // every grid is allocated before any layer changes
        let grids = self
            .layers
            .iter()
            .map(|_| allocate_cells(bins_width, bins_height))
            .collect::<Result<Vec<_>, _>>()?;
        for (layer, cells) in self.layers.iter_mut().zip(grids) {
            layer.replace_grid(bins_width, bins_height, cells);
        }

        self.config = config;
        self.bins_width = bins_width;
        self.bins_height = bins_height;
        Ok(())
    }

    /// Draws `bar` right-aligned on `row` over an opaque strip.
    ///
    /// The label and brackets are white; the filled bar and the percentage
    /// take the bar's completion color.
    pub fn draw_progress_bar_string(&mut self, row: i32, bar: &ProgressBar) {
        let color = bar.color();
        let line = ColoredLine::builder(TerminalPalette::default())
            .text_rgb(&bar.label, colors::WHITE)
            .text_rgb("[", colors::WHITE)
            .text_rgb(&bar.filled_portion(), color)
            .text_rgb(&bar.empty_portion(), colors::WHITE)
            .text_rgb("] ", colors::WHITE)
            .text_rgb(&bar.percentage_string(), color)
            .text_rgb("%", colors::WHITE)
            .build();

        self.draw_right_aligned(row, line.cells(), true);
    }

    /// Draws `text` right-aligned on `row` over an opaque strip of its width.
    pub fn draw_black_backed_string(&mut self, row: i32, text: &str, color: Rgb) {
        let line = ColoredLine::builder(TerminalPalette::default())
            .text_rgb(text, color)
            .build();
        self.draw_right_aligned(row, line.cells(), true);
    }

    /// Draws pre-colored cells right-aligned on `row` over an opaque strip.
    pub fn draw_black_backed_color_string(&mut self, row: i32, line: &ColoredLine) {
        self.draw_right_aligned(row, line.cells(), true);
    }

    /// Draws pre-colored cells right-aligned on `row` without a backing strip.
    pub fn draw_no_bg_color_string(&mut self, row: i32, line: &ColoredLine) {
        self.draw_right_aligned(row, line.cells(), false);
    }

    fn draw_right_aligned(&mut self, row: i32, cells: &[Cell], backed: bool) {
        let width = self.bins_width as i32;
        let start = CellPos::new(width - cells.len() as i32, row);

        if backed {
            self.layer_mut(LayerRole::Background).draw_rect_constant(
                start,
                CellPos::new(width, row),
                Cell::new(colors::BLACK, codes::FILL_100),
            );
        }

        self.layer_mut(LayerRole::Foreground)
            .write_cell_line(start, CellPos::new(width, row + 1), cells);
    }

    /// Records a frame time and draws the smoothed value on the bottom row.
    pub fn update(&mut self, delta_seconds: f32) {
        self.frame_timer.record(delta_seconds);
        let status = self.frame_timer.status_string();
        self.draw_black_backed_string(0, &status, colors::WHITE);
    }

    /// The frame time average maintained by [`LayerManager::update`].
    pub fn frame_timer(&self) -> &FrameTimer {
        &self.frame_timer
    }

    /// Loads a file into the hex view.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn load_hex_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.hex.load_file(path)
    }

    /// Loads bytes into the hex view.
    pub fn load_hex_bytes(&mut self, data: impl Into<Vec<u8>>) {
        self.hex.load_bytes(data);
    }

    /// Scrolls the hex view by `rows`.
    pub fn scroll_hex(&mut self, rows: isize) {
        self.hex.scroll(rows);
    }

    /// The hex view drawn by [`LayerManager::draw_hex_layer`].
    pub fn hex_view(&self) -> &HexView {
        &self.hex
    }

    /// Renders the hex view into the hex layers.
    pub fn draw_hex_layer(&mut self) {
        let roles = [LayerRole::HexBackground.index(), LayerRole::HexForeground.index()];
        if let Ok([background, foreground]) = self.layers.get_disjoint_mut(roles) {
            self.hex.draw(background, foreground);
        }
    }

    /// Renders `terminal` at its configured placement.
    ///
    /// The area from the base cell to `base + (width, height)` is filled with
    /// the palette background and cleared on the text and cursor layers. The
    /// input row at the base shows the prompt and the current line; history
    /// fills the rows above it, newest first. An active terminal shows an
    /// underscore cursor.
    pub fn draw_terminal(&mut self, terminal: &TerminalState) {
        let config = terminal.config();
        let palette = terminal.palette();

        let base = CellPos::new(config.base_x as i32, config.base_y as i32);
        let (width, height) = (config.width as i32, config.height as i32);
        let top = base.offset(width, height);

        self.layer_mut(LayerRole::Background).draw_rect_constant(
            base,
            top,
            Cell::new(palette.background(), codes::FILL_100),
        );
        let cleared = Cell::new(colors::BLACK, codes::FILL_0);
        self.layer_mut(LayerRole::Foreground)
            .draw_rect_constant(base, top, cleared);
        self.layer_mut(LayerRole::Cursor)
            .draw_rect_constant(base, top, cleared);

        let prompt = terminal.prompt();
        let input = ColoredLine::builder(palette)
            .text(prompt, TerminalPalette::HIGHLIGHT)
            .text_rgb(terminal.current_line(), colors::INPUT)
            .text_rgb(" ", colors::INPUT)
            .build();

        let foreground = self.layer_mut(LayerRole::Foreground);
        foreground.write_cell_line(base, base.offset(width, 1), input.cells());

        for (row, entry) in terminal
            .history()
            .recent()
            .take(config.height)
            .enumerate()
        {
            let min = base.offset(0, row as i32 + 1);
            let line = entry.render(palette);
            foreground.write_cell_line(min, min.offset(width, 1), line.cells());
        }

        if terminal.is_active() {
            let column = (prompt.chars().count() + terminal.cursor_x()) as i32;
            self.layer_mut(LayerRole::Cursor).write_char_at(
                base.offset(column, 0),
                Cell::new(palette.highlight(), b'_'),
            );
        }
    }

    /// Composites every layer into `target`.
    ///
    /// Binds the compositing program, the atlas and the target once, then
    /// lets each layer upload its cells if needed and dispatch.
    pub fn draw<R>(&mut self, raster: &mut R, target: T)
    where
        R: RasterService<Texture = T, Program = P>,
    {
        raster.use_program(self.program);
        raster.bind_image(ImageSlot::Atlas, self.atlas_texture, ImageAccess::ReadOnly);
        raster.bind_image(ImageSlot::Target, target, ImageAccess::ReadWrite);

        for layer in &mut self.layers {
            layer.draw(raster);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::TerminalConfig,
        gl::{RasterCall, RecordingRaster},
        progress::bar_color,
    };

    const PROGRAM: u32 = 99;
    const ATLAS: u32 = 1000;

    fn manager(width_px: u32, height_px: u32) -> (LayerManager<u32, u32>, RecordingRaster) {
        let mut raster = RecordingRaster::default();
        let manager =
            LayerManager::new(OverlayConfig::new(width_px, height_px), PROGRAM, ATLAS, &mut raster)
                .unwrap();
        raster.clear();
        (manager, raster)
    }

    fn row_text(layer: &Layer<u32>, y: i32) -> String {
        (0..layer.width() as i32)
            .filter_map(|x| layer.get_char_at(CellPos::new(x, y)))
            .map(|c| if c.glyph == 0 { ' ' } else { char::from(c.glyph) })
            .collect()
    }

    #[test]
    fn grid_is_derived_from_the_target() {
        let (manager, _) = manager(1920, 1080);
        assert_eq!(manager.bins(), (240, 67));
        for role in LayerRole::ALL {
            let layer = manager.layer(role);
            assert_eq!(layer.role(), role);
            assert_eq!((layer.width(), layer.height()), (240, 67));
        }
    }

    #[test]
    fn targets_below_one_cell_are_rejected() {
        let mut raster = RecordingRaster::default();
        let result = LayerManager::new(OverlayConfig::new(7, 100), PROGRAM, ATLAS, &mut raster);
        assert!(matches!(result, Err(Error::Allocation(_))));
    }

    #[test]
    fn draw_binds_once_then_composites_in_order() {
        let (mut manager, mut raster) = manager(80, 32);
        manager
            .layer_mut(LayerRole::Cursor)
            .write_char_at(CellPos::new(0, 0), Cell::new(colors::WHITE, b'_'));

        manager.draw(&mut raster, 7);

        assert_eq!(raster.calls[0], RasterCall::UseProgram(PROGRAM));
        assert_eq!(raster.calls[1], RasterCall::BindImage {
            slot: ImageSlot::Atlas,
            texture: ATLAS,
            access: ImageAccess::ReadOnly,
        });
        assert_eq!(raster.calls[2], RasterCall::BindImage {
            slot: ImageSlot::Target,
            texture: 7,
            access: ImageAccess::ReadWrite,
        });

        // only the written layer uploads; every layer dispatches the full grid
        assert_eq!(raster.uploads(), 1);
        assert_eq!(raster.dispatches(), vec![(10, 2); LayerRole::ALL.len()]);

        let bound: Vec<u32> = raster
            .calls
            .iter()
            .filter_map(|c| match c {
                RasterCall::BindImage { slot: ImageSlot::LayerData, texture, .. } => Some(*texture),
                _ => None,
            })
            .collect();
        let expected: Vec<u32> = LayerRole::ALL
            .iter()
            .map(|&role| manager.layer(role).texture())
            .collect();
        assert_eq!(bound, expected);
    }

    #[test]
    fn progress_bar_is_right_aligned_and_backed() {
        let (mut manager, _) = manager(40 * 8, 4 * 16);
        let mut bar = ProgressBar::new("io", 4).with_bar_width(4);
        bar.advance(2);

        manager.draw_progress_bar_string(2, &bar);

        // "io[" + 4 + "] " + " 50.0" + "%" = 15 cells
        let width = bar.display_width() as i32;
        assert_eq!(width, 15);
        let fg = manager.layer(LayerRole::Foreground);
        let start = 40 - width;
        assert_eq!(fg.get_char_at(CellPos::new(start, 2)).map(|c| c.glyph), Some(b'i'));
        assert_eq!(fg.get_char_at(CellPos::new(39, 2)).map(|c| c.glyph), Some(b'%'));
        assert_eq!(fg.get_char_at(CellPos::new(start - 1, 2)), Some(Cell::BLANK));

        let filled = fg.get_char_at(CellPos::new(start + 3, 2)).unwrap();
        assert_eq!(filled, Cell::new(bar_color(0.5), codes::FILL_100));
        let empty = fg.get_char_at(CellPos::new(start + 5, 2)).unwrap();
        assert_eq!(empty, Cell::new(colors::WHITE, codes::FILL_25));

        let bg = manager.layer(LayerRole::Background);
        let backed = (0..40)
            .filter(|&x| bg.get_char_at(CellPos::new(x, 2)).is_some_and(|c| !c.is_blank()))
            .count();
        assert_eq!(backed, width as usize);
    }

    #[test]
    fn no_bg_strings_leave_the_background_alone() {
        let (mut manager, _) = manager(20 * 8, 16);
        let line = ColoredLine::builder(TerminalPalette::default())
            .text("ok", TerminalPalette::TEXT)
            .build();

        manager.draw_no_bg_color_string(0, &line);
        manager.draw_black_backed_color_string(0, &line);

        assert!(row_text(manager.layer(LayerRole::Foreground), 0).ends_with("ok"));
        let bg = manager.layer(LayerRole::Background);
        assert!(bg.get_char_at(CellPos::new(18, 0)).is_some_and(|c| !c.is_blank()));
        assert!(bg.get_char_at(CellPos::new(17, 0)).is_some_and(|c| c.is_blank()));
    }

    #[test]
    fn update_draws_the_frame_time() {
        let (mut manager, _) = manager(40 * 8, 16);
        manager.update(0.002);

        let text = row_text(manager.layer(LayerRole::Foreground), 0);
        assert!(text.ends_with(" frame total:     2.0000ms"), "{text:?}");
        assert_eq!(manager.frame_timer().len(), 1);
    }

    #[test]
    fn terminal_rows_stack_upwards_from_the_input() {
        let (mut manager, _) = manager(60 * 8, 12 * 16);
        let config = TerminalConfig {
            base_x: 1,
            base_y: 1,
            width: 40,
            height: 3,
            greeting: None,
            ..Default::default()
        };
        let mut terminal = TerminalState::new(config);
        for line in ["one", "two", "three", "four"] {
            line.chars().for_each(|c| terminal.add_char(c));
            terminal.enter();
        }
        "ab".chars().for_each(|c| terminal.add_char(c));
        terminal.cursor_left(false);

        manager.draw_terminal(&terminal);

        let fg = manager.layer(LayerRole::Foreground);
        assert!(row_text(fg, 1).starts_with(" > ab "));
        assert!(row_text(fg, 2).contains("]: four "));
        assert!(row_text(fg, 3).contains("]: three "));
        assert!(row_text(fg, 4).contains("]: two "));
        // only `height` history rows are shown
        assert!(!row_text(fg, 5).contains("one"));

        let palette = terminal.palette();
        let prompt = fg.get_char_at(CellPos::new(1, 1)).unwrap();
        assert_eq!(prompt.color, palette.highlight());
        let typed = fg.get_char_at(CellPos::new(3, 1)).unwrap();
        assert_eq!(typed.color, colors::INPUT);

        let bg = manager.layer(LayerRole::Background);
        assert_eq!(bg.get_char_at(CellPos::new(41, 4)).map(|c| c.color), Some(palette.background()));
        assert_eq!(bg.get_char_at(CellPos::new(42, 4)), Some(Cell::BLANK));

        // prompt is two cells, cursor sits on the `b`
        let cursor = manager.layer(LayerRole::Cursor);
        assert_eq!(cursor.get_char_at(CellPos::new(4, 1)), Some(Cell::new(palette.highlight(), b'_')));
    }

    #[test]
    fn inactive_terminals_hide_the_cursor() {
        let (mut manager, _) = manager(60 * 8, 12 * 16);
        let mut terminal = TerminalState::default();
        terminal.set_active(false);

        manager.draw_terminal(&terminal);

        let cursor = manager.layer(LayerRole::Cursor);
        assert!(cursor.cells().iter().all(|c| c.glyph != b'_'));
    }

    #[test]
    fn hex_layers_receive_the_dump() {
        let (mut manager, _) = manager(200 * 8, 20 * 16);
        manager.load_hex_bytes(b"glyphterm".to_vec());
        manager.draw_hex_layer();

        let fg = manager.layer(LayerRole::HexForeground);
        assert!(row_text(fg, 14).contains("0x00000000"));
        assert!(row_text(fg, 14).contains("67 6c 79"));
        assert!(manager.layer(LayerRole::HexBackground).is_dirty());
        assert!(!manager.layer(LayerRole::Foreground).is_dirty());

        manager.scroll_hex(1);
        assert_eq!(manager.hex_view().offset(), 0);
    }

    #[test]
    fn resize_rebuilds_every_layer() {
        let (mut manager, _) = manager(80, 32);
        manager.resize(160, 64).unwrap();

        assert_eq!(manager.bins(), (20, 4));
        assert!(LayerRole::ALL.iter().all(|&r| manager.layer(r).width() == 20));
    }

    #[test]
    fn failed_resize_leaves_every_layer_untouched() {
        let (mut manager, _) = manager(80, 32);
        let cell = Cell::new(colors::GOLD, b'k');
        manager.layer_mut(LayerRole::Cursor).write_char_at(CellPos::new(9, 1), cell);

        assert!(manager.resize(0, 64).is_err());
        assert!(manager.resize(160, 15).is_err());

        assert_eq!(manager.bins(), (10, 2));
        assert_eq!(manager.config().width_px, 80);
        for &role in LayerRole::ALL.iter() {
            let layer = manager.layer(role);
            assert_eq!((layer.width(), layer.height()), (10, 2), "{role:?}");
        }
        assert_eq!(manager.layer(LayerRole::Cursor).get_char_at(CellPos::new(9, 1)), Some(cell));
    }
}
