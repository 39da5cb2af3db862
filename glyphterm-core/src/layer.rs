use glyphterm_data::{Cell, Rgb, codes};
use rand::Rng;

use crate::{
    error::Error,
    gl::{ImageAccess, ImageSlot, RasterService},
};

const TAB: u8 = b'\t';
const NEWLINE: u8 = b'\n';

/// A cell coordinate on a layer grid.
///
/// Row 0 is the bottom row of the render target. Coordinates may lie off
/// the grid; writes there are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPos {
    /// Column
    pub x: i32,
    /// Row, counted from the bottom
    pub y: i32,
}

impl CellPos {
    /// Creates a position from a column and a row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position moved by `(dx, dy)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for CellPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// The fixed set of layers owned by a [`crate::LayerManager`].
///
/// The discriminant is the composition order: later roles are drawn over
/// earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerRole {
    /// Opaque backing strips behind text
    Background,
    /// Text
    Foreground,
    /// The terminal cursor and other highlights
    Cursor,
    /// Backing of the hex dump view
    HexBackground,
    /// Text of the hex dump view
    HexForeground,
}

impl LayerRole {
    /// Every role, in composition order.
    pub const ALL: [LayerRole; 5] = [
        LayerRole::Background,
        LayerRole::Foreground,
        LayerRole::Cursor,
        LayerRole::HexBackground,
        LayerRole::HexForeground,
    ];

    /// Position of the role in the composition order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name, used in logs.
    pub const fn label(self) -> &'static str {
        match self {
            LayerRole::Background => "background",
            LayerRole::Foreground => "foreground",
            LayerRole::Cursor => "cursor",
            LayerRole::HexBackground => "hex background",
            LayerRole::HexForeground => "hex foreground",
        }
    }
}

struct FrameGlyphs {
    top_left: u8,
    top_right: u8,
    bottom_left: u8,
    bottom_right: u8,
    vertical: u8,
    horizontal: u8,
}

const DOUBLE_FRAME: FrameGlyphs = FrameGlyphs {
    top_left: codes::TOP_LEFT_DOUBLE_CORNER,
    top_right: codes::TOP_RIGHT_DOUBLE_CORNER,
    bottom_left: codes::BOTTOM_LEFT_DOUBLE_CORNER,
    bottom_right: codes::BOTTOM_RIGHT_DOUBLE_CORNER,
    vertical: codes::VERTICAL_DOUBLE,
    horizontal: codes::HORIZONTAL_DOUBLE,
};

const SINGLE_FRAME: FrameGlyphs = FrameGlyphs {
    top_left: codes::TOP_LEFT_SINGLE_CORNER,
    top_right: codes::TOP_RIGHT_SINGLE_CORNER,
    bottom_left: codes::BOTTOM_LEFT_SINGLE_CORNER,
    bottom_right: codes::BOTTOM_RIGHT_SINGLE_CORNER,
    vertical: codes::VERTICAL_SINGLE,
    horizontal: codes::HORIZONTAL_SINGLE,
};

/// A grid of cells with lazy GPU synchronization.
///
/// Every write marks the layer dirty; [`Layer::draw`] uploads the whole grid
/// to the layer's texture when dirty and then dispatches one compute work
/// group per cell. `T` is the texture handle type of the [`RasterService`]
/// the layer was created with.
#[derive(Debug)]
pub struct Layer<T> {
    role: LayerRole,
    width: usize,
    height: usize,
    /// Row-major, bottom row first
    cells: Vec<Cell>,
    texture: T,
    /// Indicates whether there are cells pending upload to the GPU.
    cells_pending_flush: bool,
}

impl<T: Copy> Layer<T> {
    /// Allocates a blank `width` x `height` layer and its backing texture.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the grid is empty, the cell store
    /// cannot be allocated, or the texture cannot be created.
    pub fn new<R>(width: usize, height: usize, role: LayerRole, raster: &mut R) -> Result<Self, Error>
    where
        R: RasterService<Texture = T>,
    {
        let cells = allocate_cells(width, height)?;
        let texture = raster
            .create_texture(width, height)
            .map_err(|e| Error::layer_texture_failed(&e.to_string()))?;

        tracing::debug!(layer = role.label(), width, height, "layer created");

        Ok(Self {
            role,
            width,
            height,
            cells,
            texture,
            cells_pending_flush: false,
        })
    }

    /// Discards the contents and reallocates a blank `width` x `height` grid.
    ///
    /// The texture handle is kept; the next [`Layer::draw`] uploads the new
    /// dimensions.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the new grid is empty or cannot be
    /// allocated; the layer is left unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        let cells = allocate_cells(width, height)?;
        self.replace_grid(width, height, cells);
        Ok(())
    }

    /// Installs a grid allocated by [`allocate_cells`].
    pub(crate) fn replace_grid(&mut self, width: usize, height: usize, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), width * height);
        self.cells = cells;
        self.width = width;
        self.height = height;
        self.cells_pending_flush = true;

        tracing::debug!(layer = self.role.label(), width, height, "layer resized");
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The role this layer was created for.
    pub fn role(&self) -> LayerRole {
        self.role
    }

    /// Handle of the backing texture.
    pub fn texture(&self) -> T {
        self.texture
    }

    /// True if cells changed since the last upload.
    pub fn is_dirty(&self) -> bool {
        self.cells_pending_flush
    }

    /// All cells, row-major from the bottom row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Grid size as exclusive coordinate bounds.
    fn extent(&self) -> (i32, i32) {
        let clamp = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        (clamp(self.width), clamp(self.height))
    }

    fn index_of(&self, pos: CellPos) -> Option<usize> {
        let x = usize::try_from(pos.x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(pos.y).ok().filter(|&y| y < self.height)?;
        Some(x + y * self.width)
    }

    /// Returns the cell at `pos`, or `None` off the grid.
    pub fn get_char_at(&self, pos: CellPos) -> Option<Cell> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// Writes a single cell; positions off the grid are ignored.
    pub fn write_char_at(&mut self, pos: CellPos, cell: Cell) {
        self.cells_pending_flush = true;
        if let Some(idx) = self.index_of(pos) {
            self.cells[idx] = cell;
        }
    }

    /// Writes `text` in `color` into the half-open rectangle `[min, max)`.
    ///
    /// Characters flow left to right from `min`, wrapping to the next row at
    /// `max.x`. A tab advances two columns and a newline starts the next row;
    /// neither writes. `'\0'` advances one column without writing. Writing
    /// stops silently once the cursor reaches row `max.y`. Characters above
    /// U+00FF are written as `?`.
    pub fn write_string(&mut self, min: CellPos, max: CellPos, text: &str, color: Rgb) {
        let cells = text.chars().map(|c| Cell::new(color, glyph_code(c)));
        self.write_cells(min, max, cells);
    }

    /// Writes pre-colored cells with the traversal rules of [`Layer::write_string`].
    pub fn write_cell_line(&mut self, min: CellPos, max: CellPos, cells: &[Cell]) {
        self.write_cells(min, max, cells.iter().copied());
    }

    fn write_cells(&mut self, min: CellPos, max: CellPos, cells: impl IntoIterator<Item = Cell>) {
        self.cells_pending_flush = true;
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let mut cursor = min;
        for cell in cells {
            match cell.glyph {
                TAB => cursor = cursor.offset(2, 0),
                NEWLINE => {
                    cursor = CellPos::new(min.x, cursor.y.saturating_add(1));
                    if cursor.y >= max.y {
                        break;
                    }
                },
                0 => cursor = cursor.offset(1, 0),
                _ => {
                    self.write_char_at(cursor, cell);
                    cursor = cursor.offset(1, 0);
                },
            }

            if cursor.x >= max.x {
                cursor = CellPos::new(min.x, cursor.y.saturating_add(1));
                if cursor.y >= max.y {
                    break;
                }
            }
        }
    }

    /// Draws a double-line box whose corners are `min` and `max` (inclusive).
    pub fn draw_double_frame(&mut self, min: CellPos, max: CellPos, color: Rgb) {
        self.draw_frame(min, max, color, &DOUBLE_FRAME);
    }

    /// Draws a single-line box whose corners are `min` and `max` (inclusive).
    pub fn draw_single_frame(&mut self, min: CellPos, max: CellPos, color: Rgb) {
        self.draw_frame(min, max, color, &SINGLE_FRAME);
    }

    fn draw_frame(&mut self, min: CellPos, max: CellPos, color: Rgb, glyphs: &FrameGlyphs) {
        self.cells_pending_flush = true;
        let cell = |glyph| Cell::new(color, glyph);

        // rows count upwards, so the top edge is max.y
        self.write_char_at(CellPos::new(min.x, max.y), cell(glyphs.top_left));
        self.write_char_at(max, cell(glyphs.top_right));
        self.write_char_at(min, cell(glyphs.bottom_left));
        self.write_char_at(CellPos::new(max.x, min.y), cell(glyphs.bottom_right));

        let (cols, rows) = self.extent();
        for x in min.x.saturating_add(1).max(0)..max.x.min(cols) {
            self.write_char_at(CellPos::new(x, min.y), cell(glyphs.horizontal));
            self.write_char_at(CellPos::new(x, max.y), cell(glyphs.horizontal));
        }
        for y in min.y.saturating_add(1).max(0)..max.y.min(rows) {
            self.write_char_at(CellPos::new(min.x, y), cell(glyphs.vertical));
            self.write_char_at(CellPos::new(max.x, y), cell(glyphs.vertical));
        }
    }

    /// Draws a vertical scroll ornament of `length + 1` cells rising from `start`.
    pub fn draw_curly_scroll(&mut self, start: CellPos, length: u32, color: Rgb) {
        self.cells_pending_flush = true;
        let top = start.offset(0, i32::try_from(length).unwrap_or(i32::MAX));

        self.write_char_at(start, Cell::new(color, codes::CURLY_SCROLL_BOTTOM));
        for y in start.y.saturating_add(1).max(0)..top.y.min(self.extent().1) {
            self.write_char_at(CellPos::new(start.x, y), Cell::new(color, codes::CURLY_SCROLL_MIDDLE));
        }
        self.write_char_at(top, Cell::new(color, codes::CURLY_SCROLL_TOP));
    }

    /// Fills the inclusive rectangle `[min, max]` with `cell`.
    pub fn draw_rect_constant(&mut self, min: CellPos, max: CellPos, cell: Cell) {
        self.fill_rect(min, max, |_| cell);
    }

    /// Fills the inclusive rectangle `[min, max]` with fill-density glyphs
    /// drawn uniformly from [`codes::FILLS`].
    pub fn draw_rect_random(&mut self, min: CellPos, max: CellPos, color: Rgb, rng: &mut impl Rng) {
        self.fill_rect(min, max, |_| {
            Cell::new(color, codes::FILLS[rng.gen_range(0..codes::FILLS.len())])
        });
    }

    fn fill_rect(&mut self, min: CellPos, max: CellPos, mut cell_at: impl FnMut(CellPos) -> Cell) {
        self.cells_pending_flush = true;

        // clip to the grid before iterating
        let (cols, rows) = self.extent();
        let (x0, y0) = (min.x.max(0), min.y.max(0));
        let x1 = max.x.min(cols - 1);
        let y1 = max.y.min(rows - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pos = CellPos::new(x, y);
                let cell = cell_at(pos);
                self.write_char_at(pos, cell);
            }
        }
    }

    /// Scatters `count` cells with random glyphs and colors over the grid.
    pub fn draw_random_chars(&mut self, count: usize, rng: &mut impl Rng) {
        self.cells_pending_flush = true;
        for _ in 0..count {
            let pos = CellPos::new(
                rng.gen_range(0..self.width) as i32,
                rng.gen_range(0..self.height) as i32,
            );
            let color = Rgb::new(rng.r#gen(), rng.r#gen(), rng.r#gen());
            self.write_char_at(pos, Cell::new(color, rng.r#gen()));
        }
    }

    /// Resets every cell to [`Cell::BLANK`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.cells_pending_flush = true;
    }

    /// Uploads the grid if dirty, then composites it into the bound target.
    ///
    /// The caller binds the atlas, the target and the compositing program;
    /// the layer binds its own cell texture and dispatches one work group per
    /// cell.
    pub fn draw<R>(&mut self, raster: &mut R)
    where
        R: RasterService<Texture = T>,
    {
        if self.cells_pending_flush {
            raster.upload_texture(self.texture, self.width, self.height, &self.texels());
            self.cells_pending_flush = false;
        }

        raster.bind_image(ImageSlot::LayerData, self.texture, ImageAccess::ReadOnly);
        raster.dispatch_compute(self.width as u32, self.height as u32);
    }

    fn texels(&self) -> Vec<u8> {
        self.cells.iter().flat_map(|cell| cell.to_texel()).collect()
    }
}

pub(crate) fn allocate_cells(width: usize, height: usize) -> Result<Vec<Cell>, Error> {
    let count = width
        .checked_mul(height)
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::empty_layer(width, height))?;

    let mut cells = Vec::new();
    cells
        .try_reserve_exact(count)
        .map_err(|e| Error::Allocation(format!("{width}x{height} cell store: {e}")))?;
    cells.resize(count, Cell::BLANK);

    Ok(cells)
}

/// Code-page glyph for `c`; characters above U+00FF become `?`.
pub(crate) fn glyph_code(c: char) -> u8 {
    u8::try_from(u32::from(c)).unwrap_or(b'?')
}
