//! Layered bitmap-glyph text overlay.
//!
//! A [`LayerManager`] owns a stack of [`Layer`]s, grids of colored 8-bit
//! glyph cells covering the render target in 8x16 pixel cells. Drawing
//! operations mutate cells on the CPU; [`LayerManager::draw`] uploads the
//! layers that changed and composites every layer into a target texture
//! with one compute dispatch per layer.
//!
//! GPU access goes through the [`RasterService`] trait, implemented for
//! OpenGL 4.3 by [`GlRasterService`]. The [`terminal`] module provides the
//! line-editing model drawn by [`LayerManager::draw_terminal`].

pub mod error;
pub mod gl;
pub mod terminal;

mod config;
mod frame_timer;
mod hex_view;
mod layer;
mod layer_manager;
mod progress;

pub use config::{CELL_HEIGHT_PX, CELL_WIDTH_PX, HexViewConfig, OverlayConfig, TerminalConfig};
pub use error::Error;
pub use frame_timer::FrameTimer;
pub use gl::{GlRasterService, ImageAccess, ImageSlot, RasterService};
pub use glyphterm_atlas::{AtlasError, GlyphAtlas};
pub use glyphterm_data::{Cell, Rgb, TerminalPalette, codes, colors};
pub use hex_view::HexView;
pub use layer::{CellPos, Layer, LayerRole};
pub use layer_manager::LayerManager;
pub use progress::{ProgressBar, bar_color};
pub use terminal::{TerminalInput, TerminalState};
