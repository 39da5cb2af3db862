mod glow_raster;
mod program;
mod raster;

pub use glow_raster::GlRasterService;
pub(crate) use program::*;
pub use raster::{ImageAccess, ImageSlot, RasterService};

#[cfg(test)]
pub(crate) use raster::recording::{RasterCall, RecordingRaster};
