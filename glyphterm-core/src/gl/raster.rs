use std::fmt::Debug;

use crate::error::Error;

/// Image units used by the glyph compositing compute shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    /// The packed glyph atlas, read-only.
    Atlas = 0,
    /// The cell texture of the layer being composited.
    LayerData = 1,
    /// The render target the glyphs are written into.
    Target = 2,
}

impl ImageSlot {
    /// Image unit index of the slot.
    pub fn unit(self) -> u32 {
        self as u32
    }
}

/// How a compute pass accesses a bound image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAccess {
    /// Sampled only
    ReadOnly,
    /// Written only
    WriteOnly,
    /// Sampled and written
    ReadWrite,
}

/// The GPU operations the overlay needs from its host.
///
/// The overlay never owns a GL context; the host hands an implementation
/// to every drawing call. Dispatches are fire-and-forget: synchronizing
/// the compute pass with later consumers of the target is the host's job.
pub trait RasterService {
    /// Opaque texture handle
    type Texture: Copy + Debug;
    /// Opaque compute program handle
    type Program: Copy + Debug;

    /// Allocates an RGBA8UI texture of `width` x `height` texels.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the texture cannot be created.
    fn create_texture(&mut self, width: usize, height: usize) -> Result<Self::Texture, Error>;

    /// Replaces the full contents of `texture` with tightly packed RGBA texels.
    fn upload_texture(&mut self, texture: Self::Texture, width: usize, height: usize, texels: &[u8]);

    /// Binds `texture` to an image unit for the next dispatch.
    fn bind_image(&mut self, slot: ImageSlot, texture: Self::Texture, access: ImageAccess);

    /// Makes `program` the active compute program.
    fn use_program(&mut self, program: Self::Program);

    /// Dispatches `groups_x` x `groups_y` work groups.
    fn dispatch_compute(&mut self, groups_x: u32, groups_y: u32);
}
