use glow::HasContext;
use glyphterm_atlas::GlyphAtlas;

use crate::{
    error::Error,
    gl::{ComputeProgram, ImageAccess, ImageSlot, RasterService},
};

/// [`RasterService`] backed by an OpenGL 4.3+ context.
///
/// Layer and atlas textures are `RGBA8UI` 2D textures; each dispatch is
/// followed by an image access barrier so later layers observe the glyphs
/// written by earlier ones.
#[derive(Debug)]
pub struct GlRasterService<'gl> {
    gl: &'gl glow::Context,
}

impl<'gl> GlRasterService<'gl> {
    const GLYPH_COMPOSITE_GLSL: &'static str = include_str!("../shaders/glyph_composite.comp");

    /// Wraps a GL context owned by the host.
    pub fn new(gl: &'gl glow::Context) -> Self {
        Self { gl }
    }

    /// Compiles and links the glyph compositing compute shader.
    ///
    /// # Errors
    /// Returns [`Error::Shader`] with the driver's log if compilation or linking fails.
    pub fn compile_glyph_program(&self) -> Result<glow::Program, Error> {
        let program = ComputeProgram::create(self.gl, Self::GLYPH_COMPOSITE_GLSL)?;
        tracing::debug!("glyph compositing program linked");
        Ok(program.program)
    }

    /// Packs the atlas glyphs and uploads them into a fresh texture.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the texture cannot be created.
    pub fn upload_atlas(&mut self, atlas: &GlyphAtlas) -> Result<glow::Texture, Error> {
        let texture = atlas.texture();
        let handle = self.create_texture(texture.width, texture.height)?;
        self.upload_texture(handle, texture.width, texture.height, &texture.texels);

        tracing::debug!(
            width = texture.width,
            height = texture.height,
            glyphs = atlas.len(),
            "glyph atlas uploaded"
        );
        Ok(handle)
    }

    /// Releases a texture created by this service.
    pub fn delete_texture(&self, texture: glow::Texture) {
        unsafe { self.gl.delete_texture(texture) };
    }

    /// Releases a program created by [`GlRasterService::compile_glyph_program`].
    pub fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) };
    }
}

impl RasterService for GlRasterService<'_> {
    type Texture = glow::Texture;
    type Program = glow::Program;

    fn create_texture(&mut self, width: usize, height: usize) -> Result<glow::Texture, Error> {
        let gl = self.gl;
        let texture = unsafe { gl.create_texture() }.map_err(|e| Error::texture_creation_failed(&e))?;

        #[rustfmt::skip]
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0, // level
                glow::RGBA8UI as i32,
                width as i32, height as i32,
                0, // border
                glow::RGBA_INTEGER,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);
        };

        Ok(texture)
    }

    fn upload_texture(
        &mut self,
        texture: glow::Texture,
        width: usize,
        height: usize,
        texels: &[u8],
    ) {
        let gl = self.gl;
        tracing::trace!(width, height, bytes = texels.len(), "texture upload");

        #[rustfmt::skip]
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // full respecification; a resized layer keeps its handle
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0, // level
                glow::RGBA8UI as i32,
                width as i32, height as i32,
                0, // border
                glow::RGBA_INTEGER,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(texels)),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        };
    }

    fn bind_image(&mut self, slot: ImageSlot, texture: glow::Texture, access: ImageAccess) {
        let access = match access {
            ImageAccess::ReadOnly => glow::READ_ONLY,
            ImageAccess::WriteOnly => glow::WRITE_ONLY,
            ImageAccess::ReadWrite => glow::READ_WRITE,
        };

        unsafe {
            self.gl
                .bind_image_texture(slot.unit(), Some(texture), 0, false, 0, access, glow::RGBA8UI);
        }
    }

    fn use_program(&mut self, program: glow::Program) {
        unsafe { self.gl.use_program(Some(program)) };
    }

    fn dispatch_compute(&mut self, groups_x: u32, groups_y: u32) {
        unsafe {
            self.gl.dispatch_compute(groups_x, groups_y, 1);
            self.gl.memory_barrier(glow::SHADER_IMAGE_ACCESS_BARRIER_BIT);
        }
    }
}
