use glyphterm_atlas::AtlasError;

/// Error categories for the overlay renderer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A layer could not allocate its cell store or backing texture.
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// GPU resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// The glyph atlas could not be built.
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// Reading a hex dump source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    // Allocation errors
    pub(crate) fn empty_layer(width: usize, height: usize) -> Self {
        Self::Allocation(format!("Layer dimensions {width}x{height} cover no cells"))
    }

    pub(crate) fn layer_texture_failed(detail: &str) -> Self {
        Self::Allocation(format!("Failed to create layer texture: {detail}"))
    }

    // Shader errors
    pub(crate) fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub(crate) fn shader_program_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader program creation failed: {detail}"))
    }

    pub(crate) fn shader_compile_failed(log: String) -> Self {
        Self::Shader(format!("Shader compilation failed: {log}"))
    }

    pub(crate) fn shader_link_failed(log: String) -> Self {
        Self::Shader(format!("Shader linking failed: {log}"))
    }

    // Resource errors
    pub(crate) fn texture_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create texture: {detail}"))
    }
}
