use asset::AssetError;
use thiserror::Error;

use crate::backend::ShaderStage;

/// Recoverable failures of the GL-side loaders.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
    #[error("failed to create {what}: {reason}")]
    ObjectCreation { what: &'static str, reason: String },
    #[error("texture {width}x{height} exceeds GL size limits")]
    TextureTooLarge { width: u32, height: u32 },
    #[error("{width}x{height} RGBA8 image has {len} bytes of pixel data")]
    InvalidImage { width: u32, height: u32, len: usize },
    #[error("mesh arrays are inconsistent: {reason}")]
    InvalidMesh { reason: &'static str },
}

pub type RendererResult<T> = Result<T, RendererError>;
