//! GL-side loaders: shader programs, texture upload and mesh buffers.
//! Every call here must run on the thread that owns the current GL context.

pub mod backend;
pub mod check;
pub mod error;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use backend::{BufferId, BufferTarget, GlBackend, ProgramId, ShaderId, ShaderStage, TextureTarget};
pub use check::check_gl_error;
pub use error::{RendererError, RendererResult};
pub use mesh::{GpuMesh, VertexLayout, upload_mesh};
pub use shader::{ProgramHandle, build_program, link_program};
pub use texture::{TextureOptions, load_texture, upload_image};
