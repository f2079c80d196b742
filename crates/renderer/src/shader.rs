//! Shader program creation from GLSL sources in the asset store.

use asset::{AssetStore, read_text};

use crate::{
    backend::{GlBackend, ProgramId, ShaderId, ShaderStage},
    error::{RendererError, RendererResult},
};

/// Linked GL program. Owned by the caller; nothing here deletes it after
/// returning it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(ProgramId);

impl ProgramHandle {
    pub fn id(self) -> ProgramId {
        self.0
    }

    /// GL program name.
    pub fn raw(self) -> u32 {
        self.0.0.get()
    }
}

/// Read both stages from `store`, compile and link them.
///
/// Sources are read before any GL object is created, so a missing asset
/// touches no GL state. Compiled shader objects are released on every path.
pub fn build_program<G, S>(
    gl: &G,
    store: &S,
    vertex_path: &str,
    fragment_path: &str,
) -> RendererResult<ProgramHandle>
where
    G: GlBackend + ?Sized,
    S: AssetStore + ?Sized,
{
    let vertex_source = read_text(store, vertex_path)?;
    let fragment_source = read_text(store, fragment_path)?;
    let program = link_program(gl, &vertex_source, &fragment_source)?;
    log::info!(
        "Built program {} from {} + {}",
        program.raw(),
        vertex_path,
        fragment_path
    );
    Ok(program)
}

/// Compile and link in-memory sources. The fragment stage is not compiled if
/// the vertex stage fails, and nothing is linked unless both compiled.
pub fn link_program<G: GlBackend + ?Sized>(
    gl: &G,
    vertex_source: &str,
    fragment_source: &str,
) -> RendererResult<ProgramHandle> {
    let vertex = CompiledShader::compile(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = CompiledShader::compile(gl, ShaderStage::Fragment, fragment_source)?;

    let program = gl
        .create_program()
        .map_err(|reason| RendererError::ObjectCreation {
            what: "program",
            reason,
        })?;
    gl.attach_shader(program, vertex.id);
    gl.attach_shader(program, fragment.id);
    gl.link_program(program);
    gl.detach_shader(program, vertex.id);
    gl.detach_shader(program, fragment.id);

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        log::error!("Could not link program:\n{}", log);
        gl.delete_program(program);
        return Err(RendererError::Link { log });
    }

    Ok(ProgramHandle(program))
}

/// Shader object deleted when dropped.
struct CompiledShader<'g, G: GlBackend + ?Sized> {
    gl: &'g G,
    id: ShaderId,
}

impl<'g, G: GlBackend + ?Sized> CompiledShader<'g, G> {
    fn compile(gl: &'g G, stage: ShaderStage, source: &str) -> RendererResult<Self> {
        let id = gl
            .create_shader(stage)
            .map_err(|reason| RendererError::ObjectCreation {
                what: "shader",
                reason,
            })?;
        let shader = Self { gl, id };

        gl.shader_source(id, source);
        gl.compile_shader(id);
        if !gl.shader_compile_status(id) {
            let log = gl.shader_info_log(id);
            log::error!("Could not compile {} shader:\n{}", stage, log);
            return Err(RendererError::Compile { stage, log });
        }
        Ok(shader)
    }
}

impl<G: GlBackend + ?Sized> Drop for CompiledShader<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}
