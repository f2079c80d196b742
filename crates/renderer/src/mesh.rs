//! Upload of parsed meshes into GL vertex/index buffers.

use asset::Mesh;

use crate::{
    backend::{BufferId, BufferTarget, GlBackend},
    check::check_gl_error,
    error::{RendererError, RendererResult},
};

/// Interleaved vertex layout, in floats: position, then normal and uv when
/// the mesh has them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub normal_offset: Option<usize>,
    pub uv_offset: Option<usize>,
}

impl VertexLayout {
    pub fn for_mesh(mesh: &Mesh) -> Self {
        let mut stride = 3;
        let normal_offset = mesh.has_normals().then(|| {
            stride += 3;
            3
        });
        let uv_offset = mesh.has_uvs().then(|| {
            let offset = stride;
            stride += 2;
            offset
        });
        Self {
            stride,
            normal_offset,
            uv_offset,
        }
    }

    #[inline]
    pub fn stride_bytes(&self) -> i32 {
        (self.stride * std::mem::size_of::<f32>()) as i32
    }
}

/// Interleave the parallel arrays of `mesh` according to `layout`.
/// `mesh` must pass [`Mesh::check`].
fn interleave(mesh: &Mesh, layout: &VertexLayout) -> Vec<f32> {
    let count = mesh.vertex_count();
    let mut out = Vec::with_capacity(count * layout.stride);
    for i in 0..count {
        out.extend_from_slice(&mesh.positions[i * 3..i * 3 + 3]);
        if layout.normal_offset.is_some() {
            out.extend_from_slice(&mesh.normals[i * 3..i * 3 + 3]);
        }
        if layout.uv_offset.is_some() {
            out.extend_from_slice(&mesh.uvs[i * 2..i * 2 + 2]);
        }
    }
    out
}

/// Vertex and index buffers of an uploaded mesh. Owned by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GpuMesh {
    pub vertex_buffer: BufferId,
    pub index_buffer: BufferId,
    pub index_count: u32,
    pub layout: VertexLayout,
}

impl GpuMesh {
    pub fn delete<G: GlBackend + ?Sized>(self, gl: &G) {
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_buffer(self.index_buffer);
    }
}

/// Upload `mesh` as one interleaved array buffer plus a `u32` element buffer.
///
/// Meshes breaking the [`Mesh`] invariants are rejected before any GL call.
pub fn upload_mesh<G: GlBackend + ?Sized>(gl: &G, mesh: &Mesh) -> RendererResult<GpuMesh> {
    mesh.check().map_err(|reason| RendererError::InvalidMesh { reason })?;
    let layout = VertexLayout::for_mesh(mesh);
    let vertices = interleave(mesh, &layout);

    let vertex_buffer = create_buffer(gl, BufferTarget::Array, bytemuck::cast_slice(&vertices))?;
    let index_buffer = match create_buffer(
        gl,
        BufferTarget::ElementArray,
        bytemuck::cast_slice(&mesh.indices),
    ) {
        Ok(buffer) => buffer,
        Err(e) => {
            gl.delete_buffer(vertex_buffer);
            return Err(e);
        }
    };
    check_gl_error(gl, "buffer_data");

    log::debug!(
        "Uploaded mesh: {} vertices (stride {}), {} indices",
        mesh.vertex_count(),
        layout.stride,
        mesh.indices.len()
    );
    Ok(GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
        layout,
    })
}

fn create_buffer<G: GlBackend + ?Sized>(
    gl: &G,
    target: BufferTarget,
    bytes: &[u8],
) -> RendererResult<BufferId> {
    let buffer = gl
        .create_buffer()
        .map_err(|reason| RendererError::ObjectCreation {
            what: "buffer",
            reason,
        })?;
    gl.bind_buffer(target, Some(buffer));
    gl.buffer_data_static(target, bytes);
    gl.bind_buffer(target, None);
    Ok(buffer)
}
