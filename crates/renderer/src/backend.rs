//! Narrow GL ES 2 surface used by the loaders, implemented for `glow::Context`.
//!
//! Object ids are plain non-zero GL names. Textures only ever appear as the
//! target of a texture the caller has bound; there is no way to create or
//! delete one through this trait.

use std::{fmt, num::NonZeroU32};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(pub NonZeroU32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub NonZeroU32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub NonZeroU32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Target of a texture object bound by the caller. Never owned here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureTarget(u32);

impl TextureTarget {
    pub const TEXTURE_2D: Self = Self(glow::TEXTURE_2D);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => glow::ARRAY_BUFFER,
            BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// GL calls the loaders make. All of them block on the current context.
pub trait GlBackend {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, String>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);

    /// Upload tightly packed RGBA8 rows into the texture bound at `target`.
    fn tex_image_2d_rgba8(&self, target: TextureTarget, width: i32, height: i32, pixels: &[u8]);
    fn tex_parameter_i32(&self, target: TextureTarget, parameter: u32, value: i32);
    fn generate_mipmap(&self, target: TextureTarget);

    fn create_buffer(&self) -> Result<BufferId, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>);
    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: BufferId);

    /// Pop one pending error code, `glow::NO_ERROR` when none is left.
    fn get_error(&self) -> u32;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glow::HasContext;

    use super::*;

    impl GlBackend for glow::Context {
        fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
            unsafe { HasContext::create_shader(self, stage.gl_enum()) }.map(|s| ShaderId(s.0))
        }

        fn shader_source(&self, shader: ShaderId, source: &str) {
            unsafe { HasContext::shader_source(self, glow::NativeShader(shader.0), source) }
        }

        fn compile_shader(&self, shader: ShaderId) {
            unsafe { HasContext::compile_shader(self, glow::NativeShader(shader.0)) }
        }

        fn shader_compile_status(&self, shader: ShaderId) -> bool {
            unsafe { HasContext::get_shader_compile_status(self, glow::NativeShader(shader.0)) }
        }

        fn shader_info_log(&self, shader: ShaderId) -> String {
            unsafe { HasContext::get_shader_info_log(self, glow::NativeShader(shader.0)) }
        }

        fn delete_shader(&self, shader: ShaderId) {
            unsafe { HasContext::delete_shader(self, glow::NativeShader(shader.0)) }
        }

        fn create_program(&self) -> Result<ProgramId, String> {
            unsafe { HasContext::create_program(self) }.map(|p| ProgramId(p.0))
        }

        fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
            unsafe {
                HasContext::attach_shader(
                    self,
                    glow::NativeProgram(program.0),
                    glow::NativeShader(shader.0),
                )
            }
        }

        fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
            unsafe {
                HasContext::detach_shader(
                    self,
                    glow::NativeProgram(program.0),
                    glow::NativeShader(shader.0),
                )
            }
        }

        fn link_program(&self, program: ProgramId) {
            unsafe { HasContext::link_program(self, glow::NativeProgram(program.0)) }
        }

        fn program_link_status(&self, program: ProgramId) -> bool {
            unsafe { HasContext::get_program_link_status(self, glow::NativeProgram(program.0)) }
        }

        fn program_info_log(&self, program: ProgramId) -> String {
            unsafe { HasContext::get_program_info_log(self, glow::NativeProgram(program.0)) }
        }

        fn delete_program(&self, program: ProgramId) {
            unsafe { HasContext::delete_program(self, glow::NativeProgram(program.0)) }
        }

        fn tex_image_2d_rgba8(
            &self,
            target: TextureTarget,
            width: i32,
            height: i32,
            pixels: &[u8],
        ) {
            let needed = (width.max(0) as usize)
                .checked_mul(height.max(0) as usize)
                .and_then(|n| n.checked_mul(4));
            assert_eq!(
                needed,
                Some(pixels.len()),
                "tex_image_2d_rgba8: {width}x{height} needs {needed:?} bytes, got {}",
                pixels.len()
            );
            unsafe {
                HasContext::pixel_store_i32(self, glow::UNPACK_ALIGNMENT, 4);
                HasContext::tex_image_2d(
                    self,
                    target.raw(),
                    0,
                    glow::RGBA as i32,
                    width,
                    height,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    Some(pixels),
                );
            }
        }

        fn tex_parameter_i32(&self, target: TextureTarget, parameter: u32, value: i32) {
            unsafe { HasContext::tex_parameter_i32(self, target.raw(), parameter, value) }
        }

        fn generate_mipmap(&self, target: TextureTarget) {
            unsafe { HasContext::generate_mipmap(self, target.raw()) }
        }

        fn create_buffer(&self) -> Result<BufferId, String> {
            unsafe { HasContext::create_buffer(self) }.map(|b| BufferId(b.0))
        }

        fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
            unsafe {
                HasContext::bind_buffer(
                    self,
                    target.gl_enum(),
                    buffer.map(|b| glow::NativeBuffer(b.0)),
                )
            }
        }

        fn buffer_data_static(&self, target: BufferTarget, data: &[u8]) {
            unsafe {
                HasContext::buffer_data_u8_slice(self, target.gl_enum(), data, glow::STATIC_DRAW)
            }
        }

        fn delete_buffer(&self, buffer: BufferId) {
            unsafe { HasContext::delete_buffer(self, glow::NativeBuffer(buffer.0)) }
        }

        fn get_error(&self) -> u32 {
            unsafe { HasContext::get_error(self) }
        }
    }
}
