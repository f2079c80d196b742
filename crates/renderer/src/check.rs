//! Fatal GL error check.
//!
//! A pending GL error after a call means a broken contract rather than bad
//! input data, so this logs every pending code and then panics.

use crate::backend::GlBackend;

const MAX_PENDING_ERRORS: usize = 32;

/// Panic if the context has pending errors after `operation`.
pub fn check_gl_error<G: GlBackend + ?Sized>(gl: &G, operation: &str) {
    let mut failed = false;
    for _ in 0..MAX_PENDING_ERRORS {
        let code = gl.get_error();
        if code == glow::NO_ERROR {
            break;
        }
        log::error!(
            "after {}() glError ({}, 0x{:x})",
            operation,
            gl_error_name(code),
            code
        );
        failed = true;
    }
    if failed {
        panic!("GL error after {}()", operation);
    }
}

pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "unknown GL error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockGl;

    #[test]
    fn clean_context_passes() {
        let gl = MockGl::default();
        check_gl_error(&gl, "draw_elements");
    }

    #[test]
    #[should_panic(expected = "GL error after draw_elements()")]
    fn pending_error_is_fatal() {
        let gl = MockGl::default();
        gl.push_error(glow::INVALID_OPERATION);
        gl.push_error(glow::OUT_OF_MEMORY);
        check_gl_error(&gl, "draw_elements");
    }

    #[test]
    fn error_names() {
        assert_eq!(gl_error_name(glow::INVALID_VALUE), "GL_INVALID_VALUE");
        assert_eq!(gl_error_name(0xdead), "unknown GL error");
    }
}
