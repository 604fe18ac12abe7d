//! GLSL shader sources and compilation helpers for the preview canvas.
//!
//! Shaders target GLSL 1.40 (OpenGL 3.1).

use glow::HasContext;

use crate::error::{Error, Result};

/// Vertex shader for tessellated paths.
///
/// Vertices arrive already transformed, in logical window pixels.
///
/// # Uniforms
///
/// | Name           | Type   | Description                       |
/// |----------------|--------|-----------------------------------|
/// | `u_resolution` | `vec2` | Logical window size in pixels     |
pub const PATH_VERTEX_SRC: &str = r"#version 140

in vec2 a_position;

uniform vec2 u_resolution;

void main() {
    // Convert from [0, resolution] to [-1, 1] (flip Y for GL)
    vec2 ndc = (a_position / u_resolution) * 2.0 - 1.0;
    ndc.y = -ndc.y;

    gl_Position = vec4(ndc, 0.0, 1.0);
}
";

/// Fragment shader for solid paint.
///
/// `u_color` is expected premultiplied by alpha.
pub const PATH_FRAGMENT_SRC: &str = r"#version 140

uniform vec4 u_color;

out vec4 frag_color;

void main() {
    frag_color = u_color;
}
";

/// Compile a shader program from vertex and fragment source strings.
///
/// The shader objects are detached and deleted after linking, so only the
/// program handle needs to be cleaned up by the caller.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns [`Error::Gl`] with the driver log if compilation or linking
/// fails.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program> {
    let program = unsafe { gl.create_program() }.map_err(Error::Gl)?;

    let vs = match unsafe { compile_shader(gl, glow::VERTEX_SHADER, vertex_src) } {
        Ok(vs) => vs,
        Err(e) => {
            unsafe { gl.delete_program(program) };
            return Err(e);
        }
    };
    let fs = match unsafe { compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) } {
        Ok(fs) => fs,
        Err(e) => {
            unsafe {
                gl.delete_program(program);
                gl.delete_shader(vs);
            }
            return Err(e);
        }
    };

    unsafe {
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.bind_attrib_location(program, 0, "a_position");
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(Error::Gl(format!("program link error: {log}")));
        }

        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
    }

    Ok(program)
}

/// Compile a single shader stage from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn compile_shader(gl: &glow::Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl.create_shader(shader_type).map_err(Error::Gl)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(Error::Gl(format!("shader compile error: {log}")));
        }

        Ok(shader)
    }
}
