//! An OpenGL [`Canvas`] for rendering the gauge outside the simulator.
//!
//! Paths are flattened on the CPU, tessellated via lyon on every fill or
//! stroke, and streamed to the GPU as indexed triangle meshes drawn with a
//! single solid-colour program.

use std::sync::Arc;

use glow::HasContext;
use lyon::math::{point, vector, Angle, Transform};

use crate::canvas::{Backend, Canvas, Winding};
use crate::error::{Error, Result};
use crate::path::{self, PathBuilder};
use crate::shaders;
use crate::types::{Color, FontId, HostContext, Mesh, Vertex};

/// Byte stride of [`Vertex`]; 8 bytes, well within `i32` range.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const VERTEX_STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

/// A font file registered with the canvas. Text is never drawn, so only the
/// bytes are kept.
struct LoadedFont {
    name: String,
    data: Vec<u8>,
}

/// A [`Canvas`] drawing into the currently-bound OpenGL framebuffer.
///
/// # Example
///
/// ```no_run
/// # use attitude_gauge::{Canvas, GlowCanvas};
/// # use std::sync::Arc;
/// # fn example(gl: Arc<glow::Context>) -> attitude_gauge::Result<()> {
/// // During setup (with a current GL context):
/// let mut canvas = unsafe { GlowCanvas::new(gl) }?;
///
/// // Each frame:
/// canvas.begin_frame(800.0, 600.0, 1.0);
/// canvas.begin_path();
/// canvas.rect(10.0, 10.0, 100.0, 50.0);
/// canvas.fill();
/// canvas.end_frame();
/// # Ok(())
/// # }
/// ```
pub struct GlowCanvas {
    /// The OpenGL context, shared via [`Arc`] with the embedding application.
    gl: Arc<glow::Context>,

    /// Compiled solid-colour path program.
    program: glow::Program,
    /// Logical window size uniform.
    u_resolution: glow::UniformLocation,
    /// Premultiplied paint colour uniform.
    u_color: glow::UniformLocation,

    /// Vertex array object with a single `vec2` position attribute.
    vao: glow::VertexArray,
    /// Vertex buffer for streaming mesh vertices.
    vbo: glow::Buffer,
    /// Element (index) buffer for streaming mesh indices.
    ebo: glow::Buffer,

    /// Current transform, applied to points as they are added.
    transform: Transform,
    /// Current path.
    path: PathBuilder,
    fill_color: Color,
    stroke_color: Color,
    stroke_width: f32,
    /// Logical size of the frame in progress.
    resolution: [f32; 2],

    fonts: Vec<LoadedFont>,
}

impl GlowCanvas {
    /// Create a canvas.
    ///
    /// Compiles the path program and creates the buffer objects.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid for as long as the canvas
    /// lives, and must be current whenever a [`Canvas`] method is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gl`] if shader compilation, program linking, or GL
    /// object creation fails, or if a uniform is missing from the program.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self> {
        let program = unsafe {
            shaders::compile_program(&gl, shaders::PATH_VERTEX_SRC, shaders::PATH_FRAGMENT_SRC)?
        };

        let uniform = |name: &str| {
            unsafe { gl.get_uniform_location(program, name) }
                .ok_or_else(|| Error::Gl(format!("{name} missing from path shader")))
        };
        let objects = uniform("u_resolution")
            .and_then(|u_resolution| Ok((u_resolution, uniform("u_color")?)))
            .and_then(|uniforms| Ok((uniforms, unsafe { create_mesh_objects(&gl) }?)));
        let ((u_resolution, u_color), (vao, vbo, ebo)) = match objects {
            Ok(objects) => objects,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        Ok(Self {
            gl,
            program,
            u_resolution,
            u_color,
            vao,
            vbo,
            ebo,
            transform: Transform::identity(),
            path: PathBuilder::new(),
            fill_color: Color::rgb(255, 255, 255),
            stroke_color: Color::rgb(0, 0, 0),
            stroke_width: 1.0,
            resolution: [1.0, 1.0],
            fonts: Vec::new(),
        })
    }

    /// Name and size in bytes of a font registered with
    /// [`create_font`](Canvas::create_font).
    #[must_use]
    pub fn font_info(&self, font: FontId) -> Option<(&str, usize)> {
        let index = usize::try_from(font.0).ok()?;
        self.fonts
            .get(index)
            .map(|f| (f.name.as_str(), f.data.len()))
    }

    /// Upload a mesh and draw it with the given colour.
    fn draw_mesh(&self, mesh: &Mesh, color: Color) {
        let gl = &self.gl;
        let [r, g, b, a] = color.premultiplied();

        // SAFETY: `new` requires the context to be current for every call.
        unsafe {
            gl.use_program(Some(self.program));
            gl.uniform_2_f32(
                Some(&self.u_resolution),
                self.resolution[0],
                self.resolution[1],
            );
            gl.uniform_4_f32(Some(&self.u_color), r, g, b, a);

            gl.bind_vertex_array(Some(self.vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.vertices),
                glow::STREAM_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.indices),
                glow::STREAM_DRAW,
            );

            match i32::try_from(mesh.indices.len()) {
                Ok(count) => gl.draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_INT, 0),
                Err(_) => tracing::warn!(indices = mesh.indices.len(), "mesh too large to draw"),
            }

            gl.bind_vertex_array(None);
        }
    }
}

/// Create the vertex array and the vertex and index buffers for streaming
/// meshes. Nothing is left allocated on failure.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn create_mesh_objects(
    gl: &glow::Context,
) -> Result<(glow::VertexArray, glow::Buffer, glow::Buffer)> {
    unsafe {
        let vao = gl.create_vertex_array().map_err(Error::Gl)?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(Error::Gl(e));
            }
        };
        let ebo = match gl.create_buffer() {
            Ok(ebo) => ebo,
            Err(e) => {
                gl.delete_buffer(vbo);
                gl.delete_vertex_array(vao);
                return Err(Error::Gl(e));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, VERTEX_STRIDE, 0);
        gl.bind_vertex_array(None);

        Ok((vao, vbo, ebo))
    }
}

impl Canvas for GlowCanvas {
    // Framebuffer sizes are far below f32's exact integer range.
    #[allow(clippy::cast_possible_truncation)]
    fn begin_frame(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.resolution = [width.max(1.0), height.max(1.0)];
        self.transform = Transform::identity();
        self.path.clear();

        let gl = &self.gl;
        // SAFETY: `new` requires the context to be current for every call.
        unsafe {
            gl.viewport(
                0,
                0,
                (width * pixel_ratio).round() as i32,
                (height * pixel_ratio).round() as i32,
            );
            gl.enable(glow::BLEND);
            gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn end_frame(&mut self) {
        self.path.clear();
        // SAFETY: `new` requires the context to be current for every call.
        unsafe {
            self.gl.disable(glow::BLEND);
            self.gl.use_program(None);
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform.pre_translate(vector(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.transform = self.transform.pre_rotate(Angle::radians(angle));
    }

    fn reset_transform(&mut self) {
        self.transform = Transform::identity();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(&self.transform, x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(&self.transform, x, y);
    }

    fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Winding) {
        self.path
            .arc(&self.transform, point(cx, cy), r, a0, a1, dir);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.path.rect(&self.transform, x, y, w, h);
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.path.circle(&self.transform, cx, cy, r);
    }

    fn fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    fn fill(&mut self) {
        if let Some(mesh) = path::tessellate_fill(&self.path.to_path()) {
            self.draw_mesh(&mesh, self.fill_color);
        }
    }

    fn stroke(&mut self) {
        if let Some(mesh) = path::tessellate_stroke(&self.path.to_path(), self.stroke_width) {
            self.draw_mesh(&mesh, self.stroke_color);
        }
    }

    fn create_font(&mut self, name: &str, path: &str) -> Result<FontId> {
        let data = std::fs::read(path).map_err(|source| Error::FontRead {
            path: path.to_owned(),
            source,
        })?;
        let id = i32::try_from(self.fonts.len()).map_err(|_| Error::FontLoad {
            name: name.to_owned(),
            path: path.to_owned(),
        })?;
        tracing::debug!(name, path, bytes = data.len(), "font loaded");
        self.fonts.push(LoadedFont {
            name: name.to_owned(),
            data,
        });
        Ok(FontId(id))
    }
}

impl Drop for GlowCanvas {
    fn drop(&mut self) {
        let gl = &self.gl;
        // SAFETY: `new` requires the context to outlive the canvas.
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ebo);
        }
    }
}

/// A [`Backend`] handing out [`GlowCanvas`] instances over one GL context.
///
/// The host context is ignored; the GL context stands in for it.
pub struct GlowBackend {
    gl: Arc<glow::Context>,
}

impl GlowBackend {
    /// Create a backend over `gl`.
    ///
    /// # Safety
    ///
    /// Same contract as [`GlowCanvas::new`], for every canvas the backend
    /// creates.
    #[must_use]
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }
}

impl Backend for GlowBackend {
    type Canvas = GlowCanvas;

    fn create_canvas(&mut self, _ctx: HostContext) -> Result<GlowCanvas> {
        // SAFETY: the contract was accepted in `GlowBackend::new`.
        unsafe { GlowCanvas::new(Arc::clone(&self.gl)) }
    }
}
