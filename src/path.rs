//! NanoVG-style path construction over lyon, and tessellation into meshes.
//!
//! Points are transformed as they are added, so a path keeps the transform
//! that was current when each point was added, as in NanoVG.

use std::f32::consts::TAU;

use lyon::math::{point, Point, Transform};
use lyon::path::Path as LyonPath;
use lyon::tessellation::*;

use crate::canvas::Winding;
use crate::types::{Mesh, Vertex};

/// Flattening tolerance, in pixels.
const TOLERANCE: f32 = 0.01;

/// Maximum angle covered by one arc segment.
const ARC_SEGMENT_ANGLE: f32 = TAU / 64.0;

/// A polyline sub-path in window space.
#[derive(Clone, Debug, Default)]
struct SubPath {
    points: Vec<Point>,
    closed: bool,
}

/// Accumulates sub-paths in window space.
///
/// The same path can be filled and stroked; each call builds a fresh lyon
/// path from the recorded points.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    subpaths: Vec<SubPath>,
    /// Whether the last sub-path still accepts points.
    open: bool,
}

impl PathBuilder {
    /// An empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no sub-path has been started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Drop every sub-path.
    pub fn clear(&mut self) {
        self.subpaths.clear();
        self.open = false;
    }

    /// Start a new sub-path at `(x, y)`.
    pub fn move_to(&mut self, transform: &Transform, x: f32, y: f32) {
        self.subpaths.push(SubPath {
            points: vec![transform.transform_point(point(x, y))],
            closed: false,
        });
        self.open = true;
    }

    /// Add a segment to `(x, y)`, starting a sub-path if none is open.
    /// Points that coincide with the previous one are dropped.
    pub fn line_to(&mut self, transform: &Transform, x: f32, y: f32) {
        if !self.open {
            self.move_to(transform, x, y);
            return;
        }
        let to = transform.transform_point(point(x, y));
        if let Some(current) = self.subpaths.last_mut() {
            let duplicate = current
                .points
                .last()
                .is_some_and(|last| (to - *last).square_length() < TOLERANCE * TOLERANCE);
            if !duplicate {
                current.points.push(to);
            }
        }
    }

    /// Close the current sub-path.
    pub fn close(&mut self) {
        if self.open {
            if let Some(current) = self.subpaths.last_mut() {
                current.closed = true;
            }
            self.open = false;
        }
    }

    /// Add a circular arc. Connects to the arc start with a line when a
    /// sub-path is open, otherwise starts a new sub-path there.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        transform: &Transform,
        center: Point,
        radius: f32,
        a0: f32,
        a1: f32,
        dir: Winding,
    ) {
        let mut points = arc_points(center, radius, a0, a1, dir).into_iter();
        let Some(start) = points.next() else {
            return;
        };
        if self.open {
            self.line_to(transform, start.x, start.y);
        } else {
            self.move_to(transform, start.x, start.y);
        }
        for p in points {
            self.line_to(transform, p.x, p.y);
        }
    }

    /// Add a closed rectangle.
    pub fn rect(&mut self, transform: &Transform, x: f32, y: f32, w: f32, h: f32) {
        self.move_to(transform, x, y);
        self.line_to(transform, x, y + h);
        self.line_to(transform, x + w, y + h);
        self.line_to(transform, x + w, y);
        self.close();
    }

    /// Add a closed circle.
    pub fn circle(&mut self, transform: &Transform, cx: f32, cy: f32, r: f32) {
        let mut points = arc_points(point(cx, cy), r, 0.0, TAU, Winding::Clockwise).into_iter();
        if let Some(start) = points.next() {
            self.move_to(transform, start.x, start.y);
            for p in points {
                self.line_to(transform, p.x, p.y);
            }
            self.close();
        }
    }

    /// Build a lyon path from the recorded sub-paths.
    ///
    /// Sub-paths with a non-finite point are skipped.
    #[must_use]
    pub fn to_path(&self) -> LyonPath {
        let mut builder = LyonPath::builder();
        for subpath in &self.subpaths {
            if !subpath.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
                tracing::trace!("skipping sub-path with non-finite points");
                continue;
            }
            if let Some((first, rest)) = subpath.points.split_first() {
                builder.begin(*first);
                for p in rest {
                    builder.line_to(*p);
                }
                builder.end(subpath.closed);
            }
        }
        builder.build()
    }
}

/// Points along an arc from `a0` to `a1`, both ends included.
///
/// Follows NanoVG's sweep rules: clockwise sweeps are made positive and
/// counter-clockwise sweeps negative by adding or subtracting a full turn,
/// and any sweep is clamped to one full turn.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn arc_points(center: Point, radius: f32, a0: f32, a1: f32, dir: Winding) -> Vec<Point> {
    let mut sweep = a1 - a0;
    match dir {
        Winding::Clockwise => {
            if sweep.abs() >= TAU {
                sweep = TAU;
            } else {
                while sweep < 0.0 {
                    sweep += TAU;
                }
            }
        }
        Winding::CounterClockwise => {
            if sweep.abs() >= TAU {
                sweep = -TAU;
            } else {
                while sweep > 0.0 {
                    sweep -= TAU;
                }
            }
        }
    }

    let segments = ((sweep.abs() / ARC_SEGMENT_ANGLE).ceil() as usize).max(1);
    (0..=segments)
        .map(|i| {
            let angle = a0 + sweep * (i as f32 / segments as f32);
            point(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Tessellate a path interior into an indexed triangle mesh.
///
/// Returns `None` when the path covers no area.
#[must_use]
pub fn tessellate_fill(path: &LyonPath) -> Option<Mesh> {
    let mut geometry: VertexBuffers<Vertex, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();

    let result = tessellator.tessellate_path(
        path,
        &FillOptions::tolerance(TOLERANCE).with_fill_rule(FillRule::NonZero),
        &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| Vertex {
            position: vertex.position().to_array(),
        }),
    );

    into_mesh(result, geometry)
}

/// Tessellate a path outline of the given width into an indexed triangle
/// mesh.
#[must_use]
pub fn tessellate_stroke(path: &LyonPath, line_width: f32) -> Option<Mesh> {
    let mut geometry: VertexBuffers<Vertex, u32> = VertexBuffers::new();
    let mut tessellator = StrokeTessellator::new();

    let result = tessellator.tessellate_path(
        path,
        &StrokeOptions::tolerance(TOLERANCE).with_line_width(line_width),
        &mut BuffersBuilder::new(&mut geometry, |vertex: StrokeVertex| Vertex {
            position: vertex.position().to_array(),
        }),
    );

    into_mesh(result, geometry)
}

fn into_mesh(result: TessellationResult, geometry: VertexBuffers<Vertex, u32>) -> Option<Mesh> {
    match result {
        Ok(()) if !geometry.indices.is_empty() => Some(Mesh {
            vertices: geometry.vertices,
            indices: geometry.indices,
        }),
        Ok(()) => None,
        Err(e) => {
            tracing::debug!("tessellation failed: {e:?}");
            None
        }
    }
}
