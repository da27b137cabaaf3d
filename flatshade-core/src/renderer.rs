//! Visibility, ordering and flat shading of a render object.
//!
//! A pass is: [`ModelRenderer::initialize`], then
//! [`filter_visible_faces`](ModelRenderer::filter_visible_faces) and
//! [`sort_visible_faces`](ModelRenderer::sort_visible_faces), then either
//! [`draw`](ModelRenderer::draw) or repeated calls to
//! [`draw_iteratively`](ModelRenderer::draw_iteratively) until it returns `true`.
//!
//! The camera sits at the world origin; the projection maps it there, so the
//! direction from the camera to a face centroid is simply the centroid's
//! world position.

use std::time::{Duration, Instant};

use crate::color::Color;
use crate::math::{normalize_or_forward, rotate, Vector3};
use crate::projection::Matrix44;
use crate::transform::RenderObject;

/// Faces drawn between two clock checks in [`ModelRenderer::draw_iteratively`].
pub const FACES_PER_BATCH: usize = 100;

/// Monotonic time source for time-sliced drawing
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

impl<F: Fn() -> Duration> Clock for F {
    fn now(&self) -> Duration {
        self()
    }
}

/// [`Clock`] backed by [`std::time::Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Per-pass data for a face that survived culling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleFace {
    /// Index into the mesh's face list.
    pub face_index: usize,
    pub world_normal: Vector3,
    /// Squared distance from the camera to the world-space centroid.
    pub distance_to_camera: f64,
}

/// Position of an incremental draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCursor {
    next: usize,
    total: usize,
}

impl DrawCursor {
    fn start(total: usize) -> Self {
        Self { next: 0, total }
    }

    /// Index of the next face to draw.
    pub fn next(&self) -> usize {
        self.next
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.total
    }
}

/// Everything `initialize` binds for one pass.
#[derive(Debug, Clone)]
struct Binding {
    object: RenderObject,
    projection: Matrix44,
    model_color: Color,
    light_direction: Vector3,
    light_color: Color,
}

/// Culls, orders and shades the faces of a [`RenderObject`]
#[derive(Debug)]
pub struct ModelRenderer {
    binding: Option<Binding>,
    visible: Vec<VisibleFace>,
    cursor: Option<DrawCursor>,
    batch_size: usize,
    ndc: Vec<Vector3>,
}

impl ModelRenderer {
    pub fn new() -> Self {
        Self {
            binding: None,
            visible: Vec::new(),
            cursor: None,
            batch_size: FACES_PER_BATCH,
            ndc: Vec::with_capacity(4),
        }
    }

    /// Faces drawn between clock checks (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Binds a pose, camera and lighting, discarding any pass in progress.
    ///
    /// `light_direction` is normalized here. The visible list is cleared, so
    /// the filter and sort steps must run again before drawing.
    pub fn initialize(
        &mut self,
        render_object: &RenderObject,
        projection: Matrix44,
        model_color: Color,
        light_direction: Vector3,
        light_color: Color,
    ) -> &mut Self {
        self.binding = Some(Binding {
            object: render_object.clone(),
            projection,
            model_color,
            light_direction: normalize_or_forward(light_direction),
            light_color,
        });
        self.visible.clear();
        self.cursor = None;
        self
    }

    /// Keeps the faces whose world normal points towards the camera.
    pub fn filter_visible_faces(&mut self) -> &mut Self {
        let Some(binding) = self.binding.as_ref() else {
            log::warn!("filter_visible_faces called before initialize");
            return self;
        };

        let object = &binding.object;
        let rotation = object.rotation();

        self.visible.clear();
        self.visible.extend(object.mesh.faces.iter().enumerate().filter_map(|(i, face)| {
            let world_normal = rotate(face.normal, rotation);
            let look_direction = normalize_or_forward(object.to_world(face.centroid));

            (world_normal.dot(&look_direction) < 0.0).then_some(VisibleFace {
                face_index: i,
                world_normal,
                distance_to_camera: 0.0,
            })
        }));
        self.cursor = None;

        log::debug!(
            "{} of {} faces facing the camera",
            self.visible.len(),
            object.mesh.face_count()
        );
        self
    }

    /// Orders visible faces farthest first by squared centroid distance.
    pub fn sort_visible_faces(&mut self) -> &mut Self {
        let Some(binding) = self.binding.as_ref() else {
            log::warn!("sort_visible_faces called before initialize");
            return self;
        };

        let object = &binding.object;
        for visible in &mut self.visible {
            let centroid = object.mesh.faces[visible.face_index].centroid;
            visible.distance_to_camera = object.to_world(centroid).norm_squared();
        }

        self.visible
            .sort_by(|a, b| b.distance_to_camera.total_cmp(&a.distance_to_camera));
        self.cursor = None;
        self
    }

    pub fn visible_faces(&self) -> &[VisibleFace] {
        &self.visible
    }

    pub fn cursor(&self) -> Option<DrawCursor> {
        self.cursor
    }

    /// Faces processed by the current incremental draw, and the total.
    pub fn progress(&self) -> (usize, usize) {
        match self.cursor {
            Some(cursor) => (cursor.next.min(cursor.total), cursor.total),
            None => (0, self.visible.len()),
        }
    }

    /// Draws every visible face in one go.
    ///
    /// `draw_fn` receives the shaded color and the face's vertices in
    /// normalized device coordinates.
    pub fn draw<F>(&mut self, mut draw_fn: F)
    where
        F: FnMut(Color, &[Vector3]),
    {
        if self.binding.is_none() {
            log::warn!("draw called before initialize");
            return;
        }
        let total = self.visible.len();
        self.draw_range(0, total, &mut draw_fn);
    }

    /// Resumable draw bounded by wall-clock time.
    ///
    /// Returns `true` once every visible face has been processed.
    pub fn draw_iteratively<F>(&mut self, draw_fn: F, max_time: Duration) -> bool
    where
        F: FnMut(Color, &[Vector3]),
    {
        self.draw_iteratively_with_clock(draw_fn, max_time, &MonotonicClock::new())
    }

    /// [`draw_iteratively`](Self::draw_iteratively) with an explicit time source.
    ///
    /// At least one batch is drawn per call, so the pass always advances.
    pub fn draw_iteratively_with_clock<F, C>(&mut self, mut draw_fn: F, max_time: Duration, clock: &C) -> bool
    where
        F: FnMut(Color, &[Vector3]),
        C: Clock + ?Sized,
    {
        if self.binding.is_none() {
            log::warn!("draw_iteratively called before initialize");
        }
        let mut cursor = self
            .cursor
            .unwrap_or_else(|| DrawCursor::start(self.visible.len()));
        let first = cursor.next;
        let start = clock.now();

        while !cursor.is_done() {
            cursor.next = self.draw_range(cursor.next, self.batch_size, &mut draw_fn);
            if clock.now().saturating_sub(start) >= max_time {
                break;
            }
        }

        log::trace!("drew faces {}..{} of {}", first, cursor.next, cursor.total);

        self.cursor = Some(cursor);
        cursor.is_done()
    }

    /// Draws up to `count` faces starting at `start`; returns the next index.
    fn draw_range<F>(&mut self, start: usize, count: usize, draw_fn: &mut F) -> usize
    where
        F: FnMut(Color, &[Vector3]),
    {
        let end = start.saturating_add(count).min(self.visible.len());
        let Some(binding) = self.binding.as_ref() else {
            return end;
        };

        for visible in &self.visible[start.min(end)..end] {
            draw_face(binding, visible, &mut self.ndc, draw_fn);
        }
        end
    }
}

impl Default for ModelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Projects and shades one face. Faces with any vertex outside the NDC
/// square are skipped whole.
fn draw_face<F>(binding: &Binding, visible: &VisibleFace, ndc: &mut Vec<Vector3>, draw_fn: &mut F)
where
    F: FnMut(Color, &[Vector3]),
{
    let object = &binding.object;
    let face = &object.mesh.faces[visible.face_index];

    ndc.clear();
    for position in object.mesh.face_positions(face) {
        let projected = binding.projection.multiply_vxm(object.to_world(position));
        if !in_clip_bounds(projected) {
            return;
        }
        ndc.push(projected);
    }

    let intensity = binding
        .light_direction
        .dot(&normalize_or_forward(visible.world_normal));
    let color = Color::shade(binding.model_color, binding.light_color, intensity);

    draw_fn(color, ndc.as_slice());
}

/// Inclusive [-1, 1] test on x and y; NaN is outside.
fn in_clip_bounds(p: Vector3) -> bool {
    (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y)
}
