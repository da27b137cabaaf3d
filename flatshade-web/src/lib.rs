//! Browser host: renders into an HTML canvas through wasm-bindgen
//!
//! JavaScript owns the timer. A typical loop calls `begin_frame` after any
//! change, then `draw_step(ms)` from `requestAnimationFrame` until it
//! returns `true`.

use flatshade_core::{
    ndc_to_pixel, obj, Clock, Color, ModelLibrary, ModelRenderer, Orientation, Perspective, RenderObject,
    RenderSettings, Vector3,
};
use std::sync::Arc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const TEXT_FONT: &str = "14px monospace";

/// Upper bound on a single `draw_step` budget.
const MAX_STEP_MS: f64 = 60_000.0;

/// Wall clock from `Date.now()`; `Instant` is unavailable on wasm32.
struct DateClock;

impl Clock for DateClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
    }
}

/// The drawing operations of a surface, on a 2D canvas context.
struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    fn clear(&self, color: Color) {
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn trace(&self, ndc: &[Vector3]) -> bool {
        let Some((first, rest)) = ndc.split_first() else {
            return false;
        };

        self.context.begin_path();
        let (x, y) = ndc_to_pixel(*first, self.width, self.height);
        self.context.move_to(x, y);
        for &p in rest {
            let (x, y) = ndc_to_pixel(p, self.width, self.height);
            self.context.line_to(x, y);
        }
        self.context.close_path();
        true
    }

    fn fill_polygon(&self, color: Color, ndc: &[Vector3]) {
        if self.trace(ndc) {
            let css = JsValue::from_str(&color.to_css());
            self.context.set_fill_style(&css);
            // outline in the fill color closes seams between adjacent faces
            self.context.set_stroke_style(&css);
            self.context.fill();
            self.context.stroke();
        }
    }

    fn stroke_polygon(&self, color: Color, ndc: &[Vector3]) {
        if self.trace(ndc) {
            self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
            self.context.stroke();
        }
    }

    fn draw_text(&self, x: f64, y: f64, color: Color, text: &str) -> Result<(), JsValue> {
        self.context.set_font(TEXT_FONT);
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.fill_text(text, x, y)
    }
}

/// Canvas-backed viewer exported to JavaScript
#[wasm_bindgen]
pub struct WebRenderer {
    surface: CanvasSurface,
    models: ModelLibrary,
    settings: RenderSettings,
    renderer: ModelRenderer,
    frame_done: bool,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Binds to the `<canvas>` with the given element id.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let width = f64::from(canvas.width());
        let height = f64::from(canvas.height());
        let mut settings = RenderSettings::default();
        if height > 0.0 {
            settings.projection.aspect = width / height;
        }

        Ok(WebRenderer {
            surface: CanvasSurface {
                context,
                width,
                height,
            },
            models: ModelLibrary::new(),
            settings,
            renderer: ModelRenderer::new(),
            frame_done: true,
        })
    }

    /// Parses mesh text, frames it in front of the camera and caches it
    /// under `name`. The new model becomes the selected one.
    pub fn load_mesh(&mut self, name: &str, text: &str, description: &str) -> Result<(), JsValue> {
        let mesh = obj::parse(text).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::debug!("loaded '{}': {} faces", description, mesh.face_count());

        self.models
            .insert(name, RenderObject::framed(Arc::new(mesh)).with_description(description));
        Ok(())
    }

    /// Switches to a model loaded earlier, keeping its last pose. Returns
    /// `false` when nothing is cached under `name`; the caller should fetch
    /// and `load_mesh` it.
    pub fn select_model(&mut self, name: &str) -> bool {
        self.models.select(name)
    }

    pub fn selected_model(&self) -> Option<String> {
        self.models.selected_name().map(str::to_owned)
    }

    /// Euler angles in degrees.
    pub fn set_rotation(&mut self, x: f64, y: f64, z: f64) {
        if let Some(object) = self.models.selected_mut() {
            object.orientation = Orientation::from_euler(Vector3::new(x, y, z));
        }
    }

    pub fn set_translation(&mut self, x: f64, y: f64, z: f64) {
        if let Some(object) = self.models.selected_mut() {
            object.translation = Vector3::new(x, y, z);
        }
    }

    /// Object-space rotation pivot of the selected model.
    pub fn set_center(&mut self, x: f64, y: f64, z: f64) {
        if let Some(object) = self.models.selected_mut() {
            object.pivot = Vector3::new(x, y, z);
        }
    }

    pub fn set_projection(&mut self, fov_degrees: f64, aspect: f64, near: f64, far: f64) {
        self.settings.projection = Perspective {
            fov_degrees,
            aspect,
            near,
            far,
            ..self.settings.projection
        };
    }

    pub fn set_draw_options(&mut self, draw_faces: bool, draw_edges: bool) {
        self.settings.draw.draw_faces = draw_faces;
        self.settings.draw.draw_edges = draw_edges;
    }

    /// Replaces all settings from TOML text.
    pub fn load_settings(&mut self, toml: &str) -> Result<(), JsValue> {
        self.settings = RenderSettings::from_toml(toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    /// Rebinds the current pose and clears the canvas for a new pass.
    pub fn begin_frame(&mut self) {
        self.surface.clear(self.settings.draw.background_color);

        let Some(object) = self.models.selected() else {
            self.frame_done = true;
            return;
        };

        let lighting = self.settings.lighting;
        self.renderer
            .initialize(
                object,
                self.settings.projection_matrix(),
                lighting.model_color,
                lighting.light_direction,
                lighting.light_color,
            )
            .filter_visible_faces()
            .sort_visible_faces();
        self.frame_done = false;
    }

    /// Draws for at most about `max_ms` milliseconds. Returns `true` once the
    /// frame is complete.
    pub fn draw_step(&mut self, max_ms: f64) -> Result<bool, JsValue> {
        if self.frame_done {
            return Ok(true);
        }

        let draw = self.settings.draw;
        let surface = &self.surface;
        let paint = |color: Color, ndc: &[Vector3]| {
            if draw.draw_faces {
                surface.fill_polygon(color, ndc);
            }
            if draw.draw_edges {
                surface.stroke_polygon(draw.edge_color, ndc);
            }
        };

        let budget = Duration::from_secs_f64(max_ms.max(0.0).min(MAX_STEP_MS) / 1000.0);
        self.frame_done = self
            .renderer
            .draw_iteratively_with_clock(paint, budget, &DateClock);

        if self.frame_done {
            if let Some(object) = self.models.selected() {
                let y = (self.surface.height - 10.0).max(0.0);
                self.surface
                    .draw_text(10.0, y, draw.text_color, &object.description)?;
            }
        }
        Ok(self.frame_done)
    }

    /// Faces processed so far in the current pass.
    pub fn drawn_faces(&self) -> usize {
        self.renderer.progress().0
    }

    pub fn visible_faces(&self) -> usize {
        self.renderer.visible_faces().len()
    }
}
