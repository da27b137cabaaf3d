//! Terminal host for the flat-shaded mesh renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, terminal,
};
use flatshade_core::{
    config::DrawSettings, Color, Mesh, ModelLibrary, ModelRenderer, Orientation, RenderObject, RenderSettings,
    Vector3,
};
use std::io::{self, stdout, Write};
use std::sync::Arc;
use std::time::Duration;

pub mod surface;

pub use surface::{DrawSurface, TerminalSurface};

/// Degrees per rotation key press.
const ROTATION_STEP: f64 = 5.0;
/// Distance per translation or pivot key press.
const MOVE_STEP: f64 = 0.25;
/// Input poll interval while no draw is in progress.
const IDLE_TICK: Duration = Duration::from_millis(1000 / 30);

/// The built-in model: a cube turned to show three faces.
pub fn demo_cube() -> RenderObject {
    RenderObject::new(Arc::new(Mesh::cube(2.0)))
        .with_translation(Vector3::new(0.0, 0.0, -6.0))
        .with_orientation(Orientation::from_euler(Vector3::new(30.0, 30.0, 0.0)))
        .with_description("cube")
}

/// Sends one shaded face to `surface` according to the draw toggles.
pub fn paint_face<S: DrawSurface + ?Sized>(surface: &mut S, draw: &DrawSettings, color: Color, ndc: &[Vector3]) {
    if draw.draw_faces {
        surface.fill_polygon(color, ndc);
    }
    if draw.draw_edges {
        surface.stroke_polygon(draw.edge_color, ndc);
    }
}

/// Binds `object` and runs the visibility and ordering steps.
pub fn prepare_pass(renderer: &mut ModelRenderer, object: &RenderObject, settings: &RenderSettings) {
    let lighting = settings.lighting;
    renderer
        .initialize(
            object,
            settings.projection_matrix(),
            lighting.model_color,
            lighting.light_direction,
            lighting.light_color,
        )
        .filter_visible_faces()
        .sort_visible_faces();
}

/// Renders a complete frame in one go, description included.
pub fn render_frame<S: DrawSurface + ?Sized>(
    renderer: &mut ModelRenderer,
    object: &RenderObject,
    settings: &RenderSettings,
    surface: &mut S,
) {
    prepare_pass(renderer, object, settings);
    surface.clear(settings.draw.background_color);
    renderer.draw(|color, ndc: &[Vector3]| paint_face(surface, &settings.draw, color, ndc));
    draw_description(surface, object, settings);
}

fn draw_description<S: DrawSurface + ?Sized>(surface: &mut S, object: &RenderObject, settings: &RenderSettings) {
    let (_, height) = surface.size();
    if height > 1 && !object.description.is_empty() {
        surface.draw_text(1, height - 1, settings.draw.text_color, &object.description);
    }
}

/// Applies a pose key to `object`; returns `false` for keys it does not handle.
fn edit_object(object: &mut RenderObject, code: KeyCode) -> bool {
    if let Some(delta) = pivot_step(code) {
        object.pivot += delta;
        return true;
    }

    let rotation = match code {
        KeyCode::Char('w') | KeyCode::Up => Vector3::new(ROTATION_STEP, 0.0, 0.0),
        KeyCode::Char('s') | KeyCode::Down => Vector3::new(-ROTATION_STEP, 0.0, 0.0),
        KeyCode::Char('a') | KeyCode::Left => Vector3::new(0.0, -ROTATION_STEP, 0.0),
        KeyCode::Char('d') | KeyCode::Right => Vector3::new(0.0, ROTATION_STEP, 0.0),
        KeyCode::Char('e') => Vector3::new(0.0, 0.0, ROTATION_STEP),
        KeyCode::Char('r') => Vector3::new(0.0, 0.0, -ROTATION_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            object.translation.z += MOVE_STEP;
            return true;
        }
        KeyCode::Char('-') => {
            object.translation.z -= MOVE_STEP;
            return true;
        }
        KeyCode::Char('c') => {
            object.reset_pivot();
            return true;
        }
        _ => return false,
    };

    object.orientation.rotate_by(rotation);
    true
}

/// J/L, K/I and U/O move the pivot along x, y and z.
fn pivot_step(code: KeyCode) -> Option<Vector3> {
    let KeyCode::Char(key) = code else {
        return None;
    };
    let delta = match key {
        'l' => Vector3::new(MOVE_STEP, 0.0, 0.0),
        'j' => Vector3::new(-MOVE_STEP, 0.0, 0.0),
        'i' => Vector3::new(0.0, MOVE_STEP, 0.0),
        'k' => Vector3::new(0.0, -MOVE_STEP, 0.0),
        'o' => Vector3::new(0.0, 0.0, MOVE_STEP),
        'u' => Vector3::new(0.0, 0.0, -MOVE_STEP),
        _ => return None,
    };
    Some(delta)
}

/// Interactive viewer: keyboard drives the pose, frames are drawn in
/// time-sliced steps so input stays responsive on large meshes.
pub struct TerminalApp {
    models: ModelLibrary,
    settings: RenderSettings,
    renderer: ModelRenderer,
    surface: TerminalSurface,
    running: bool,
    needs_pass: bool,
    frame_done: bool,
}

impl TerminalApp {
    pub fn new(models: ModelLibrary, settings: RenderSettings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(models, settings, width as usize, height as usize))
    }

    pub fn with_size(models: ModelLibrary, settings: RenderSettings, width: usize, height: usize) -> Self {
        Self {
            models,
            settings,
            renderer: ModelRenderer::new(),
            surface: TerminalSurface::new(width, height),
            running: true,
            needs_pass: true,
            frame_done: false,
        }
    }

    pub fn models(&self) -> &ModelLibrary {
        &self.models
    }

    /// The model on screen, if any.
    pub fn object(&self) -> Option<&RenderObject> {
        self.models.selected()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn surface(&self) -> &TerminalSurface {
        &self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_frame_done(&self) -> bool {
        self.frame_done
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let timeout = if self.frame_done && !self.needs_pass {
                IDLE_TICK
            } else {
                Duration::ZERO
            };

            if event::poll(timeout)? {
                self.handle_event(event::read()?);
            }

            if self.tick() {
                self.present()?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.surface.resize(width as usize, height as usize);
                self.needs_pass = true;
            }
            _ => {}
        }
    }

    /// Applies a key press. Anything that changes the picture restarts the pass.
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('f') => self.settings.draw.draw_faces = !self.settings.draw.draw_faces,
            KeyCode::Char('g') => self.settings.draw.draw_edges = !self.settings.draw.draw_edges,
            KeyCode::Char('n') | KeyCode::Tab => {
                self.models.select_next();
            }
            KeyCode::Char('p') | KeyCode::BackTab => {
                self.models.select_previous();
            }
            _ => {
                let Some(object) = self.models.selected_mut() else {
                    return;
                };
                if !edit_object(object, code) {
                    return;
                }
            }
        }
        self.needs_pass = true;
    }

    /// Advances rendering by one step; returns whether the surface changed.
    pub fn tick(&mut self) -> bool {
        if self.needs_pass {
            self.surface.clear(self.settings.draw.background_color);
            self.needs_pass = false;
            match self.models.selected() {
                Some(object) => {
                    prepare_pass(&mut self.renderer, object, &self.settings);
                    self.frame_done = false;
                }
                None => {
                    self.frame_done = true;
                    self.draw_status();
                    return true;
                }
            }
        }
        if self.frame_done {
            return false;
        }

        let draw = self.settings.draw;
        let surface = &mut self.surface;
        let paint = |color: Color, ndc: &[Vector3]| paint_face(surface, &draw, color, ndc);

        self.frame_done = if draw.iteration_time_ms == 0 {
            self.renderer.draw(paint);
            true
        } else {
            self.renderer
                .draw_iteratively(paint, Duration::from_millis(draw.iteration_time_ms))
        };

        self.draw_status();
        if self.frame_done {
            if let Some(object) = self.models.selected() {
                draw_description(&mut self.surface, object, &self.settings);
            }
            log::debug!("frame complete: {} faces", self.renderer.visible_faces().len());
        }
        true
    }

    fn draw_status(&mut self) {
        let Some(object) = self.models.selected() else {
            self.surface
                .draw_text(0, 0, self.settings.draw.text_color, "no model loaded | Q quit");
            return;
        };

        let (drawn, total) = if self.frame_done {
            let total = self.renderer.visible_faces().len();
            (total, total)
        } else {
            self.renderer.progress()
        };
        let euler = object.orientation.euler();
        let pivot = object.pivot;
        let status = format!(
            "{} | {drawn}/{total} faces | rot {:.0} {:.0} {:.0} | pivot {:.2} {:.2} {:.2} | \
             WASD/arrows rotate, E/R roll, +/- move, IJKLUO pivot, C recenter, N/P model, F/G faces/edges, Q quit",
            object.description, euler.x, euler.y, euler.z, pivot.x, pivot.y, pivot.z
        );
        self.surface.draw_text(0, 0, self.settings.draw.text_color, &status);
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        self.surface.present(&mut stdout)?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the calls a host makes.
    #[derive(Default)]
    struct RecordingSurface {
        fills: usize,
        strokes: usize,
        texts: Vec<String>,
    }

    impl DrawSurface for RecordingSurface {
        fn size(&self) -> (usize, usize) {
            (40, 20)
        }

        fn clear(&mut self, _color: Color) {
            self.fills = 0;
            self.strokes = 0;
        }

        fn fill_polygon(&mut self, _color: Color, _ndc: &[Vector3]) {
            self.fills += 1;
        }

        fn stroke_polygon(&mut self, _color: Color, _ndc: &[Vector3]) {
            self.strokes += 1;
        }

        fn draw_text(&mut self, _x: usize, _y: usize, _color: Color, text: &str) {
            self.texts.push(text.to_string());
        }
    }

    fn app() -> TerminalApp {
        let mut models = ModelLibrary::new();
        models.insert("cube", demo_cube());
        TerminalApp::with_size(models, RenderSettings::default(), 60, 30)
    }

    fn pose(app: &TerminalApp) -> RenderObject {
        app.object().cloned().expect("a model is selected")
    }

    #[test]
    fn test_render_frame_honours_toggles() {
        let mut settings = RenderSettings::default();
        let mut renderer = ModelRenderer::new();
        let mut surface = RecordingSurface::default();

        render_frame(&mut renderer, &demo_cube(), &settings, &mut surface);
        assert_eq!(surface.fills, 3);
        assert_eq!(surface.strokes, 0);
        assert_eq!(surface.texts, vec!["cube".to_string()]);

        settings.draw.draw_faces = false;
        settings.draw.draw_edges = true;
        render_frame(&mut renderer, &demo_cube(), &settings, &mut surface);
        assert_eq!(surface.fills, 0);
        assert_eq!(surface.strokes, 3);
    }

    #[test]
    fn test_keys_edit_pose() {
        let mut app = app();
        let start = pose(&app).orientation.euler();

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Char('-'));

        let euler = pose(&app).orientation.euler();
        assert_eq!(euler.y, start.y + ROTATION_STEP);
        assert_eq!(euler.x, start.x + ROTATION_STEP);
        assert_eq!(pose(&app).translation.z, -6.0 - MOVE_STEP);

        app.handle_key(KeyCode::Char('g'));
        assert!(app.settings().draw.draw_edges);

        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_tick_completes_frame() {
        let mut app = app();
        assert!(app.tick());
        while !app.is_frame_done() {
            app.tick();
        }
        assert!(!app.tick());

        let lines = app.surface().lines();
        assert!(lines[0].starts_with("cube | 3/3 faces"));
        assert!(lines[29].contains("cube"));
        assert!(lines[15].chars().any(|c| c != ' '));
    }

    #[test]
    fn test_key_press_restarts_pass() {
        let mut app = app();
        while !app.is_frame_done() {
            app.tick();
        }

        app.handle_key(KeyCode::Char('a'));
        assert!(app.tick());
        assert!(app.surface().lines()[0].contains("rot 30 25 0"));
    }

    #[test]
    fn test_pivot_keys_move_and_reset_pivot() {
        let mut app = app();
        assert_eq!(pose(&app).pivot, Vector3::new(0.0, 0.0, 0.0));

        app.handle_key(KeyCode::Char('l'));
        app.handle_key(KeyCode::Char('l'));
        app.handle_key(KeyCode::Char('i'));
        app.handle_key(KeyCode::Char('u'));
        assert_eq!(pose(&app).pivot, Vector3::new(2.0 * MOVE_STEP, MOVE_STEP, -MOVE_STEP));
        assert_eq!(pose(&app).orientation.euler(), Vector3::new(30.0, 30.0, 0.0));

        assert!(app.tick());
        assert!(app.surface().lines()[0].contains("pivot 0.50 0.25 -0.25"));

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(pose(&app).pivot, pose(&app).mesh.object_center);
    }

    #[test]
    fn test_model_keys_cycle_library() {
        let mut app = app();
        let small = RenderObject::new(Arc::new(Mesh::cube(1.0)))
            .with_translation(Vector3::new(0.0, 0.0, -4.0))
            .with_description("small");
        app.models.insert("small", small);
        app.handle_key(KeyCode::Char('d'));

        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.models().selected_name(), Some("cube"));
        // poses are kept per model
        assert_eq!(pose(&app).orientation.euler(), Vector3::new(30.0, 30.0, 0.0));

        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.models().selected_name(), Some("small"));
        assert_eq!(pose(&app).orientation.euler(), Vector3::new(0.0, ROTATION_STEP, 0.0));

        while !app.is_frame_done() {
            app.tick();
        }
        assert!(app.surface().lines()[0].starts_with("small | 1/1 faces"));
    }

    #[test]
    fn test_empty_library_draws_status_only() {
        let mut app = TerminalApp::with_size(ModelLibrary::new(), RenderSettings::default(), 40, 10);
        app.handle_key(KeyCode::Char('w'));
        app.handle_key(KeyCode::Char('n'));

        assert!(app.tick());
        assert!(app.is_frame_done());
        assert!(app.surface().lines()[0].starts_with("no model loaded"));
        assert!(!app.tick());
    }
}
