//! flatshade terminal viewer
//!
//! Usage: `flatshade-terminal [mesh.obj ...] [settings.toml]`
//!
//! Controls:
//!   - WASD / Arrow Keys: Rotate the model
//!   - E/R: Roll
//!   - +/-: Move closer / farther
//!   - J/L, K/I, U/O: Move the rotation pivot along x, y, z
//!   - C: Pivot back to the mesh center
//!   - N/P (Tab/Shift-Tab): Next / previous model
//!   - F/G: Toggle faces / edges
//!   - Q/ESC: Quit

use anyhow::Context;
use flatshade_core::{obj, ModelLibrary, RenderObject, RenderSettings};
use flatshade_terminal::{demo_cube, TerminalApp};
use std::path::Path;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (settings_paths, mesh_paths): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|arg| arg.ends_with(".toml"));

    let mut models = ModelLibrary::new();
    for path in &mesh_paths {
        models.insert(path.as_str(), load_object(Path::new(path))?);
    }
    if models.is_empty() {
        models.insert("cube", demo_cube());
    }
    if let Some(first) = mesh_paths.first() {
        models.select(first);
    }

    let settings = match settings_paths.last() {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => RenderSettings::default(),
    };

    if let Some(object) = models.selected() {
        log::info!(
            "viewing '{}' ({} faces, {} models loaded)",
            object.description,
            object.mesh.face_count(),
            models.len()
        );
    }

    let mut app = TerminalApp::new(models, settings)?;
    app.run()?;

    Ok(())
}

fn load_object(path: &Path) -> anyhow::Result<RenderObject> {
    let mesh = obj::parse_file(path)
        .with_context(|| format!("failed to load mesh from {}", path.display()))?;
    let description = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(RenderObject::framed(Arc::new(mesh)).with_description(description))
}
