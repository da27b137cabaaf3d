//! Renders a single frame without a terminal session and prints it.
//!
//! cargo run -p flatshade-terminal --example snapshot -- [mesh.obj]

use anyhow::Context;
use flatshade_core::{obj, ModelRenderer, RenderObject, RenderSettings};
use flatshade_terminal::{demo_cube, render_frame, TerminalSurface};
use std::sync::Arc;

const WIDTH: usize = 72;
const HEIGHT: usize = 36;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let object = match std::env::args().nth(1) {
        Some(path) => {
            let mesh = obj::parse_file(&path).with_context(|| format!("failed to load mesh from {path}"))?;
            RenderObject::framed(Arc::new(mesh)).with_description(path)
        }
        None => demo_cube(),
    };

    let mut settings = RenderSettings::default();
    settings.draw.draw_edges = true;

    let mut surface = TerminalSurface::new(WIDTH, HEIGHT);
    let mut renderer = ModelRenderer::new();
    render_frame(&mut renderer, &object, &settings, &mut surface);

    for line in surface.lines() {
        println!("{line}");
    }
    println!(
        "{} of {} faces visible",
        renderer.visible_faces().len(),
        object.mesh.face_count()
    );

    Ok(())
}
