//! flatshade core: mesh parsing, transforms and the flat-shading face renderer
//!
//! Everything here is host-agnostic. A host binds a [`RenderObject`] to a
//! [`ModelRenderer`], pumps its draw calls on its own timer and maps the
//! emitted normalized device coordinates onto its drawing surface.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod library;
pub mod math;
pub mod obj;
pub mod projection;
pub mod renderer;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use config::RenderSettings;
pub use error::{ConfigError, ParseError};
pub use geometry::{Bounds, Face, Mesh};
pub use library::ModelLibrary;
pub use math::{Quaternion, Vector3};
pub use projection::{ndc_to_pixel, Handedness, Matrix44, Perspective};
pub use renderer::{Clock, DrawCursor, ModelRenderer, MonotonicClock, VisibleFace};
pub use transform::{Orientation, RenderObject};
