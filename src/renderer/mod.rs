//! Rendering module
//!
//! The scene pass draws through the [`Surface`] capability so the simulation
//! can run headless. The browser backend is a Canvas2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::draw_scene;
pub use surface::{DrawCall, RecordingSurface, Surface};
