//! Rendering: a logical-coordinate drawing surface, the terminal pixel
//! canvas that implements it, and the scene drawing itself.

pub mod canvas;
pub mod scene;
pub mod surface;

pub use canvas::PixelCanvas;
pub use scene::render_scene;
pub use surface::{RecordingSurface, Rgba, Surface};
