//! Rendering module
//!
//! `shapes` builds a backend-neutral draw list from the world each frame;
//! `canvas` paints it in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{Color, DrawCmd, SceneOptions, build_scene, colors};
