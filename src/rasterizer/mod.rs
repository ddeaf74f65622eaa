//! ASCII software rasterizer
//!
//! Features:
//! - Full MVP vertex transform with perspective divide and near/far clipping
//! - Whole-primitive rejection (no partial clipping against the viewport)
//! - Depth-tested scanline fill with flat directional + point-light shading
//! - Depth-tested wireframe line drawing
//! - Double-buffered character-grid output

mod types;
mod transform;
mod shade;
mod render;

pub use types::*;
pub use transform::*;
pub use shade::*;
pub use render::*;

/// Default grid dimensions (characters)
pub const WIDTH: usize = 124;
pub const HEIGHT: usize = 70;
