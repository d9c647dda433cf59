//! WebGPU draw step
//!
//! Flat-coloured triangles in playfield pixels, converted to NDC on upload.
//! The player sprite itself is a DOM image layered over the canvas; this
//! renderer only draws the fallback circle when that image is unavailable.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
