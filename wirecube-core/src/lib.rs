/// wirecube core library - the rotating wireframe cube effect
///
/// This library holds the cube geometry and its per-frame transforms, the
/// orthographic projection, the renderer abstraction the effect draws
/// through, and an in-memory software renderer.

pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod projection;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use canvas::{Canvas, CanvasStats, Surface, TextureId};
pub use clock::{FixedStepClock, SystemClock, TickSource};
pub use color::Rgba;
pub use config::{EffectConfig, LineMode, PulseMode, MAX_DIMENSION};
pub use effect::CubeEffect;
pub use error::{BufferKind, ColorParseError, EffectError, RenderError};
pub use geometry::{Edge, Vertex, WireCube, EDGES, EDGE_COUNT, VERTEX_COUNT};
pub use projection::{ScreenPoint, Viewport, POINT_COUNT};
pub use render::{BlendMode, Renderer, ScaleMode, TargetGuard};
pub use transform::{Transform, TransformMode};
