/// Error types for the effect and its rendering backends
use thiserror::Error;

/// Which of the effect's two render targets an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Cube,
    Gradient,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferKind::Cube => f.write_str("cube"),
            BufferKind::Gradient => f.write_str("gradient"),
        }
    }
}

/// Failure reported by a `Renderer` implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cannot create {width}x{height} texture: {reason}")]
    TextureCreate {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("unknown texture handle")]
    UnknownTexture,
    #[error("draw call failed: {0}")]
    Draw(String),
}

/// Fatal errors raised while setting up the effect
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("failed to allocate {buffer} buffer")]
    Allocation {
        buffer: BufferKind,
        #[source]
        source: RenderError,
    },
    #[error("failed to render {buffer} buffer")]
    Render {
        buffer: BufferKind,
        #[source]
        source: RenderError,
    },
    #[error("invalid effect configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected 3 or 4 channels, got {0}")]
    ChannelCount(usize),
    #[error("invalid color channel {0:?}")]
    InvalidChannel(String),
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
}
