use placard_render::RenderError;
use thiserror::Error;

use crate::decoder::WireShape;

/// Errors raised while reading or writing packet text.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("component json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("packet has no {0:?} field")]
    MissingField(WireShape),

    #[error("no native codec installed")]
    NoCodec,

    #[error("native codec failed: {0}")]
    Codec(String),
}

pub type Result<T> = std::result::Result<T, WireError>;
