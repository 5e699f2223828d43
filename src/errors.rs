use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfShrinkError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Renderer failed: {0}")]
    RendererFailure(String),

    #[error("Renderer timed out after {0:?}")]
    RendererTimeout(Duration),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid crop region: {0}")]
    InvalidCrop(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PdfShrinkError>;
