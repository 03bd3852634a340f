use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse SVG: {0}")]
    Svg(String),

    #[error("Failed to render document: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
