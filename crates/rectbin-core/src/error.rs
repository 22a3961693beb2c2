use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BinPackError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Rectangle {width}x{height} does not fit into an empty page")]
    TooLarge { width: u32, height: u32 },
    #[error("Out of space: all {max} pages are full")]
    OutOfPages { max: usize },
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, BinPackError>;
