#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("bounding box needs exactly 4 vertices, got {found}")]
    InvalidVertexCount { found: usize },
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
