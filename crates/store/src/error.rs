use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("project not found: {0}")]
    NotFound(String),

    #[error("invalid project: {0}")]
    InvalidProject(#[from] epu_domain::DomainError),

    #[error("storage backend error: {0}")]
    Backend(String),
}
