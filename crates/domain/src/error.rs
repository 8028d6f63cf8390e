use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid activity type: {0}")]
    InvalidActivityType(String),

    #[error("activity name is required")]
    EmptyActivityName,

    #[error("project name is required")]
    EmptyProjectName,

    #[error("sub-activity not found: {0}")]
    SubActivityNotFound(String),
}
