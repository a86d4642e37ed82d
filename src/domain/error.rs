use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("todo not found")]
    NotFound,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

pub type TodoResult<T> = Result<T, TodoError>;
