use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    MissingField(String),
    #[error("{0}")]
    NotFound(String),
}

impl ServiceError {
    pub fn post_not_found(id: u64) -> Self {
        Self::NotFound(format!("Post with id {id} not found."))
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::InvalidArgument(msg),
        }
    }
}
