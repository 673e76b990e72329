use thiserror::Error;

use kalends_core::error::CoreError;
use kalends_db::error::DbError;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage failure: {0}")]
    DependencyFailure(#[from] DbError),

    #[error("Stored {persisted} of {requested} event copies before failing: {source}")]
    PartialFanOut {
        persisted: usize,
        requested: usize,
        #[source]
        source: Box<ServiceError>,
    },

    #[error(transparent)]
    CoreError(CoreError),
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            CoreError::NotFound(msg) => Self::NotFound(msg),
            other => Self::CoreError(other),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
