//! Error conversion from core error types.

use draftrun_core::Error as CoreError;

use crate::Error;

/// Convert a core error to an executor Error.
impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCriteria(reason) => Error::InvalidCriteria { reason },
            CoreError::NotFound(entity) => Error::NotFound { entity },
            CoreError::Unavailable(reason) => Error::Unavailable { reason },
            CoreError::Conflict(reason) => Error::Conflict { reason },
            CoreError::InvalidInput(reason) => Error::InvalidInput { reason },
            CoreError::InvalidPayload(reason) => Error::InvalidPayload { reason },
            CoreError::Serialization(reason) => Error::Serialization { reason },
        }
    }
}

/// Convert a core Result to an executor Result.
pub fn convert_result<T>(result: draftrun_core::Result<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}
