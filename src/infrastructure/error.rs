//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors on their way to the CLI.
///
/// File I/O failures already carry their path as
/// [`ApplicationError::OperationFailed`], so there is no separate I/O variant.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),
}
