use thiserror::Error;

use crate::core::error::AppError;

/// Failures of the file operations
///
/// Everything but `App` is decided before any write happens.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Missing name")]
    MissingName,

    #[error("Missing type")]
    MissingType,

    #[error("Invalid type")]
    InvalidType,

    #[error("Missing data")]
    MissingData,

    #[error("Invalid data")]
    InvalidData,

    #[error("{0}")]
    Validation(String),

    #[error("Parent not found")]
    ParentNotFound,

    #[error("Parent is not a folder")]
    ParentNotFolder,

    #[error("Not found")]
    NotFound,

    #[error("A folder doesn't have content")]
    NoContentForFolder,

    #[error(transparent)]
    App(#[from] AppError),
}

impl From<FileError> for AppError {
    fn from(error: FileError) -> Self {
        match error {
            FileError::Validation(msg) => AppError::Validation(msg),
            FileError::NotFound => AppError::NotFound(error.to_string()),
            FileError::App(e) => e,
            FileError::MissingName
            | FileError::MissingType
            | FileError::InvalidType
            | FileError::MissingData
            | FileError::InvalidData
            | FileError::ParentNotFound
            | FileError::ParentNotFolder
            | FileError::NoContentForFolder => AppError::BadRequest(error.to_string()),
        }
    }
}
