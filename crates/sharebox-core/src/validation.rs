//! Upload validation.

use crate::error::AppError;
use thiserror::Error;

/// Validation failures for uploaded files.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File is empty")]
    EmptyFile,

    #[error("File too large: {size} bytes exceeds max {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Missing filename")]
    MissingFilename,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
            ValidationError::FileTooLarge { size, max } => AppError::PayloadTooLarge(format!(
                "{} bytes exceeds max {} bytes",
                size, max
            )),
            ValidationError::MissingFilename => {
                AppError::InvalidInput("Missing filename".to_string())
            }
            ValidationError::InvalidFilename(msg) => AppError::InvalidInput(msg),
        }
    }
}

/// Validate an upload before any bytes are written to storage.
///
/// Empty uploads are rejected; filenames may not contain path separators or
/// traversal sequences since they are embedded into storage keys.
pub fn validate_upload(
    filename: &str,
    size: usize,
    max_size: usize,
) -> Result<(), ValidationError> {
    if filename.is_empty() {
        return Err(ValidationError::MissingFilename);
    }

    if filename.contains('/') || filename.contains('\\') || filename.contains('\0') {
        return Err(ValidationError::InvalidFilename(
            "Filename contains path separators".to_string(),
        ));
    }

    if filename.contains("..") {
        return Err(ValidationError::InvalidFilename(
            "Filename contains traversal sequence".to_string(),
        ));
    }

    if size == 0 {
        return Err(ValidationError::EmptyFile);
    }

    if size > max_size {
        return Err(ValidationError::FileTooLarge {
            size,
            max: max_size,
        });
    }

    Ok(())
}
