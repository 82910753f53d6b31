// Filmshelf Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LibraryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound(_))
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, LibraryError::DuplicateKey(_))
    }

    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, LibraryError::StorageUnavailable(_))
    }
}

// Constraint violations are mapped to DuplicateKey at the insert site,
// everything else the engine reports is a storage failure.
impl From<rusqlite::Error> for LibraryError {
    fn from(err: rusqlite::Error) -> Self {
        LibraryError::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
