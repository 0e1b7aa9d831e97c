use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("movie not found: {0}")]
    MovieNotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("movie id already exists: {0}")]
    DuplicateId(String),
    #[error("movie store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("error querying database: {0}")]
    DBQueryError(#[from] mongodb::error::Error),
    #[error("error encoding document: {0}")]
    DocumentEncodeError(#[from] mongodb::bson::ser::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MovieNotFound(_) => ErrorKind::NotFound,
            Error::InvalidRequest(_) => ErrorKind::Validation,
            Error::DuplicateId(_)
            | Error::StoreUnavailable(_)
            | Error::DBQueryError(_)
            | Error::DocumentEncodeError(_) => ErrorKind::Internal,
        }
    }
}
