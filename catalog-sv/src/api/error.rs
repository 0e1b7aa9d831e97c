use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use log::error;
use serde::Serialize;

use crate::core::error::{Error, ErrorKind};

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.kind() == ErrorKind::Internal {
            error!("{}", self);
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        })
    }
}
