use actix_web::{body, http::{self, header::ContentType, StatusCode}, HttpResponse};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("payroll period is already processed")]
    AlreadyProcessed,

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    BadInput(String),

    #[error("store failure")]
    Store(#[from] DbErr),

    /// Stored data violates an invariant the engine relies on
    #[error("inconsistent data: {0}")]
    Inconsistent(String),
}

impl PayrollError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput(message.into())
    }
}

impl actix_web::error::ResponseError for PayrollError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        let status = self.status_code();

        // Internal details stay in the log
        let body = if status.is_server_error() {
            error!(error = ?self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status)
            .insert_header(ContentType::plaintext())
            .body(body)
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            PayrollError::NotFound(_) => StatusCode::NOT_FOUND,
            PayrollError::Forbidden => StatusCode::FORBIDDEN,
            PayrollError::AlreadyProcessed | PayrollError::BadInput(_) => StatusCode::BAD_REQUEST,
            PayrollError::Store(_) | PayrollError::Inconsistent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
