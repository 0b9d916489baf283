use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failure reported by a data-access port.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CalendarError {
    /// Rejected before any data is fetched.
    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to fetch {name}: {error}")]
    Source {
        name: &'static str,
        #[source]
        error: SourceError,
    },

    #[error("failed to write daily attendance row: {0}")]
    Cache(#[source] SourceError),
}

impl CalendarError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CalendarError::InvalidInput(message.into())
    }

    pub fn fetch(name: &'static str) -> impl FnOnce(SourceError) -> Self {
        move |error| CalendarError::Source { name, error }
    }
}

impl ResponseError for CalendarError {
    fn status_code(&self) -> StatusCode {
        match self {
            CalendarError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CalendarError::Source { .. } | CalendarError::Cache(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            CalendarError::InvalidInput(message) => message.as_str(),
            CalendarError::Source { .. } => "Failed to generate calendar",
            CalendarError::Cache(_) => "Failed to sync daily attendance",
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
