use actix_web::{
  HttpResponse,
  error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::invoice::{ErrorKind, InvoiceError};

use super::dtos::ApiResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Referenced record does not exist (404 Not Found)
  NotFound(String),

  /// Request failed validation (400 Bad Request)
  Validation(String),

  /// Request conflicts with stored state (409 Conflict)
  Conflict(String),

  /// Storage, mail or rendering failure (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::NotFound(msg) | ApiError::Validation(msg) | ApiError::Conflict(msg) => msg.clone(),
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        "An internal server error occurred".to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ApiResponse::failure(message))
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    let message = match &error {
      InvoiceError::ClientNotFound(_) => "Client not found".to_string(),
      InvoiceError::InvoiceNotFound(_) => "Invoice not found".to_string(),
      InvoiceError::Validation(err) => err.to_string(),
      _ => error.to_string(),
    };

    match error.kind() {
      ErrorKind::NotFound => ApiError::NotFound(message),
      ErrorKind::InvalidInput => ApiError::Validation(message),
      ErrorKind::Conflict => ApiError::Conflict(message),
      ErrorKind::DependencyFailure => ApiError::Internal(message),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    if messages.is_empty() {
      messages.push(errors.to_string());
    }
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

/// Malformed JSON bodies get the same envelope as every other failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid path parameter: {}", err)).into()
}

pub fn query_error_handler(
  err: QueryPayloadError,
  _req: &actix_web::HttpRequest,
) -> actix_web::Error {
  ApiError::Validation(format!("Invalid query string: {}", err)).into()
}
