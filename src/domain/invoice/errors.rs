use super::value_objects::{InvoiceStatus, ValueObjectError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification surfaced to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  InvalidInput,
  Conflict,
  DependencyFailure,
}

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Service with ID {0} not found")]
  ServiceNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("No line items provided")]
  NoLineItems,

  #[error("Due date {due_date} is before invoice date {invoice_date}")]
  InvalidDateRange {
    invoice_date: chrono::NaiveDate,
    due_date: chrono::NaiveDate,
  },

  #[error("{0}")]
  MissingRecipient(String),

  #[error("Invalid status transition from {from} to {to}")]
  InvalidStatusTransition {
    from: InvoiceStatus,
    to: InvoiceStatus,
  },

  #[error("Invoice number '{0}' already exists")]
  InvoiceNumberAlreadyExists(String),

  #[error("{0} is still referenced by existing invoices")]
  ReferencedRecord(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Storage error: {0}")]
  Storage(String),

  #[error("Email sending failed: {0}")]
  Mail(String),

  #[error("Document rendering failed: {0}")]
  Rendering(String),
}

impl InvoiceError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      InvoiceError::ClientNotFound(_)
      | InvoiceError::ServiceNotFound(_)
      | InvoiceError::InvoiceNotFound(_) => ErrorKind::NotFound,
      InvoiceError::Validation(_)
      | InvoiceError::NoLineItems
      | InvoiceError::InvalidDateRange { .. }
      | InvoiceError::MissingRecipient(_)
      | InvoiceError::InvalidStatusTransition { .. } => ErrorKind::InvalidInput,
      InvoiceError::InvoiceNumberAlreadyExists(_) | InvoiceError::ReferencedRecord(_) => {
        ErrorKind::Conflict
      }
      InvoiceError::Database(_)
      | InvoiceError::Storage(_)
      | InvoiceError::Mail(_)
      | InvoiceError::Rendering(_) => ErrorKind::DependencyFailure,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_kinds() {
    assert_eq!(
      InvoiceError::ClientNotFound(Uuid::nil()).kind(),
      ErrorKind::NotFound
    );
    assert_eq!(InvoiceError::NoLineItems.kind(), ErrorKind::InvalidInput);
    assert_eq!(
      InvoiceError::InvoiceNumberAlreadyExists("INV-2026-0001".into()).kind(),
      ErrorKind::Conflict
    );
    assert_eq!(
      InvoiceError::Mail("connection refused".into()).kind(),
      ErrorKind::DependencyFailure
    );
  }

  #[test]
  fn test_service_not_found_message() {
    let id = Uuid::nil();
    assert_eq!(
      InvoiceError::ServiceNotFound(id).to_string(),
      format!("Service with ID {} not found", id)
    );
  }
}
