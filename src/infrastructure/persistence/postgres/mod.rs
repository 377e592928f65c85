pub mod client_repository;
pub mod invoice_repository;
pub mod invoice_transaction;
pub mod service_repository;

pub use client_repository::PostgresClientRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use invoice_transaction::PostgresInvoiceTransaction;
pub use service_repository::PostgresServiceRepository;

use crate::domain::invoice::InvoiceError;

/// Maps a foreign key violation on delete to `ReferencedRecord`.
pub(crate) fn map_delete_error(err: sqlx::Error, record: impl FnOnce() -> String) -> InvoiceError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_foreign_key_violation() {
      return InvoiceError::ReferencedRecord(record());
    }
  }
  InvoiceError::Database(err)
}
