use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Clone, Copy)]
pub struct DeleteClientCommand {
  pub client_id: Uuid,
}

pub struct DeleteClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Fails with `ReferencedRecord` while invoices still point at the client.
  pub async fn execute(&self, command: DeleteClientCommand) -> Result<(), InvoiceError> {
    self.invoice_service.delete_client(command.client_id).await
  }
}
