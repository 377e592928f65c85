use std::sync::Arc;

use crate::domain::invoice::{Client, InvoiceError, InvoiceService};

pub struct ListClientsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListClientsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// All clients ordered by name.
  pub async fn execute(&self) -> Result<Vec<Client>, InvoiceError> {
    self.invoice_service.list_clients().await
  }
}
