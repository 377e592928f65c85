use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{Client, InvoiceError, InvoiceService};

#[derive(Debug, Clone, Copy)]
pub struct GetClientCommand {
  pub client_id: Uuid,
}

pub struct GetClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: GetClientCommand) -> Result<Client, InvoiceError> {
    self.invoice_service.get_client(command.client_id).await
  }
}
