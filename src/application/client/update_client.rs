use std::sync::Arc;
use uuid::Uuid;

use super::create_client::ClientCommand;
use crate::domain::invoice::{Client, InvoiceError, InvoiceService};

#[derive(Debug, Clone)]
pub struct UpdateClientCommand {
  pub client_id: Uuid,
  pub fields: ClientCommand,
}

pub struct UpdateClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: UpdateClientCommand) -> Result<Client, InvoiceError> {
    let data = command.fields.into_data()?;
    self
      .invoice_service
      .update_client(command.client_id, data)
      .await
  }
}
