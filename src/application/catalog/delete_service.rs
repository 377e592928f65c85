use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Clone, Copy)]
pub struct DeleteServiceCommand {
  pub service_id: Uuid,
}

pub struct DeleteServiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteServiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: DeleteServiceCommand) -> Result<(), InvoiceError> {
    self.invoice_service.delete_service(command.service_id).await
  }
}
