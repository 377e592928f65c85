use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService, Service};

#[derive(Debug, Clone, Copy)]
pub struct GetServiceCommand {
  pub service_id: Uuid,
}

pub struct GetServiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetServiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: GetServiceCommand) -> Result<Service, InvoiceError> {
    self.invoice_service.get_service(command.service_id).await
  }
}
