use std::sync::Arc;
use uuid::Uuid;

use super::create_service::ServiceCommand;
use crate::domain::invoice::{InvoiceError, InvoiceService, Service};

#[derive(Debug, Clone)]
pub struct UpdateServiceCommand {
  pub service_id: Uuid,
  pub fields: ServiceCommand,
}

pub struct UpdateServiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateServiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Existing invoice lines keep the rate they were created with.
  pub async fn execute(&self, command: UpdateServiceCommand) -> Result<Service, InvoiceError> {
    let data = command.fields.into_data()?;
    self
      .invoice_service
      .update_service(command.service_id, data)
      .await
  }
}
