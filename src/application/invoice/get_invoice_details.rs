use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceDetails, InvoiceError, InvoiceService};

#[derive(Debug, Clone, Copy)]
pub struct GetInvoiceDetailsCommand {
  pub invoice_id: Uuid,
}

pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceDetailsCommand,
  ) -> Result<InvoiceDetails, InvoiceError> {
    self
      .invoice_service
      .get_invoice_details(command.invoice_id)
      .await
  }
}
