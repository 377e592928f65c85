use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceService, Service};

pub struct ListServicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListServicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<Vec<Service>, InvoiceError> {
    self.invoice_service.list_services().await
  }
}
