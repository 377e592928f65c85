use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::invoice::{
  InvoiceError, InvoiceService, Money, Service, ServiceData, ServiceName,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCommand {
  pub name: String,
  pub description: Option<String>,
  pub default_rate: Decimal,
}

impl ServiceCommand {
  pub(crate) fn into_data(self) -> Result<ServiceData, InvoiceError> {
    Ok(ServiceData {
      name: ServiceName::new(self.name)?,
      description: self.description,
      default_rate: Money::new(self.default_rate)?,
    })
  }
}

pub struct CreateServiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateServiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: ServiceCommand) -> Result<Service, InvoiceError> {
    let data = command.into_data()?;
    self.invoice_service.create_service(data).await
  }
}
