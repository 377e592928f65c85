use serde::Deserialize;
use std::sync::Arc;

use crate::domain::invoice::{
  Client, ClientData, ClientName, EmailAddress, InvoiceError, InvoiceService,
};

/// Client fields as received from callers, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCommand {
  pub name: String,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

impl ClientCommand {
  pub(crate) fn into_data(self) -> Result<ClientData, InvoiceError> {
    Ok(ClientData {
      name: ClientName::new(self.name)?,
      email: EmailAddress::optional(self.email)?,
      phone: self.phone,
      address: self.address,
    })
  }
}

pub struct CreateClientUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateClientUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: ClientCommand) -> Result<Client, InvoiceError> {
    let data = command.into_data()?;
    self.invoice_service.create_client(data).await
  }
}
