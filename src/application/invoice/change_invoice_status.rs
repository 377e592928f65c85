use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus};

#[derive(Debug, Clone)]
pub struct ChangeInvoiceStatusCommand {
  pub invoice_id: Uuid,
  pub new_status: String,
}

#[derive(Debug, Serialize)]
pub struct ChangeInvoiceStatusResponse {
  pub invoice_id: Uuid,
  pub invoice_number: String,
  pub status: InvoiceStatus,
}

pub struct ChangeInvoiceStatusUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ChangeInvoiceStatusUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ChangeInvoiceStatusCommand,
  ) -> Result<ChangeInvoiceStatusResponse, InvoiceError> {
    let new_status = InvoiceStatus::from_str(&command.new_status)?;

    let invoice = self
      .invoice_service
      .change_invoice_status(command.invoice_id, new_status)
      .await?;

    Ok(ChangeInvoiceStatusResponse {
      invoice_id: invoice.id,
      invoice_number: invoice.invoice_number.to_string(),
      status: invoice.status,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::test_support::{create_invoice, invoice_service, seed_catalog};

  #[tokio::test]
  async fn test_status_changes_follow_lifecycle() {
    let service = invoice_service();
    let (client, consulting) = seed_catalog(&service).await;
    let invoice = create_invoice(&service, client.id, consulting.id).await;
    let use_case = ChangeInvoiceStatusUseCase::new(service);

    let paid = use_case
      .execute(ChangeInvoiceStatusCommand {
        invoice_id: invoice.invoice.id,
        new_status: "paid".to_string(),
      })
      .await
      .unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);

    let result = use_case
      .execute(ChangeInvoiceStatusCommand {
        invoice_id: invoice.invoice.id,
        new_status: "sent".to_string(),
      })
      .await;
    assert!(matches!(
      result,
      Err(InvoiceError::InvalidStatusTransition { .. })
    ));

    let result = use_case
      .execute(ChangeInvoiceStatusCommand {
        invoice_id: invoice.invoice.id,
        new_status: "archived".to_string(),
      })
      .await;
    assert!(matches!(result, Err(InvoiceError::Validation(_))));
  }
}
