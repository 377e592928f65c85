use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{
  InvoiceData, InvoiceDetails, InvoiceError, InvoiceService, LineItemDescription, LineItemRequest,
  Money, Quantity,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceLineItemDto {
  pub service_id: Uuid,
  pub quantity: Decimal,
  /// Overrides the service's default rate for this line only
  pub rate: Option<Decimal>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceCommand {
  pub client_id: Uuid,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub notes: Option<String>,
  pub line_items: Vec<CreateInvoiceLineItemDto>,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: CreateInvoiceCommand) -> Result<InvoiceDetails, InvoiceError> {
    let line_items = command
      .line_items
      .into_iter()
      .map(|item| {
        let rate = item
          .rate
          .map(|r| {
            let rate = Money::new(r)?;
            rate.ensure_rate()?;
            Ok::<_, InvoiceError>(rate)
          })
          .transpose()?;
        Ok(LineItemRequest {
          service_id: item.service_id,
          quantity: Quantity::new(item.quantity)?,
          rate,
          description: LineItemDescription::optional(item.description)?,
        })
      })
      .collect::<Result<Vec<_>, InvoiceError>>()?;

    let notes = command
      .notes
      .map(|n| n.trim().to_string())
      .filter(|n| !n.is_empty());

    self
      .invoice_service
      .create_invoice(InvoiceData {
        client_id: command.client_id,
        invoice_date: command.invoice_date,
        due_date: command.due_date,
        notes,
        line_items,
      })
      .await
  }
}
