use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dispatch::InvoiceDispatch;
use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus, RenderableInvoice};

#[derive(Debug, Clone)]
pub struct BulkSendInvoicesCommand {
  pub invoice_ids: Vec<Uuid>,
  pub custom_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendSuccess {
  pub invoice_id: Uuid,
  pub invoice_number: String,
  pub recipient: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendFailure {
  pub invoice_id: Uuid,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub invoice_number: Option<String>,
  pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BulkSendInvoicesResponse {
  pub successful: Vec<BulkSendSuccess>,
  pub failed: Vec<BulkSendFailure>,
}

pub struct BulkSendInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
  dispatch: Arc<InvoiceDispatch>,
}

impl BulkSendInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, dispatch: Arc<InvoiceDispatch>) -> Self {
    Self {
      invoice_service,
      dispatch,
    }
  }

  /// Sends every invoice to its client. One failure never stops the rest.
  pub async fn execute(&self, command: BulkSendInvoicesCommand) -> BulkSendInvoicesResponse {
    let today = Utc::now().date_naive();
    let mut response = BulkSendInvoicesResponse::default();

    for invoice_id in command.invoice_ids {
      let mut invoice_number = None;
      match self
        .send_one(invoice_id, &command.custom_message, today, &mut invoice_number)
        .await
      {
        Ok(success) => response.successful.push(success),
        Err(err) => {
          tracing::warn!(invoice_id = %invoice_id, error = %err, "Bulk send failed for invoice");
          response.failed.push(BulkSendFailure {
            invoice_id,
            invoice_number,
            error: err.to_string(),
          });
        }
      }
    }

    tracing::info!(
      successful = response.successful.len(),
      failed = response.failed.len(),
      "Bulk email sending completed"
    );
    response
  }

  async fn send_one(
    &self,
    invoice_id: Uuid,
    custom_message: &Option<String>,
    today: NaiveDate,
    invoice_number: &mut Option<String>,
  ) -> Result<BulkSendSuccess, InvoiceError> {
    let details = self.invoice_service.get_invoice_details(invoice_id).await?;
    *invoice_number = Some(details.invoice.invoice_number.to_string());

    let recipient = details
      .client
      .email
      .clone()
      .ok_or_else(|| InvoiceError::MissingRecipient("Client has no email address".to_string()))?;

    let renderable = RenderableInvoice::from(&details);
    self
      .dispatch
      .deliver(
        recipient.clone(),
        &renderable,
        None,
        custom_message.clone(),
        today,
      )
      .await?;

    if details.invoice.status == InvoiceStatus::Draft {
      self
        .invoice_service
        .change_invoice_status(invoice_id, InvoiceStatus::Sent)
        .await?;
    }

    Ok(BulkSendSuccess {
      invoice_id,
      invoice_number: renderable.invoice_number,
      recipient: recipient.to_string(),
    })
  }
}
