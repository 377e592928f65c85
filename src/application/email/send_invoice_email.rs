use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dispatch::InvoiceDispatch;
use crate::domain::invoice::{
  EmailAddress, InvoiceError, InvoiceService, InvoiceStatus, RenderableInvoice,
};

#[derive(Debug, Clone, Default)]
pub struct SendInvoiceEmailCommand {
  pub invoice_id: Uuid,
  /// Recipient override; the client's address is used when absent
  pub email: Option<String>,
  pub subject: Option<String>,
  pub custom_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceEmailResponse {
  pub message_id: String,
  pub recipient: String,
  pub invoice_number: String,
  pub status: InvoiceStatus,
}

pub struct SendInvoiceEmailUseCase {
  invoice_service: Arc<InvoiceService>,
  dispatch: Arc<InvoiceDispatch>,
}

impl SendInvoiceEmailUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, dispatch: Arc<InvoiceDispatch>) -> Self {
    Self {
      invoice_service,
      dispatch,
    }
  }

  pub async fn execute(
    &self,
    command: SendInvoiceEmailCommand,
  ) -> Result<SendInvoiceEmailResponse, InvoiceError> {
    self.execute_on(command, Utc::now().date_naive()).await
  }

  pub async fn execute_on(
    &self,
    command: SendInvoiceEmailCommand,
    today: NaiveDate,
  ) -> Result<SendInvoiceEmailResponse, InvoiceError> {
    let details = self
      .invoice_service
      .get_invoice_details(command.invoice_id)
      .await?;

    let recipient = match command.email.filter(|e| !e.trim().is_empty()) {
      Some(email) => EmailAddress::new(email)?,
      None => details.client.email.clone().ok_or_else(|| {
        InvoiceError::MissingRecipient(
          "No email address provided and client has no email on record".to_string(),
        )
      })?,
    };

    let renderable = RenderableInvoice::from(&details);
    let receipt = self
      .dispatch
      .deliver(
        recipient.clone(),
        &renderable,
        command.subject,
        command.custom_message,
        today,
      )
      .await?;

    // Status only moves once the mail has been accepted.
    let mut status = details.invoice.status;
    if status == InvoiceStatus::Draft {
      status = self
        .invoice_service
        .change_invoice_status(details.invoice.id, InvoiceStatus::Sent)
        .await?
        .status;
    }

    tracing::info!(
      invoice_number = %renderable.invoice_number,
      recipient = %recipient,
      message_id = %receipt.message_id,
      "Invoice emailed"
    );

    Ok(SendInvoiceEmailResponse {
      message_id: receipt.message_id,
      recipient: recipient.to_string(),
      invoice_number: renderable.invoice_number,
      status,
    })
  }
}
