use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::dispatch::InvoiceDispatch;
use crate::domain::invoice::{
  InvoiceError, InvoiceService, InvoiceStatus, RenderableInvoice, ReminderTier, reminder_copy,
};

#[derive(Debug, Clone, Default)]
pub struct SendPaymentReminderCommand {
  pub invoice_id: Uuid,
  /// gentle, urgent or final; anything else is treated as gentle
  pub reminder_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPaymentReminderResponse {
  pub message_id: String,
  pub recipient: String,
  pub invoice_number: String,
  pub reminder_type: ReminderTier,
  pub invoice_status: InvoiceStatus,
}

pub struct SendPaymentReminderUseCase {
  invoice_service: Arc<InvoiceService>,
  dispatch: Arc<InvoiceDispatch>,
}

impl SendPaymentReminderUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, dispatch: Arc<InvoiceDispatch>) -> Self {
    Self {
      invoice_service,
      dispatch,
    }
  }

  pub async fn execute(
    &self,
    command: SendPaymentReminderCommand,
  ) -> Result<SendPaymentReminderResponse, InvoiceError> {
    self.execute_on(command, Utc::now().date_naive()).await
  }

  /// Past-due invoices that are neither overdue nor paid are marked overdue
  /// after the reminder goes out.
  pub async fn execute_on(
    &self,
    command: SendPaymentReminderCommand,
    today: NaiveDate,
  ) -> Result<SendPaymentReminderResponse, InvoiceError> {
    let tier = ReminderTier::parse_lenient(command.reminder_type.as_deref());
    let details = self
      .invoice_service
      .get_invoice_details(command.invoice_id)
      .await?;

    let recipient = details
      .client
      .email
      .clone()
      .ok_or_else(|| InvoiceError::MissingRecipient("Client has no email address".to_string()))?;

    let renderable = RenderableInvoice::from(&details);
    let message = reminder_copy(tier, &renderable.invoice_number, renderable.due_date);
    let subject = format!("Payment Reminder: Invoice {}", renderable.invoice_number);

    let receipt = self
      .dispatch
      .deliver(
        recipient.clone(),
        &renderable,
        Some(subject),
        Some(message),
        today,
      )
      .await?;

    let invoice = &details.invoice;
    let mut status = invoice.status;
    if invoice.is_past_due(today)
      && !matches!(status, InvoiceStatus::Overdue | InvoiceStatus::Paid)
    {
      status = self
        .invoice_service
        .change_invoice_status(invoice.id, InvoiceStatus::Overdue)
        .await?
        .status;
    }

    tracing::info!(
      invoice_number = %renderable.invoice_number,
      tier = tier.as_str(),
      status = %status,
      "Payment reminder sent"
    );

    Ok(SendPaymentReminderResponse {
      message_id: receipt.message_id,
      recipient: recipient.to_string(),
      invoice_number: renderable.invoice_number,
      reminder_type: tier,
      invoice_status: status,
    })
  }
}
