use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use super::dispatch::InvoiceDispatch;
use crate::domain::invoice::{
  EmailAddress, InvoiceError, Money, RenderableClient, RenderableInvoice, RenderableLine, TaxRate,
};

#[derive(Debug, Clone)]
pub struct SendTestEmailCommand {
  pub test_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTestEmailResponse {
  pub message_id: String,
  pub recipient: String,
}

/// Sends a made-up invoice to check the mail setup end to end. Nothing is stored.
pub struct SendTestEmailUseCase {
  dispatch: Arc<InvoiceDispatch>,
  tax_rate: TaxRate,
}

impl SendTestEmailUseCase {
  pub fn new(dispatch: Arc<InvoiceDispatch>, tax_rate: TaxRate) -> Self {
    Self { dispatch, tax_rate }
  }

  pub async fn execute(
    &self,
    command: SendTestEmailCommand,
  ) -> Result<SendTestEmailResponse, InvoiceError> {
    self.execute_on(command, Utc::now().date_naive()).await
  }

  pub async fn execute_on(
    &self,
    command: SendTestEmailCommand,
    today: NaiveDate,
  ) -> Result<SendTestEmailResponse, InvoiceError> {
    let recipient = EmailAddress::new(command.test_email)?;
    let invoice = sample_invoice(&recipient, today, self.tax_rate)?;
    let subject = format!("Test Email - {}", self.dispatch.company_name());

    let receipt = self
      .dispatch
      .deliver(
        recipient.clone(),
        &invoice,
        Some(subject),
        Some(
          "This is a test email to verify your email configuration is working correctly."
            .to_string(),
        ),
        today,
      )
      .await?;

    tracing::info!(recipient = %recipient, "Test email sent");
    Ok(SendTestEmailResponse {
      message_id: receipt.message_id,
      recipient: recipient.to_string(),
    })
  }
}

fn sample_invoice(
  recipient: &EmailAddress,
  today: NaiveDate,
  tax_rate: TaxRate,
) -> Result<RenderableInvoice, InvoiceError> {
  Ok(RenderableInvoice {
    invoice_number: "TEST-001".to_string(),
    invoice_date: today,
    due_date: today.checked_add_days(Days::new(7)).unwrap_or(today),
    paid: false,
    client: RenderableClient {
      name: "Test Client".to_string(),
      email: Some(recipient.to_string()),
      phone: None,
    },
    lines: vec![RenderableLine {
      description: Some("This is a test email".to_string()),
      service_name: Some("Test Service".to_string()),
      quantity: Decimal::ONE,
      rate: Money::new(Decimal::ONE_HUNDRED)?,
      amount: None,
    }],
    tax_rate,
    subtotal: None,
    tax_amount: None,
    total_amount: None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::test_support::TestContext;
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_sends_sample_invoice() {
    let ctx = TestContext::new();
    let use_case = SendTestEmailUseCase::new(ctx.dispatch(), TaxRate::new(dec!(18)).unwrap());

    let response = use_case
      .execute_on(
        SendTestEmailCommand {
          test_email: "ops@example.com".to_string(),
        },
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.recipient, "ops@example.com");
    let sent = ctx.mailer.sent();
    assert_eq!(sent[0].subject, "Test Email - Northwind Studio");
    assert!(sent[0].text_body.contains("Amount Due: $118.00"));
    assert!(sent[0].text_body.contains("Due Date: 10/24/2026"));
    assert_eq!(
      sent[0].attachment.as_ref().unwrap().filename,
      "invoice-TEST-001.pdf"
    );
  }

  #[tokio::test]
  async fn test_rejects_invalid_address() {
    let ctx = TestContext::new();
    let use_case = SendTestEmailUseCase::new(ctx.dispatch(), TaxRate::new(dec!(18)).unwrap());

    let result = use_case
      .execute(SendTestEmailCommand {
        test_email: "nope".to_string(),
      })
      .await;

    assert!(matches!(result, Err(InvoiceError::Validation(_))));
    assert!(ctx.mailer.sent().is_empty());
  }
}
