use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::invoice::{DeliveryReceipt, InvoiceError, Mailer, OutgoingMail};

/// Mailer used when SMTP is disabled: records the mail in the log and drops it.
pub struct LoggingMailer;

impl LoggingMailer {
  pub fn new() -> Self {
    Self
  }
}

impl Default for LoggingMailer {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Mailer for LoggingMailer {
  async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, InvoiceError> {
    let message_id = format!("<{}@localhost>", Uuid::new_v4());
    tracing::info!(
      recipient = %mail.to,
      subject = %mail.subject,
      attachment = mail.attachment.as_ref().map(|a| a.filename.as_str()).unwrap_or("-"),
      message_id = %message_id,
      "Mail delivery disabled, skipping SMTP"
    );
    Ok(DeliveryReceipt { message_id })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::EmailAddress;

  #[tokio::test]
  async fn test_returns_receipt() {
    let receipt = LoggingMailer::new()
      .send(OutgoingMail {
        to: EmailAddress::new("client@acme.test").unwrap(),
        subject: "Test".to_string(),
        html_body: String::new(),
        text_body: String::new(),
        attachment: None,
      })
      .await
      .unwrap();

    assert!(receipt.message_id.ends_with("@localhost>"));
  }
}
