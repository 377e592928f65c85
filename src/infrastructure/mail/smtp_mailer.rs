use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::invoice::{DeliveryReceipt, InvoiceError, Mailer, OutgoingMail};
use crate::infrastructure::config::MailConfig;

/// Delivers mail through an SMTP relay.
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
  message_domain: String,
}

impl SmtpMailer {
  pub fn new(config: &MailConfig) -> Result<Self, InvoiceError> {
    if config.host.is_empty() {
      return Err(InvoiceError::Mail("mail.host is not configured".to_string()));
    }

    let from_name = config
      .from_name
      .as_deref()
      .or(config.company_name.as_deref())
      .unwrap_or("Invoice System");
    let from: Mailbox = format!("{} <{}>", from_name, config.from_email)
      .parse()
      .map_err(|e| InvoiceError::Mail(format!("Invalid from address: {}", e)))?;
    let message_domain = from.email.domain().to_string();

    let mut builder = if config.starttls.unwrap_or(true) {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        .map_err(|e| InvoiceError::Mail(format!("Failed to create SMTP relay: {}", e)))?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
    };

    if let Some(port) = config.port {
      builder = builder.port(port);
    }
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
      builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }
    let transport = builder
      .timeout(Some(Duration::from_secs(config.timeout_seconds)))
      .build();

    tracing::info!(host = %config.host, port = ?config.port, "SMTP mailer configured");

    Ok(Self {
      transport,
      from,
      message_domain,
    })
  }

  fn build_message(&self, mail: OutgoingMail, message_id: &str) -> Result<Message, InvoiceError> {
    let to: Mailbox = mail
      .to
      .as_str()
      .parse()
      .map_err(|e| InvoiceError::Mail(format!("Invalid recipient: {}", e)))?;

    let builder = Message::builder()
      .from(self.from.clone())
      .to(to)
      .subject(mail.subject)
      .message_id(Some(message_id.to_string()));

    let alternative = MultiPart::alternative()
      .singlepart(SinglePart::plain(mail.text_body))
      .singlepart(SinglePart::html(mail.html_body));

    let message = match mail.attachment {
      Some(attachment) => {
        let content_type = ContentType::parse(&attachment.content_type)
          .map_err(|e| InvoiceError::Mail(format!("Invalid attachment type: {}", e)))?;
        builder.multipart(
          MultiPart::mixed()
            .multipart(alternative)
            .singlepart(Attachment::new(attachment.filename).body(attachment.bytes, content_type)),
        )
      }
      None => builder.multipart(alternative),
    };

    message.map_err(|e| InvoiceError::Mail(format!("Failed to build message: {}", e)))
  }
}

#[async_trait]
impl Mailer for SmtpMailer {
  async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, InvoiceError> {
    let message_id = format!("<{}@{}>", Uuid::new_v4(), self.message_domain);
    let recipient = mail.to.clone();
    let message = self.build_message(mail, &message_id)?;

    self.transport.send(message).await.map_err(|e| {
      tracing::error!(recipient = %recipient, error = %e, "SMTP delivery failed");
      InvoiceError::Mail(format!("Email sending failed: {}", e))
    })?;

    tracing::info!(recipient = %recipient, message_id = %message_id, "Email sent");
    Ok(DeliveryReceipt { message_id })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{EmailAddress, MailAttachment};

  fn config() -> MailConfig {
    MailConfig {
      enabled: true,
      host: "smtp.example.com".to_string(),
      port: Some(587),
      username: Some("billing".to_string()),
      password: Some("secret".to_string()),
      starttls: Some(true),
      from_email: "billing@example.com".to_string(),
      from_name: None,
      company_name: Some("Northwind Studio".to_string()),
      timeout_seconds: 5,
    }
  }

  fn mail(attachment: Option<MailAttachment>) -> OutgoingMail {
    OutgoingMail {
      to: EmailAddress::new("client@acme.test").unwrap(),
      subject: "Invoice INV-2026-0001".to_string(),
      html_body: "<p>Hello</p>".to_string(),
      text_body: "Hello".to_string(),
      attachment,
    }
  }

  #[tokio::test]
  async fn test_message_carries_attachment() {
    let mailer = SmtpMailer::new(&config()).unwrap();
    let attachment = MailAttachment {
      filename: "invoice-INV-2026-0001.pdf".to_string(),
      content_type: "application/pdf".to_string(),
      bytes: b"%PDF-1.4".to_vec(),
    };

    let message = mailer
      .build_message(mail(Some(attachment)), "<id@example.com>")
      .unwrap();
    let raw = String::from_utf8_lossy(&message.formatted()).to_string();

    assert!(raw.contains("From: \"Northwind Studio\" <billing@example.com>") || raw.contains("From: Northwind Studio <billing@example.com>"));
    assert!(raw.contains("Message-ID: <id@example.com>"));
    assert!(raw.contains("multipart/mixed"));
    assert!(raw.contains("application/pdf"));
    assert!(raw.contains("invoice-INV-2026-0001.pdf"));
  }

  #[tokio::test]
  async fn test_invalid_from_address_is_rejected() {
    let mut config = config();
    config.from_email = "not an address".to_string();
    assert!(matches!(SmtpMailer::new(&config), Err(InvoiceError::Mail(_))));
  }

  #[tokio::test]
  async fn test_missing_host_is_rejected() {
    let mut config = config();
    config.host = String::new();
    assert!(matches!(SmtpMailer::new(&config), Err(InvoiceError::Mail(_))));
  }
}
