//! Application layer
//!
//! Use cases that turn caller input into validated domain calls. Each use
//! case owns one workflow and coordinates the invoice service with the
//! renderer and mailer where needed.

pub mod catalog;
pub mod client;
pub mod email;
pub mod invoice;

#[cfg(test)]
pub(crate) mod test_support {
  use async_trait::async_trait;
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;
  use std::sync::{Arc, Mutex};
  use uuid::Uuid;

  use super::email::InvoiceDispatch;
  use crate::domain::invoice::{
    Client, ClientData, ClientName, DeliveryReceipt, DocumentRenderer, EmailAddress, InvoiceData,
    InvoiceDetails, InvoiceError, InvoiceService, InvoiceServiceDependencies, LineItemRequest,
    Mailer, Money, OutgoingMail, Quantity, Service, ServiceData, ServiceName, TaxRate,
  };
  use crate::infrastructure::mail::MailTemplates;
  use crate::infrastructure::pdf::{Branding, PdfInvoiceRenderer};
  use crate::infrastructure::persistence::memory::InMemoryStore;

  /// Keeps every mail it is given, or refuses all of them.
  #[derive(Default)]
  pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: bool,
  }

  impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
      self.sent.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, InvoiceError> {
      if self.fail {
        return Err(InvoiceError::Mail("connection refused".to_string()));
      }
      let mut sent = self.sent.lock().unwrap();
      sent.push(mail);
      Ok(DeliveryReceipt {
        message_id: format!("<{}@test>", sent.len()),
      })
    }
  }

  pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub service: Arc<InvoiceService>,
    pub mailer: Arc<RecordingMailer>,
  }

  impl TestContext {
    pub fn new() -> Self {
      Self::with_mailer(RecordingMailer::default())
    }

    pub fn failing_mailer() -> Self {
      Self::with_mailer(RecordingMailer {
        sent: Mutex::new(Vec::new()),
        fail: true,
      })
    }

    fn with_mailer(mailer: RecordingMailer) -> Self {
      let store = Arc::new(InMemoryStore::new());
      let service = Arc::new(InvoiceService::new(
        InvoiceServiceDependencies {
          client_repo: store.clone(),
          service_repo: store.clone(),
          invoice_repo: store.clone(),
        },
        TaxRate::new(dec!(18)).unwrap(),
      ));
      Self {
        store,
        service,
        mailer: Arc::new(mailer),
      }
    }

    pub fn dispatch(&self) -> Arc<InvoiceDispatch> {
      Arc::new(InvoiceDispatch::new(
        renderer(),
        self.mailer.clone(),
        Arc::new(MailTemplates::new("Northwind Studio").unwrap()),
      ))
    }
  }

  pub fn invoice_service() -> Arc<InvoiceService> {
    TestContext::new().service
  }

  pub fn renderer() -> Arc<dyn DocumentRenderer> {
    Arc::new(PdfInvoiceRenderer::new(Branding::default()))
  }

  /// One client with an email address and one service at 100.00.
  pub async fn seed_catalog(service: &InvoiceService) -> (Client, Service) {
    let client = service
      .create_client(ClientData {
        name: ClientName::new("Acme Ltd".to_string()).unwrap(),
        email: Some(EmailAddress::new("billing@acme.test").unwrap()),
        phone: Some("+1 555 0100".to_string()),
        address: None,
      })
      .await
      .unwrap();
    let consulting = service
      .create_service(ServiceData {
        name: ServiceName::new("Consulting".to_string()).unwrap(),
        description: None,
        default_rate: Money::new(dec!(100.00)).unwrap(),
      })
      .await
      .unwrap();
    (client, consulting)
  }

  /// Two units of `service_id`, dated 10/1/2026 and due 10/31/2026.
  pub async fn create_invoice(
    service: &InvoiceService,
    client_id: Uuid,
    service_id: Uuid,
  ) -> InvoiceDetails {
    service
      .create_invoice(InvoiceData {
        client_id,
        invoice_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        notes: None,
        line_items: vec![LineItemRequest {
          service_id,
          quantity: Quantity::new(dec!(2)).unwrap(),
          rate: None,
          description: None,
        }],
      })
      .await
      .unwrap()
  }
}
