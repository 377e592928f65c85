use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::entities::{
  Client, Invoice, InvoiceDetails, InvoiceLineItem, InvoiceSummary, InvoiceTotals, Service,
};
use super::errors::InvoiceError;
use super::renderable::RenderableInvoice;
use super::value_objects::{EmailAddress, Money};

#[async_trait]
pub trait ClientRepository: Send + Sync {
  async fn create(&self, client: Client) -> Result<Client, InvoiceError>;
  async fn update(&self, client: Client) -> Result<Client, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, InvoiceError>;
  async fn list(&self) -> Result<Vec<Client>, InvoiceError>;
  /// `Ok(false)` when no such client exists; `ReferencedRecord` when invoices still point at it.
  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
  async fn create(&self, service: Service) -> Result<Service, InvoiceError>;
  async fn update(&self, service: Service) -> Result<Service, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, InvoiceError>;
  async fn list(&self) -> Result<Vec<Service>, InvoiceError>;
  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Opens the unit of work used for invoice creation.
  async fn begin(&self) -> Result<Box<dyn InvoiceTransaction>, InvoiceError>;
  async fn find_details(&self, id: Uuid) -> Result<Option<InvoiceDetails>, InvoiceError>;
  /// Newest first.
  async fn list(&self) -> Result<Vec<InvoiceSummary>, InvoiceError>;
  async fn update_status(&self, invoice: &Invoice) -> Result<(), InvoiceError>;
  /// Removes the invoice and its line items together.
  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError>;
}

/// A storage transaction. Dropping it without `commit` discards every write.
#[async_trait]
pub trait InvoiceTransaction: Send {
  async fn find_client(&mut self, id: Uuid) -> Result<Option<Client>, InvoiceError>;
  async fn find_service(&mut self, id: Uuid) -> Result<Option<Service>, InvoiceError>;
  /// Advances and returns the per-year counter, starting at 1.
  async fn next_invoice_sequence(&mut self, year: i32) -> Result<u32, InvoiceError>;
  async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError>;
  async fn insert_line_item(&mut self, item: &InvoiceLineItem) -> Result<(), InvoiceError>;
  async fn update_invoice_totals(
    &mut self,
    invoice_id: Uuid,
    totals: &InvoiceTotals,
  ) -> Result<(), InvoiceError>;
  async fn commit(self: Box<Self>) -> Result<(), InvoiceError>;
  async fn rollback(self: Box<Self>) -> Result<(), InvoiceError>;
}

pub trait DocumentRenderer: Send + Sync {
  fn render(&self, invoice: &RenderableInvoice, today: NaiveDate) -> Result<Vec<u8>, InvoiceError>;
  fn content_type(&self) -> &'static str;
  fn file_extension(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct MailAttachment {
  pub filename: String,
  pub content_type: String,
  pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingMail {
  pub to: EmailAddress,
  pub subject: String,
  pub html_body: String,
  pub text_body: String,
  pub attachment: Option<MailAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
  pub message_id: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, mail: OutgoingMail) -> Result<DeliveryReceipt, InvoiceError>;
}

/// What an invoice mail says about the invoice it carries.
#[derive(Debug, Clone)]
pub struct InvoiceMailView {
  pub client_name: String,
  pub invoice_number: String,
  pub total_amount: Money,
  pub due_date: NaiveDate,
  pub subject: Option<String>,
  pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMail {
  pub subject: String,
  pub html_body: String,
  pub text_body: String,
}

/// Turns an invoice view into subject and bodies, signed with the company name.
pub trait MailComposer: Send + Sync {
  fn company_name(&self) -> &str;
  fn compose(&self, view: &InvoiceMailView) -> Result<ComposedMail, InvoiceError>;
}
