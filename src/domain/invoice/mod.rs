pub mod entities;
pub mod errors;
pub mod numbering;
pub mod ports;
pub mod renderable;
pub mod services;
pub mod status;
pub mod value_objects;

pub use entities::{
  Client, Invoice, InvoiceDetails, InvoiceItemDetails, InvoiceLineItem, InvoiceSummary,
  InvoiceTotals, Service,
};
pub use errors::{ErrorKind, InvoiceError};
pub use numbering::{InvoiceNumber, next_invoice_number};
pub use ports::{
  ClientRepository, ComposedMail, DeliveryReceipt, DocumentRenderer, InvoiceMailView,
  InvoiceRepository, InvoiceTransaction, MailAttachment, MailComposer, Mailer, OutgoingMail,
  ServiceRepository,
};
pub use renderable::{RenderableClient, RenderableInvoice, RenderableLine, document_filename};
pub use services::{
  ClientData, InvoiceData, InvoiceService, InvoiceServiceDependencies, LineItemRequest,
  ResolvedLine, ServiceData, resolve_line,
};
pub use status::{DisplayStatus, ReminderTier, format_short_date, reminder_copy};
pub use value_objects::{
  ClientName, EmailAddress, InvoiceStatus, LineItemDescription, Money, Quantity, ServiceName,
  TaxRate, ValueObjectError,
};
