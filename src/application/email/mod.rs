//! Mail dispatch use cases. Every mail carries the rendered invoice as an
//! attachment.

pub mod bulk_send_invoices;
pub mod dispatch;
pub mod send_invoice_email;
pub mod send_payment_reminder;
pub mod send_test_email;

pub use bulk_send_invoices::{
  BulkSendFailure, BulkSendInvoicesCommand, BulkSendInvoicesResponse, BulkSendInvoicesUseCase,
  BulkSendSuccess,
};
pub use dispatch::InvoiceDispatch;
pub use send_invoice_email::{
  SendInvoiceEmailCommand, SendInvoiceEmailResponse, SendInvoiceEmailUseCase,
};
pub use send_payment_reminder::{
  SendPaymentReminderCommand, SendPaymentReminderResponse, SendPaymentReminderUseCase,
};
pub use send_test_email::{SendTestEmailCommand, SendTestEmailResponse, SendTestEmailUseCase};
