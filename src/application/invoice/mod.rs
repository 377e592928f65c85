pub mod change_invoice_status;
pub mod create_invoice;
pub mod delete_invoice;
pub mod download_invoice_pdf;
pub mod get_invoice_details;
pub mod list_invoices;

pub use change_invoice_status::{
  ChangeInvoiceStatusCommand, ChangeInvoiceStatusResponse, ChangeInvoiceStatusUseCase,
};
pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceLineItemDto, CreateInvoiceUseCase};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceUseCase};
pub use download_invoice_pdf::{
  DownloadInvoicePdfCommand, DownloadInvoicePdfUseCase, InvoiceDocument,
};
pub use get_invoice_details::{GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase};
pub use list_invoices::ListInvoicesUseCase;
