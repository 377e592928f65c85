mod canvas;
mod invoice_renderer;
mod metrics;

pub use invoice_renderer::{Branding, PdfInvoiceRenderer};
