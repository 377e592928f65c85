use chrono::{NaiveDate, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{
  DocumentRenderer, InvoiceError, InvoiceService, RenderableInvoice, document_filename,
};

#[derive(Debug, Clone, Copy)]
pub struct DownloadInvoicePdfCommand {
  pub invoice_id: Uuid,
}

/// A rendered invoice ready to be streamed to the caller.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
  pub filename: String,
  pub content_type: &'static str,
  /// Hex SHA-256 of the bytes; equal documents share an ETag
  pub etag: String,
  pub bytes: Vec<u8>,
}

pub struct DownloadInvoicePdfUseCase {
  invoice_service: Arc<InvoiceService>,
  renderer: Arc<dyn DocumentRenderer>,
}

impl DownloadInvoicePdfUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, renderer: Arc<dyn DocumentRenderer>) -> Self {
    Self {
      invoice_service,
      renderer,
    }
  }

  pub async fn execute(
    &self,
    command: DownloadInvoicePdfCommand,
  ) -> Result<InvoiceDocument, InvoiceError> {
    self.execute_on(command, Utc::now().date_naive()).await
  }

  /// Renders as of `today`, which decides the status label printed on the document.
  pub async fn execute_on(
    &self,
    command: DownloadInvoicePdfCommand,
    today: NaiveDate,
  ) -> Result<InvoiceDocument, InvoiceError> {
    let details = self
      .invoice_service
      .get_invoice_details(command.invoice_id)
      .await?;
    let renderable = RenderableInvoice::from(&details);
    let bytes = self.renderer.render(&renderable, today)?;

    Ok(InvoiceDocument {
      filename: document_filename(&renderable.invoice_number, self.renderer.file_extension()),
      content_type: self.renderer.content_type(),
      etag: hex::encode(Sha256::digest(&bytes)),
      bytes,
    })
  }
}
