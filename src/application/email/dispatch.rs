use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::invoice::{
  DeliveryReceipt, DocumentRenderer, EmailAddress, InvoiceError, InvoiceMailView, MailAttachment,
  MailComposer, Mailer, OutgoingMail, RenderableInvoice, document_filename,
};

/// Renders an invoice, composes the mail around it and hands it to the mailer.
pub struct InvoiceDispatch {
  renderer: Arc<dyn DocumentRenderer>,
  mailer: Arc<dyn Mailer>,
  composer: Arc<dyn MailComposer>,
}

impl InvoiceDispatch {
  pub fn new(
    renderer: Arc<dyn DocumentRenderer>,
    mailer: Arc<dyn Mailer>,
    composer: Arc<dyn MailComposer>,
  ) -> Self {
    Self {
      renderer,
      mailer,
      composer,
    }
  }

  pub fn company_name(&self) -> &str {
    self.composer.company_name()
  }

  pub async fn deliver(
    &self,
    to: EmailAddress,
    invoice: &RenderableInvoice,
    subject: Option<String>,
    custom_message: Option<String>,
    today: NaiveDate,
  ) -> Result<DeliveryReceipt, InvoiceError> {
    let bytes = self.renderer.render(invoice, today)?;
    let composed = self.composer.compose(&InvoiceMailView {
      client_name: invoice.client.name.clone(),
      invoice_number: invoice.invoice_number.clone(),
      total_amount: invoice.resolved_totals()?.total_amount,
      due_date: invoice.due_date,
      subject,
      custom_message,
    })?;

    self
      .mailer
      .send(OutgoingMail {
        to,
        subject: composed.subject,
        html_body: composed.html_body,
        text_body: composed.text_body,
        attachment: Some(MailAttachment {
          filename: document_filename(&invoice.invoice_number, self.renderer.file_extension()),
          content_type: self.renderer.content_type().to_string(),
          bytes,
        }),
      })
      .await
  }
}
