use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::invoice::{
  ComposedMail, InvoiceError, InvoiceMailView, MailComposer, format_short_date,
};

const INVOICE_HTML: &str = "invoice.html";
const INVOICE_TEXT: &str = "invoice.txt";

#[derive(Serialize)]
struct MailContext<'a> {
  client_name: &'a str,
  invoice_number: &'a str,
  total_amount: String,
  due_date: String,
  custom_message: Option<&'a str>,
  company_name: &'a str,
}

/// Mail bodies compiled into the binary, rendered with tera.
#[derive(Clone)]
pub struct MailTemplates {
  tera: Tera,
  company_name: String,
}

impl MailTemplates {
  pub fn new(company_name: impl Into<String>) -> Result<Self, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
      (
        INVOICE_HTML,
        include_str!("../../../templates/email/invoice.html"),
      ),
      (INVOICE_TEXT, include_str!("../../../templates/email/invoice.txt")),
    ])?;

    Ok(Self {
      tera,
      company_name: company_name.into(),
    })
  }
}

impl MailComposer for MailTemplates {
  fn company_name(&self) -> &str {
    &self.company_name
  }

  fn compose(&self, view: &InvoiceMailView) -> Result<ComposedMail, InvoiceError> {
    let custom_message = view
      .custom_message
      .as_deref()
      .map(str::trim)
      .filter(|m| !m.is_empty());
    let context = MailContext {
      client_name: &view.client_name,
      invoice_number: &view.invoice_number,
      total_amount: view.total_amount.to_string(),
      due_date: format_short_date(view.due_date),
      custom_message,
      company_name: &self.company_name,
    };
    let context = Context::from_serialize(&context).map_err(template_error)?;

    let subject = view
      .subject
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .unwrap_or_else(|| {
        format!(
          "Invoice {} from {}",
          view.invoice_number, self.company_name
        )
      });

    Ok(ComposedMail {
      subject,
      html_body: self
        .tera
        .render(INVOICE_HTML, &context)
        .map_err(template_error)?,
      text_body: self
        .tera
        .render(INVOICE_TEXT, &context)
        .map_err(template_error)?,
    })
  }
}

fn template_error(err: tera::Error) -> InvoiceError {
  InvoiceError::Mail(format!("Failed to render mail template: {}", err))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::Money;
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;

  fn view() -> InvoiceMailView {
    InvoiceMailView {
      client_name: "Acme & Sons".to_string(),
      invoice_number: "INV-2026-0007".to_string(),
      total_amount: Money::new(dec!(236)).unwrap(),
      due_date: NaiveDate::from_ymd_opt(2026, 11, 5).unwrap(),
      subject: None,
      custom_message: None,
    }
  }

  #[test]
  fn test_default_invoice_mail() {
    let templates = MailTemplates::new("Northwind Studio").unwrap();
    let mail = templates.compose(&view()).unwrap();

    assert_eq!(mail.subject, "Invoice INV-2026-0007 from Northwind Studio");
    assert!(mail.html_body.contains("Acme &amp; Sons"));
    assert!(mail.html_body.contains("Please find your invoice"));
    assert!(mail.html_body.contains("$236.00"));
    assert!(mail.text_body.contains("Dear Acme & Sons,"));
    assert!(mail.text_body.contains("Due Date: 11/5/2026"));
    assert!(mail.text_body.contains("Northwind Studio"));
  }

  #[test]
  fn test_custom_message_and_subject() {
    let templates = MailTemplates::new("Northwind Studio").unwrap();
    let mut view = view();
    view.subject = Some("Payment Reminder: Invoice INV-2026-0007".to_string());
    view.custom_message = Some("URGENT: Your invoice INV-2026-0007 is overdue.".to_string());

    let mail = templates.compose(&view).unwrap();

    assert_eq!(mail.subject, "Payment Reminder: Invoice INV-2026-0007");
    assert!(mail.html_body.contains("URGENT: Your invoice INV-2026-0007 is overdue."));
    assert!(!mail.html_body.contains("Please find your invoice"));
    assert!(mail.text_body.starts_with("Dear Acme & Sons,"));
  }

  #[test]
  fn test_blank_overrides_are_ignored() {
    let templates = MailTemplates::new("Northwind Studio").unwrap();
    let mut view = view();
    view.subject = Some("   ".to_string());
    view.custom_message = Some("".to_string());

    let mail = templates.compose(&view).unwrap();

    assert!(mail.subject.starts_with("Invoice INV-2026-0007"));
    assert!(mail.text_body.contains("Please find your invoice INV-2026-0007 attached."));
  }
}
