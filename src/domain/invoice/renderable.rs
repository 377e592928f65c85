use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::entities::{InvoiceDetails, InvoiceTotals};
use super::status::DisplayStatus;
use super::value_objects::{Money, TaxRate, ValueObjectError};

/// Everything the document renderer needs, detached from storage.
///
/// Totals are optional: when absent they are recomputed from the lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableInvoice {
  pub invoice_number: String,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub paid: bool,
  pub client: RenderableClient,
  pub lines: Vec<RenderableLine>,
  pub tax_rate: TaxRate,
  pub subtotal: Option<Money>,
  pub tax_amount: Option<Money>,
  pub total_amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderableClient {
  pub name: String,
  pub email: Option<String>,
  pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderableLine {
  pub description: Option<String>,
  pub service_name: Option<String>,
  pub quantity: Decimal,
  pub rate: Money,
  pub amount: Option<Money>,
}

impl RenderableLine {
  pub fn label(&self) -> &str {
    self
      .description
      .as_deref()
      .or(self.service_name.as_deref())
      .unwrap_or("Service")
  }

  pub fn effective_amount(&self) -> Result<Money, ValueObjectError> {
    match self.amount {
      Some(amount) => Ok(amount),
      None => self.rate.multiply(self.quantity),
    }
  }
}

impl RenderableInvoice {
  pub fn display_status(&self, today: NaiveDate) -> DisplayStatus {
    DisplayStatus::derive(self.paid, self.due_date, today)
  }

  /// Persisted totals where present, recomputed from the lines otherwise.
  pub fn resolved_totals(&self) -> Result<InvoiceTotals, ValueObjectError> {
    let subtotal = match self.subtotal {
      Some(subtotal) => subtotal,
      None => {
        let amounts = self
          .lines
          .iter()
          .map(RenderableLine::effective_amount)
          .collect::<Result<Vec<_>, _>>()?;
        InvoiceTotals::calculate(&amounts, self.tax_rate)?.subtotal
      }
    };
    let tax_amount = match self.tax_amount {
      Some(tax_amount) => tax_amount,
      None => subtotal.multiply(self.tax_rate.as_multiplier())?,
    };
    let total_amount = match self.total_amount {
      Some(total_amount) => total_amount,
      None => subtotal.add(&tax_amount)?,
    };

    Ok(InvoiceTotals {
      subtotal,
      tax_amount,
      total_amount,
    })
  }
}

impl From<&InvoiceDetails> for RenderableInvoice {
  fn from(details: &InvoiceDetails) -> Self {
    let invoice = &details.invoice;
    Self {
      invoice_number: invoice.invoice_number.to_string(),
      invoice_date: invoice.invoice_date,
      due_date: invoice.due_date,
      paid: invoice.is_paid(),
      client: RenderableClient {
        name: details.client.name.value().to_string(),
        email: details.client.email.as_ref().map(|e| e.to_string()),
        phone: details.client.phone.clone(),
      },
      lines: details
        .items
        .iter()
        .map(|line| RenderableLine {
          description: line.item.description.as_ref().map(|d| d.value().to_string()),
          service_name: Some(line.service_name.clone()),
          quantity: line.item.quantity.value(),
          rate: line.item.rate,
          amount: Some(line.item.amount),
        })
        .collect(),
      tax_rate: invoice.tax_rate,
      subtotal: Some(invoice.subtotal),
      tax_amount: Some(invoice.tax_amount),
      total_amount: Some(invoice.total_amount),
    }
  }
}

/// Download name for a rendered invoice, e.g. `invoice-INV-2026-0001.pdf`.
pub fn document_filename(invoice_number: &str, extension: &str) -> String {
  format!("invoice-{}.{}", invoice_number, extension)
}
