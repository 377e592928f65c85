use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::InvoiceError;
use super::numbering::InvoiceNumber;
use super::value_objects::{
  ClientName, EmailAddress, InvoiceStatus, LineItemDescription, Money, Quantity, ServiceName,
  TaxRate, ValueObjectError,
};

// Client - billed party, referenced by invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id: Uuid,
  pub name: ClientName,
  pub email: Option<EmailAddress>,
  pub phone: Option<String>,
  pub address: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Client {
  pub fn new(
    name: ClientName,
    email: Option<EmailAddress>,
    phone: Option<String>,
    address: Option<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      phone: non_blank(phone),
      address: non_blank(address),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update(
    &mut self,
    name: ClientName,
    email: Option<EmailAddress>,
    phone: Option<String>,
    address: Option<String>,
  ) {
    self.name = name;
    self.email = email;
    self.phone = non_blank(phone);
    self.address = non_blank(address);
    self.updated_at = Utc::now();
  }
}

// Service - rate template for line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
  pub id: Uuid,
  pub name: ServiceName,
  pub description: Option<String>,
  pub default_rate: Money,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Service {
  pub fn new(
    name: ServiceName,
    description: Option<String>,
    default_rate: Money,
  ) -> Result<Self, ValueObjectError> {
    default_rate.ensure_rate()?;
    let now = Utc::now();
    Ok(Self {
      id: Uuid::new_v4(),
      name,
      description: non_blank(description),
      default_rate,
      created_at: now,
      updated_at: now,
    })
  }

  pub fn update(
    &mut self,
    name: ServiceName,
    description: Option<String>,
    default_rate: Money,
  ) -> Result<(), ValueObjectError> {
    default_rate.ensure_rate()?;
    self.name = name;
    self.description = non_blank(description);
    self.default_rate = default_rate;
    self.updated_at = Utc::now();
    Ok(())
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

// Invoice - header of a finalized invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub invoice_number: InvoiceNumber,
  pub client_id: Uuid,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub notes: Option<String>,
  pub subtotal: Money,
  pub tax_rate: TaxRate,
  pub tax_amount: Money,
  pub total_amount: Money,
  pub status: InvoiceStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Invoice {
  /// New invoices are issued directly in the `sent` state with zero totals;
  /// totals are filled in once every line has been resolved.
  pub fn new(
    invoice_number: InvoiceNumber,
    client_id: Uuid,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    notes: Option<String>,
    tax_rate: TaxRate,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      invoice_number,
      client_id,
      invoice_date,
      due_date,
      notes: non_blank(notes),
      subtotal: Money::zero(),
      tax_rate,
      tax_amount: Money::zero(),
      total_amount: Money::zero(),
      status: InvoiceStatus::Sent,
      created_at,
      updated_at: created_at,
    }
  }

  pub fn apply_totals(&mut self, totals: &InvoiceTotals) {
    self.subtotal = totals.subtotal;
    self.tax_amount = totals.tax_amount;
    self.total_amount = totals.total_amount;
  }

  /// Returns `Ok(false)` when the invoice already has `new_status`.
  pub fn change_status(&mut self, new_status: InvoiceStatus) -> Result<bool, InvoiceError> {
    if !self.status.can_transition_to(new_status) {
      return Err(InvoiceError::InvalidStatusTransition {
        from: self.status,
        to: new_status,
      });
    }
    if self.status == new_status {
      return Ok(false);
    }

    self.status = new_status;
    self.updated_at = Utc::now();
    Ok(true)
  }

  pub fn is_paid(&self) -> bool {
    self.status.is_paid()
  }

  pub fn is_past_due(&self, today: NaiveDate) -> bool {
    !self.is_paid() && self.due_date < today
  }
}

// Invoice Line Item - immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub service_id: Uuid,
  pub description: Option<LineItemDescription>,
  pub quantity: Quantity,
  pub rate: Money,
  pub amount: Money,
  pub line_order: i32,
}

impl InvoiceLineItem {
  pub fn new(
    invoice_id: Uuid,
    service_id: Uuid,
    description: Option<LineItemDescription>,
    quantity: Quantity,
    rate: Money,
    line_order: i32,
  ) -> Result<Self, ValueObjectError> {
    Ok(Self {
      id: Uuid::new_v4(),
      invoice_id,
      service_id,
      description,
      quantity,
      rate,
      amount: rate.multiply(quantity.value())?,
      line_order,
    })
  }
}

// Invoice Totals - exact decimal aggregates over the line amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub subtotal: Money,
  pub tax_amount: Money,
  pub total_amount: Money,
}

impl InvoiceTotals {
  pub fn calculate<'a>(
    amounts: impl IntoIterator<Item = &'a Money>,
    tax_rate: TaxRate,
  ) -> Result<Self, ValueObjectError> {
    let subtotal = amounts
      .into_iter()
      .try_fold(Money::zero(), |acc, amount| acc.add(amount))?;
    let tax_amount = subtotal.multiply(tax_rate.as_multiplier())?;
    let total_amount = subtotal.add(&tax_amount)?;

    Ok(Self {
      subtotal,
      tax_amount,
      total_amount,
    })
  }

  pub fn total_rounded(&self) -> Decimal {
    self.total_amount.rounded()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItemDetails {
  #[serde(flatten)]
  pub item: InvoiceLineItem,
  pub service_name: String,
}

impl InvoiceItemDetails {
  /// Override text if present, otherwise the referenced service's name.
  pub fn display_description(&self) -> &str {
    self
      .item
      .description
      .as_ref()
      .map(|d| d.value())
      .unwrap_or(&self.service_name)
  }
}

/// A materialized invoice: header, billed client and ordered line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDetails {
  #[serde(flatten)]
  pub invoice: Invoice,
  pub client: Client,
  pub items: Vec<InvoiceItemDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
  #[serde(flatten)]
  pub invoice: Invoice,
  pub client_name: String,
  pub client_email: Option<EmailAddress>,
}
