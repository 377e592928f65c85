use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(String),
  #[error("Invalid line item description: {0}")]
  InvalidDescription(String),
  #[error("Invalid client name: {0}")]
  InvalidClientName(String),
  #[error("Invalid service name: {0}")]
  InvalidServiceName(String),
  #[error("Invalid email address: {0}")]
  InvalidEmail(String),
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
}

// Invoice Status - persisted lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Draft,
  Sent,
  Overdue,
  Paid,
}

impl InvoiceStatus {
  /// Lifecycle transitions. Setting the current status again is accepted as a no-op.
  pub fn can_transition_to(&self, new_status: InvoiceStatus) -> bool {
    if *self == new_status {
      return true;
    }

    match (self, new_status) {
      (InvoiceStatus::Draft, InvoiceStatus::Sent) => true,
      (InvoiceStatus::Draft, InvoiceStatus::Overdue) => true,
      (InvoiceStatus::Sent, InvoiceStatus::Overdue) => true,
      (InvoiceStatus::Sent, InvoiceStatus::Paid) => true,
      (InvoiceStatus::Overdue, InvoiceStatus::Paid) => true,
      // Paid is terminal
      _ => false,
    }
  }

  pub fn is_paid(&self) -> bool {
    matches!(self, InvoiceStatus::Paid)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Draft => "draft",
      InvoiceStatus::Sent => "sent",
      InvoiceStatus::Overdue => "overdue",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "draft" => Ok(InvoiceStatus::Draft),
      "sent" => Ok(InvoiceStatus::Sent),
      "overdue" => Ok(InvoiceStatus::Overdue),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Money - single-currency amount, kept at full precision
// Exclusive upper bounds of the NUMERIC(12,2) rate and NUMERIC(12,4) quantity columns
const MAX_RATE: Decimal = dec!(10000000000);
const MAX_QUANTITY: Decimal = dec!(100000000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
  pub fn new(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() && !amount.is_zero() {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot be negative".to_string(),
      ));
    }
    Ok(Self(amount))
  }

  pub fn zero() -> Self {
    Self(Decimal::ZERO)
  }

  pub fn amount(&self) -> Decimal {
    self.0
  }

  pub fn add(&self, other: &Money) -> Result<Money, ValueObjectError> {
    self
      .0
      .checked_add(other.0)
      .map(Money)
      .ok_or_else(|| ValueObjectError::InvalidAmount("Amount is too large".to_string()))
  }

  pub fn multiply(&self, factor: Decimal) -> Result<Money, ValueObjectError> {
    self
      .0
      .checked_mul(factor)
      .map(Money)
      .ok_or_else(|| ValueObjectError::InvalidAmount("Amount is too large".to_string()))
  }

  /// Rates are stored as NUMERIC(12,2): cent precision, below 10^10.
  pub fn ensure_rate(&self) -> Result<(), ValueObjectError> {
    if self.0.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidAmount(
        "Rate cannot have more than 2 decimal places".to_string(),
      ));
    }
    if self.0 >= MAX_RATE {
      return Err(ValueObjectError::InvalidAmount(
        "Rate must be less than 10000000000".to_string(),
      ));
    }
    Ok(())
  }

  /// Two fractional digits, half away from zero. Only used at display or storage boundaries.
  pub fn rounded(&self) -> Decimal {
    self
      .0
      .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "${:.2}", self.rounded())
  }
}

// Quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be positive".to_string(),
      ));
    }
    let value = value.normalize();
    if value.scale() > 4 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity cannot have more than 4 decimal places".to_string(),
      ));
    }
    if value >= MAX_QUANTITY {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be less than 100000000".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

impl fmt::Display for Quantity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.normalize())
  }
}

// Tax Rate - percentage applied to the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate must be between 0 and 100".to_string(),
      ));
    }
    if value.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate cannot have more than 2 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  pub fn as_multiplier(&self) -> Decimal {
    self.0 / Decimal::ONE_HUNDRED
  }
}

impl fmt::Display for TaxRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.normalize())
  }
}

// Line Item Description - optional override of the service name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemDescription(String);

impl LineItemDescription {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 500 {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot exceed 500 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  /// Blank overrides are treated as absent.
  pub fn optional(value: Option<String>) -> Result<Option<Self>, ValueObjectError> {
    match value {
      Some(v) if !v.trim().is_empty() => Self::new(v).map(Some),
      _ => Ok(None),
    }
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Client Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientName(String);

impl ClientName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidClientName(
        "Client name cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidClientName(
        "Client name cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// Service Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidServiceName(
        "Service name cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidServiceName(
        "Service name cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// Email Address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let normalized = value.trim().to_lowercase();

    if !normalized.validate_email() {
      return Err(ValueObjectError::InvalidEmail(value));
    }

    Ok(Self(normalized))
  }

  /// Blank values are treated as absent.
  pub fn optional(value: Option<String>) -> Result<Option<Self>, ValueObjectError> {
    match value {
      Some(v) if !v.trim().is_empty() => Self::new(v).map(Some),
      _ => Ok(None),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for EmailAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
