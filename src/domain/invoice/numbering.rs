//! Invoice numbering.
//!
//! Numbers have the shape `INV-<year>-<seq>` where `seq` is a per-year counter
//! zero-padded to four digits. The counter lives in storage and is advanced
//! inside the same transaction that inserts the invoice, so a rolled back
//! creation gives its number back and a deleted invoice never does.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::InvoiceError;
use super::ports::InvoiceTransaction;
use super::value_objects::ValueObjectError;

pub const INVOICE_NUMBER_PREFIX: &str = "INV";

lazy_static! {
  static ref INVOICE_NUMBER_PATTERN: Regex =
    Regex::new(r"^INV-(\d{4})-(\d{4,})$").expect("invoice number pattern is valid");
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber {
  year: i32,
  sequence: u32,
}

impl InvoiceNumber {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let captures = INVOICE_NUMBER_PATTERN
      .captures(value.trim())
      .ok_or_else(|| {
        ValueObjectError::InvalidInvoiceNumber(format!(
          "'{}' does not match {}-<year>-<sequence>",
          value, INVOICE_NUMBER_PREFIX
        ))
      })?;

    let year = captures[1]
      .parse::<i32>()
      .map_err(|_| ValueObjectError::InvalidInvoiceNumber(value.clone()))?;
    let sequence = captures[2]
      .parse::<u32>()
      .map_err(|_| ValueObjectError::InvalidInvoiceNumber(value.clone()))?;

    Self::from_sequence(year, sequence)
  }

  pub fn from_sequence(year: i32, sequence: u32) -> Result<Self, ValueObjectError> {
    if !(1000..=9999).contains(&year) {
      return Err(ValueObjectError::InvalidInvoiceNumber(format!(
        "Year {} is out of range",
        year
      )));
    }
    if sequence == 0 {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Sequence starts at 1".to_string(),
      ));
    }
    Ok(Self { year, sequence })
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn sequence(&self) -> u32 {
    self.sequence
  }

  pub fn value(&self) -> String {
    self.to_string()
  }
}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}-{}-{:04}",
      INVOICE_NUMBER_PREFIX, self.year, self.sequence
    )
  }
}

impl TryFrom<String> for InvoiceNumber {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<InvoiceNumber> for String {
  fn from(number: InvoiceNumber) -> Self {
    number.to_string()
  }
}

/// Claims the next invoice number for `year` within the caller's transaction.
pub async fn next_invoice_number(
  tx: &mut dyn InvoiceTransaction,
  year: i32,
) -> Result<InvoiceNumber, InvoiceError> {
  let sequence = tx.next_invoice_sequence(year).await?;
  let number = InvoiceNumber::from_sequence(year, sequence)?;
  tracing::debug!(invoice_number = %number, "Assigned invoice number");
  Ok(number)
}
