use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::client_repository::{CLIENT_COLUMNS, ClientRow};
use super::service_repository::{SERVICE_COLUMNS, ServiceRow};
use crate::domain::invoice::{
  Client, Invoice, InvoiceLineItem, InvoiceTotals, Service, errors::InvoiceError,
  ports::InvoiceTransaction,
};

/// Wraps one sqlx transaction. Dropping it unfinished rolls back.
pub struct PostgresInvoiceTransaction {
  tx: Transaction<'static, Postgres>,
}

impl PostgresInvoiceTransaction {
  pub fn new(tx: Transaction<'static, Postgres>) -> Self {
    Self { tx }
  }
}

#[async_trait]
impl InvoiceTransaction for PostgresInvoiceTransaction {
  async fn find_client(&mut self, id: Uuid) -> Result<Option<Client>, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 FOR SHARE"
    ))
    .bind(id)
    .fetch_optional(&mut *self.tx)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_service(&mut self, id: Uuid) -> Result<Option<Service>, InvoiceError> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
      "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1 FOR SHARE"
    ))
    .bind(id)
    .fetch_optional(&mut *self.tx)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn next_invoice_sequence(&mut self, year: i32) -> Result<u32, InvoiceError> {
    // The upsert takes a row lock that is held until commit, so concurrent
    // creations in the same year queue up behind each other.
    let value = sqlx::query_scalar::<_, i32>(
      r#"
      INSERT INTO invoice_number_sequences (year, last_value)
      VALUES ($1, 1)
      ON CONFLICT (year)
      DO UPDATE SET last_value = invoice_number_sequences.last_value + 1
      RETURNING last_value
      "#,
    )
    .bind(year)
    .fetch_one(&mut *self.tx)
    .await?;

    u32::try_from(value)
      .map_err(|_| InvoiceError::Storage(format!("Invalid invoice sequence value {}", value)))
  }

  async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
      INSERT INTO invoices (
        id, invoice_number, client_id, invoice_date, due_date, notes,
        subtotal, tax_rate, tax_amount, total_amount, status, created_at, updated_at
      )
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
      "#,
    )
    .bind(invoice.id)
    .bind(invoice.invoice_number.value())
    .bind(invoice.client_id)
    .bind(invoice.invoice_date)
    .bind(invoice.due_date)
    .bind(&invoice.notes)
    .bind(invoice.subtotal.amount())
    .bind(invoice.tax_rate.value())
    .bind(invoice.tax_amount.amount())
    .bind(invoice.total_amount.amount())
    .bind(invoice.status.as_str())
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(&mut *self.tx)
    .await
    .map_err(|e| {
      if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
          return InvoiceError::InvoiceNumberAlreadyExists(invoice.invoice_number.value());
        }
      }
      InvoiceError::Database(e)
    })?;

    Ok(())
  }

  async fn insert_line_item(&mut self, item: &InvoiceLineItem) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
      INSERT INTO invoice_items (
        id, invoice_id, service_id, description, quantity, rate, amount, line_order
      )
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
      "#,
    )
    .bind(item.id)
    .bind(item.invoice_id)
    .bind(item.service_id)
    .bind(item.description.as_ref().map(|d| d.value()))
    .bind(item.quantity.value())
    .bind(item.rate.amount())
    .bind(item.amount.amount())
    .bind(item.line_order)
    .execute(&mut *self.tx)
    .await?;

    Ok(())
  }

  async fn update_invoice_totals(
    &mut self,
    invoice_id: Uuid,
    totals: &InvoiceTotals,
  ) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
      UPDATE invoices
      SET subtotal = $2, tax_amount = $3, total_amount = $4
      WHERE id = $1
      "#,
    )
    .bind(invoice_id)
    .bind(totals.subtotal.amount())
    .bind(totals.tax_amount.amount())
    .bind(totals.total_amount.amount())
    .execute(&mut *self.tx)
    .await?;

    Ok(())
  }

  async fn commit(self: Box<Self>) -> Result<(), InvoiceError> {
    self.tx.commit().await?;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<(), InvoiceError> {
    self.tx.rollback().await?;
    Ok(())
  }
}
