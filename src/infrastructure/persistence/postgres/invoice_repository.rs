use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use super::client_repository::{CLIENT_COLUMNS, ClientRow};
use super::invoice_transaction::PostgresInvoiceTransaction;
use crate::domain::invoice::{
  Client, EmailAddress, Invoice, InvoiceDetails, InvoiceItemDetails, InvoiceLineItem, InvoiceNumber,
  InvoiceStatus, InvoiceSummary, LineItemDescription, Money, Quantity, TaxRate,
  errors::InvoiceError,
  ports::{InvoiceRepository, InvoiceTransaction},
};

#[derive(Debug, FromRow)]
pub(crate) struct InvoiceRow {
  id: Uuid,
  invoice_number: String,
  client_id: Uuid,
  invoice_date: NaiveDate,
  due_date: NaiveDate,
  notes: Option<String>,
  subtotal: Decimal,
  tax_rate: Decimal,
  tax_amount: Decimal,
  total_amount: Decimal,
  status: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    Ok(Invoice {
      id: row.id,
      invoice_number: InvoiceNumber::new(row.invoice_number)?,
      client_id: row.client_id,
      invoice_date: row.invoice_date,
      due_date: row.due_date,
      notes: row.notes,
      subtotal: Money::new(row.subtotal)?,
      tax_rate: TaxRate::new(row.tax_rate.normalize())?,
      tax_amount: Money::new(row.tax_amount)?,
      total_amount: Money::new(row.total_amount)?,
      status: InvoiceStatus::from_str(&row.status)?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceSummaryRow {
  #[sqlx(flatten)]
  invoice: InvoiceRow,
  client_name: String,
  client_email: Option<String>,
}

impl TryFrom<InvoiceSummaryRow> for InvoiceSummary {
  type Error = InvoiceError;

  fn try_from(row: InvoiceSummaryRow) -> Result<Self, Self::Error> {
    Ok(InvoiceSummary {
      invoice: row.invoice.try_into()?,
      client_name: row.client_name,
      client_email: EmailAddress::optional(row.client_email)?,
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceItemRow {
  id: Uuid,
  invoice_id: Uuid,
  service_id: Uuid,
  description: Option<String>,
  quantity: Decimal,
  rate: Decimal,
  amount: Decimal,
  line_order: i32,
  service_name: String,
}

impl TryFrom<InvoiceItemRow> for InvoiceItemDetails {
  type Error = InvoiceError;

  fn try_from(row: InvoiceItemRow) -> Result<Self, Self::Error> {
    Ok(InvoiceItemDetails {
      item: InvoiceLineItem {
        id: row.id,
        invoice_id: row.invoice_id,
        service_id: row.service_id,
        description: LineItemDescription::optional(row.description)?,
        quantity: Quantity::new(row.quantity)?,
        rate: Money::new(row.rate)?,
        amount: Money::new(row.amount)?,
        line_order: row.line_order,
      },
      service_name: row.service_name,
    })
  }
}

pub(crate) const INVOICE_COLUMNS: &str = "i.id, i.invoice_number, i.client_id, i.invoice_date, \
   i.due_date, i.notes, i.subtotal, i.tax_rate, i.tax_amount, i.total_amount, i.status, \
   i.created_at, i.updated_at";

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn begin(&self) -> Result<Box<dyn InvoiceTransaction>, InvoiceError> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PostgresInvoiceTransaction::new(tx)))
  }

  async fn find_details(&self, id: Uuid) -> Result<Option<InvoiceDetails>, InvoiceError> {
    let Some(row) = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {INVOICE_COLUMNS} FROM invoices i WHERE i.id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    else {
      return Ok(None);
    };
    let invoice: Invoice = row.try_into()?;

    let client: Client = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
    ))
    .bind(invoice.client_id)
    .fetch_one(&self.pool)
    .await?
    .try_into()?;

    let items = sqlx::query_as::<_, InvoiceItemRow>(
      r#"
      SELECT ii.id, ii.invoice_id, ii.service_id, ii.description, ii.quantity, ii.rate,
             ii.amount, ii.line_order, s.name AS service_name
      FROM invoice_items ii
      JOIN services s ON s.id = ii.service_id
      WHERE ii.invoice_id = $1
      ORDER BY ii.line_order ASC
      "#,
    )
    .bind(id)
    .fetch_all(&self.pool)
    .await?
    .into_iter()
    .map(|r| r.try_into())
    .collect::<Result<Vec<InvoiceItemDetails>, InvoiceError>>()?;

    Ok(Some(InvoiceDetails {
      invoice,
      client,
      items,
    }))
  }

  async fn list(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceSummaryRow>(&format!(
      r#"
      SELECT {INVOICE_COLUMNS}, c.name AS client_name, c.email AS client_email
      FROM invoices i
      JOIN clients c ON c.id = i.client_id
      ORDER BY i.created_at DESC, i.invoice_number DESC
      "#
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn update_status(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
    let result = sqlx::query("UPDATE invoices SET status = $2, updated_at = $3 WHERE id = $1")
      .bind(invoice.id)
      .bind(invoice.status.as_str())
      .bind(invoice.updated_at)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(InvoiceError::InvoiceNotFound(invoice.id));
    }
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    // Line items go with the invoice via ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{
    ClientData, ClientName, InvoiceData, InvoiceService, InvoiceServiceDependencies,
    LineItemRequest, ServiceData, ServiceName,
  };
  use crate::infrastructure::persistence::postgres::{
    PostgresClientRepository, PostgresServiceRepository,
  };
  use rust_decimal_macros::dec;
  use sqlx::postgres::PgPoolOptions;
  use std::sync::Arc;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  fn service_over(pool: &PgPool) -> InvoiceService {
    InvoiceService::new(
      InvoiceServiceDependencies {
        client_repo: Arc::new(PostgresClientRepository::new(pool.clone())),
        service_repo: Arc::new(PostgresServiceRepository::new(pool.clone())),
        invoice_repo: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
      },
      TaxRate::new(dec!(18)).unwrap(),
    )
  }

  async fn seed(svc: &InvoiceService) -> (Uuid, Uuid) {
    let client = svc
      .create_client(ClientData {
        name: ClientName::new("Acme Ltd".to_string()).unwrap(),
        email: Some(EmailAddress::new("billing@acme.test").unwrap()),
        phone: None,
        address: None,
      })
      .await
      .unwrap();
    let service = svc
      .create_service(ServiceData {
        name: ServiceName::new("Consulting".to_string()).unwrap(),
        description: None,
        default_rate: Money::new(dec!(100.00)).unwrap(),
      })
      .await
      .unwrap();
    (client.id, service.id)
  }

  fn invoice_data(client_id: Uuid, service_id: Uuid) -> InvoiceData {
    InvoiceData {
      client_id,
      invoice_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
      due_date: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
      notes: Some("Net 30".to_string()),
      line_items: vec![LineItemRequest {
        service_id,
        quantity: Quantity::new(dec!(2)).unwrap(),
        rate: None,
        description: None,
      }],
    }
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_create_and_read_back_invoice() {
    let (pool, _container) = setup_test_db().await;
    let svc = service_over(&pool);
    let (client_id, service_id) = seed(&svc).await;

    let created = svc
      .create_invoice(invoice_data(client_id, service_id))
      .await
      .unwrap();
    let loaded = svc.get_invoice_details(created.invoice.id).await.unwrap();

    assert_eq!(loaded.invoice.subtotal.amount(), dec!(200.00));
    assert_eq!(loaded.invoice.tax_amount.amount(), dec!(36.00));
    assert_eq!(loaded.invoice.total_amount.amount(), dec!(236.00));
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].service_name, "Consulting");
    assert_eq!(loaded.client.name.value(), "Acme Ltd");
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_sequence_advances_per_year() {
    let (pool, _container) = setup_test_db().await;
    let svc = service_over(&pool);
    let (client_id, service_id) = seed(&svc).await;

    let first = svc
      .create_invoice(invoice_data(client_id, service_id))
      .await
      .unwrap();
    let second = svc
      .create_invoice(invoice_data(client_id, service_id))
      .await
      .unwrap();

    let year = Utc::now().format("%Y").to_string();
    assert_eq!(first.invoice.invoice_number.value(), format!("INV-{}-0001", year));
    assert_eq!(second.invoice.invoice_number.value(), format!("INV-{}-0002", year));
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_failed_creation_leaves_nothing_behind() {
    let (pool, _container) = setup_test_db().await;
    let svc = service_over(&pool);
    let (client_id, service_id) = seed(&svc).await;

    let mut data = invoice_data(client_id, service_id);
    data.line_items.push(LineItemRequest {
      service_id: Uuid::new_v4(),
      quantity: Quantity::new(dec!(1)).unwrap(),
      rate: None,
      description: None,
    });

    let result = svc.create_invoice(data).await;
    assert!(matches!(result, Err(InvoiceError::ServiceNotFound(_))));
    assert!(svc.list_invoices().await.unwrap().is_empty());

    // The aborted attempt must not consume a number
    let created = svc
      .create_invoice(invoice_data(client_id, service_id))
      .await
      .unwrap();
    assert!(created.invoice.invoice_number.value().ends_with("-0001"));
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_referenced_client_cannot_be_deleted() {
    let (pool, _container) = setup_test_db().await;
    let svc = service_over(&pool);
    let (client_id, service_id) = seed(&svc).await;
    let created = svc
      .create_invoice(invoice_data(client_id, service_id))
      .await
      .unwrap();

    let result = svc.delete_client(client_id).await;
    assert!(matches!(result, Err(InvoiceError::ReferencedRecord(_))));

    svc.delete_invoice(created.invoice.id).await.unwrap();
    svc.delete_client(client_id).await.unwrap();
  }
}
