use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::map_delete_error;
use crate::domain::invoice::{
  Money, Service, ServiceName, errors::InvoiceError, ports::ServiceRepository,
};

#[derive(Debug, FromRow)]
pub(crate) struct ServiceRow {
  id: Uuid,
  name: String,
  description: Option<String>,
  default_rate: Decimal,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for Service {
  type Error = InvoiceError;

  fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
    Ok(Service {
      id: row.id,
      name: ServiceName::new(row.name)?,
      description: row.description,
      default_rate: Money::new(row.default_rate)?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub(crate) const SERVICE_COLUMNS: &str =
  "id, name, description, default_rate, created_at, updated_at";

pub struct PostgresServiceRepository {
  pool: PgPool,
}

impl PostgresServiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepository {
  async fn create(&self, service: Service) -> Result<Service, InvoiceError> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
      r#"
      INSERT INTO services (id, name, description, default_rate, created_at, updated_at)
      VALUES ($1, $2, $3, $4, $5, $6)
      RETURNING {SERVICE_COLUMNS}
      "#
    ))
    .bind(service.id)
    .bind(service.name.value())
    .bind(&service.description)
    .bind(service.default_rate.amount())
    .bind(service.created_at)
    .bind(service.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, service: Service) -> Result<Service, InvoiceError> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
      r#"
      UPDATE services
      SET name = $2, description = $3, default_rate = $4, updated_at = $5
      WHERE id = $1
      RETURNING {SERVICE_COLUMNS}
      "#
    ))
    .bind(service.id)
    .bind(service.name.value())
    .bind(&service.description)
    .bind(service.default_rate.amount())
    .bind(service.updated_at)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(InvoiceError::ServiceNotFound(service.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, InvoiceError> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
      "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self) -> Result<Vec<Service>, InvoiceError> {
    let rows = sqlx::query_as::<_, ServiceRow>(&format!(
      "SELECT {SERVICE_COLUMNS} FROM services ORDER BY name ASC"
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| map_delete_error(e, || format!("Service {}", id)))?;

    Ok(result.rows_affected() > 0)
  }
}
