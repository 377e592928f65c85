use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::map_delete_error;
use crate::domain::invoice::{
  Client, ClientName, EmailAddress, errors::InvoiceError, ports::ClientRepository,
};

#[derive(Debug, FromRow)]
pub(crate) struct ClientRow {
  id: Uuid,
  name: String,
  email: Option<String>,
  phone: Option<String>,
  address: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
  type Error = InvoiceError;

  fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
    Ok(Client {
      id: row.id,
      name: ClientName::new(row.name)?,
      email: EmailAddress::optional(row.email)?,
      phone: row.phone,
      address: row.address,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub(crate) const CLIENT_COLUMNS: &str =
  "id, name, email, phone, address, created_at, updated_at";

pub struct PostgresClientRepository {
  pool: PgPool,
}

impl PostgresClientRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
  async fn create(&self, client: Client) -> Result<Client, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
      INSERT INTO clients (id, name, email, phone, address, created_at, updated_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7)
      RETURNING {CLIENT_COLUMNS}
      "#
    ))
    .bind(client.id)
    .bind(client.name.value())
    .bind(client.email.as_ref().map(|e| e.as_str()))
    .bind(&client.phone)
    .bind(&client.address)
    .bind(client.created_at)
    .bind(client.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, client: Client) -> Result<Client, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
      UPDATE clients
      SET name = $2, email = $3, phone = $4, address = $5, updated_at = $6
      WHERE id = $1
      RETURNING {CLIENT_COLUMNS}
      "#
    ))
    .bind(client.id)
    .bind(client.name.value())
    .bind(client.email.as_ref().map(|e| e.as_str()))
    .bind(&client.phone)
    .bind(&client.address)
    .bind(client.updated_at)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(InvoiceError::ClientNotFound(client.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, InvoiceError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self) -> Result<Vec<Client>, InvoiceError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name ASC"
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| map_delete_error(e, || format!("Client {}", id)))?;

    Ok(result.rows_affected() > 0)
  }
}
