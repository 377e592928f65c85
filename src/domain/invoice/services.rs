use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{
  Client, Invoice, InvoiceDetails, InvoiceItemDetails, InvoiceLineItem, InvoiceSummary,
  InvoiceTotals, Service,
};
use super::errors::InvoiceError;
use super::numbering::next_invoice_number;
use super::ports::{ClientRepository, InvoiceRepository, InvoiceTransaction, ServiceRepository};
use super::value_objects::{
  ClientName, EmailAddress, InvoiceStatus, LineItemDescription, Money, Quantity, ServiceName,
  TaxRate,
};

/// One requested line: a service reference plus optional rate and description overrides.
#[derive(Debug, Clone)]
pub struct LineItemRequest {
  pub service_id: Uuid,
  pub quantity: Quantity,
  pub rate: Option<Money>,
  pub description: Option<LineItemDescription>,
}

/// Invoice creation data
#[derive(Debug, Clone)]
pub struct InvoiceData {
  pub client_id: Uuid,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub notes: Option<String>,
  pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone)]
pub struct ClientData {
  pub name: ClientName,
  pub email: Option<EmailAddress>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServiceData {
  pub name: ServiceName,
  pub description: Option<String>,
  pub default_rate: Money,
}

/// A line after its service has been looked up and its amount computed.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
  pub item: InvoiceLineItem,
  pub service_name: String,
}

/// Resolves the effective rate of `request` and computes its amount.
///
/// The service is read through the caller's transaction; a missing service
/// fails the line and, with it, the whole creation.
pub async fn resolve_line(
  tx: &mut dyn InvoiceTransaction,
  invoice_id: Uuid,
  request: LineItemRequest,
  line_order: i32,
) -> Result<ResolvedLine, InvoiceError> {
  let service = tx
    .find_service(request.service_id)
    .await?
    .ok_or(InvoiceError::ServiceNotFound(request.service_id))?;

  let rate = match request.rate {
    Some(rate) => {
      rate.ensure_rate()?;
      rate
    }
    None => service.default_rate,
  };
  let item = InvoiceLineItem::new(
    invoice_id,
    service.id,
    request.description,
    request.quantity,
    rate,
    line_order,
  )?;

  Ok(ResolvedLine {
    item,
    service_name: service.name.into_inner(),
  })
}

pub struct InvoiceServiceDependencies {
  pub client_repo: Arc<dyn ClientRepository>,
  pub service_repo: Arc<dyn ServiceRepository>,
  pub invoice_repo: Arc<dyn InvoiceRepository>,
}

pub struct InvoiceService {
  client_repo: Arc<dyn ClientRepository>,
  service_repo: Arc<dyn ServiceRepository>,
  invoice_repo: Arc<dyn InvoiceRepository>,
  tax_rate: TaxRate,
}

impl InvoiceService {
  pub fn new(deps: InvoiceServiceDependencies, tax_rate: TaxRate) -> Self {
    Self {
      client_repo: deps.client_repo,
      service_repo: deps.service_repo,
      invoice_repo: deps.invoice_repo,
      tax_rate,
    }
  }

  pub fn tax_rate(&self) -> TaxRate {
    self.tax_rate
  }

  // Client operations
  pub async fn create_client(&self, data: ClientData) -> Result<Client, InvoiceError> {
    let client = Client::new(data.name, data.email, data.phone, data.address);
    let client = self.client_repo.create(client).await?;
    tracing::info!(client_id = %client.id, "Client created");
    Ok(client)
  }

  pub async fn update_client(&self, id: Uuid, data: ClientData) -> Result<Client, InvoiceError> {
    let mut client = self.get_client(id).await?;
    client.update(data.name, data.email, data.phone, data.address);
    self.client_repo.update(client).await
  }

  pub async fn get_client(&self, id: Uuid) -> Result<Client, InvoiceError> {
    self
      .client_repo
      .find_by_id(id)
      .await?
      .ok_or(InvoiceError::ClientNotFound(id))
  }

  pub async fn list_clients(&self) -> Result<Vec<Client>, InvoiceError> {
    self.client_repo.list().await
  }

  pub async fn delete_client(&self, id: Uuid) -> Result<(), InvoiceError> {
    if !self.client_repo.delete(id).await? {
      return Err(InvoiceError::ClientNotFound(id));
    }
    tracing::info!(client_id = %id, "Client deleted");
    Ok(())
  }

  // Service catalogue operations
  pub async fn create_service(&self, data: ServiceData) -> Result<Service, InvoiceError> {
    let service = Service::new(data.name, data.description, data.default_rate)?;
    let service = self.service_repo.create(service).await?;
    tracing::info!(service_id = %service.id, "Service created");
    Ok(service)
  }

  pub async fn update_service(&self, id: Uuid, data: ServiceData) -> Result<Service, InvoiceError> {
    let mut service = self.get_service(id).await?;
    service.update(data.name, data.description, data.default_rate)?;
    self.service_repo.update(service).await
  }

  pub async fn get_service(&self, id: Uuid) -> Result<Service, InvoiceError> {
    self
      .service_repo
      .find_by_id(id)
      .await?
      .ok_or(InvoiceError::ServiceNotFound(id))
  }

  pub async fn list_services(&self) -> Result<Vec<Service>, InvoiceError> {
    self.service_repo.list().await
  }

  pub async fn delete_service(&self, id: Uuid) -> Result<(), InvoiceError> {
    if !self.service_repo.delete(id).await? {
      return Err(InvoiceError::ServiceNotFound(id));
    }
    tracing::info!(service_id = %id, "Service deleted");
    Ok(())
  }

  // Invoice operations

  /// Creates an invoice with its line items in one transaction.
  ///
  /// On any error the transaction is rolled back and storage is left as it was.
  pub async fn create_invoice(&self, data: InvoiceData) -> Result<InvoiceDetails, InvoiceError> {
    self.create_invoice_at(data, Utc::now()).await
  }

  pub async fn create_invoice_at(
    &self,
    data: InvoiceData,
    now: DateTime<Utc>,
  ) -> Result<InvoiceDetails, InvoiceError> {
    let client_id = data.client_id;
    let mut tx = self.invoice_repo.begin().await?;

    let assembled = self.assemble(tx.as_mut(), data, now).await;
    match assembled {
      Ok(details) => {
        tx.commit().await?;
        tracing::info!(
          invoice_id = %details.invoice.id,
          invoice_number = %details.invoice.invoice_number,
          client_id = %client_id,
          line_items = details.items.len(),
          total = %details.invoice.total_amount,
          "Invoice created"
        );
        Ok(details)
      }
      Err(err) => {
        if let Err(rollback_err) = tx.rollback().await {
          tracing::error!(error = %rollback_err, "Failed to roll back invoice creation");
        }
        tracing::warn!(client_id = %client_id, error = %err, "Invoice creation aborted");
        Err(err)
      }
    }
  }

  async fn assemble(
    &self,
    tx: &mut dyn InvoiceTransaction,
    data: InvoiceData,
    now: DateTime<Utc>,
  ) -> Result<InvoiceDetails, InvoiceError> {
    let client = tx
      .find_client(data.client_id)
      .await?
      .ok_or(InvoiceError::ClientNotFound(data.client_id))?;

    if data.line_items.is_empty() {
      return Err(InvoiceError::NoLineItems);
    }
    if data.due_date < data.invoice_date {
      return Err(InvoiceError::InvalidDateRange {
        invoice_date: data.invoice_date,
        due_date: data.due_date,
      });
    }

    let invoice_number = next_invoice_number(tx, now.year()).await?;
    let mut invoice = Invoice::new(
      invoice_number,
      client.id,
      data.invoice_date,
      data.due_date,
      data.notes,
      self.tax_rate,
      now,
    );
    tx.insert_invoice(&invoice).await?;

    let mut items = Vec::with_capacity(data.line_items.len());
    for (index, request) in data.line_items.into_iter().enumerate() {
      let resolved = resolve_line(tx, invoice.id, request, (index + 1) as i32).await?;
      tx.insert_line_item(&resolved.item).await?;
      items.push(InvoiceItemDetails {
        item: resolved.item,
        service_name: resolved.service_name,
      });
    }

    let totals = InvoiceTotals::calculate(items.iter().map(|d| &d.item.amount), self.tax_rate)?;
    tx.update_invoice_totals(invoice.id, &totals).await?;
    invoice.apply_totals(&totals);

    Ok(InvoiceDetails {
      invoice,
      client,
      items,
    })
  }

  pub async fn get_invoice_details(&self, id: Uuid) -> Result<InvoiceDetails, InvoiceError> {
    self
      .invoice_repo
      .find_details(id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(id))
  }

  pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    self.invoice_repo.list().await
  }

  pub async fn change_invoice_status(
    &self,
    id: Uuid,
    new_status: InvoiceStatus,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoice = self.get_invoice_details(id).await?.invoice;
    let previous = invoice.status;

    if invoice.change_status(new_status)? {
      self.invoice_repo.update_status(&invoice).await?;
      tracing::info!(
        invoice_number = %invoice.invoice_number,
        from = %previous,
        to = %new_status,
        "Invoice status changed"
      );
    }

    Ok(invoice)
  }

  pub async fn delete_invoice(&self, id: Uuid) -> Result<(), InvoiceError> {
    if !self.invoice_repo.delete(id).await? {
      return Err(InvoiceError::InvoiceNotFound(id));
    }
    tracing::info!(invoice_id = %id, "Invoice deleted");
    Ok(())
  }
}
