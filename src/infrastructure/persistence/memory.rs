//! Process-local storage with the same transactional contract as Postgres.
//!
//! A transaction holds the store lock for its whole life and writes to a
//! private copy of the state; `commit` swaps the copy in. Non-transactional
//! calls wait for any open transaction to finish.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::invoice::{
  Client, Invoice, InvoiceDetails, InvoiceItemDetails, InvoiceLineItem, InvoiceSummary,
  InvoiceTotals, Service,
  errors::InvoiceError,
  ports::{ClientRepository, InvoiceRepository, InvoiceTransaction, ServiceRepository},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
  clients: HashMap<Uuid, Client>,
  services: HashMap<Uuid, Service>,
  invoices: HashMap<Uuid, Invoice>,
  line_items: HashMap<Uuid, Vec<InvoiceLineItem>>,
  sequences: HashMap<i32, u32>,
}

impl MemoryState {
  fn details(&self, invoice: &Invoice) -> Result<InvoiceDetails, InvoiceError> {
    let client = self
      .clients
      .get(&invoice.client_id)
      .cloned()
      .ok_or_else(|| InvoiceError::Storage(format!("Dangling client {}", invoice.client_id)))?;

    let mut items: Vec<InvoiceItemDetails> = self
      .line_items
      .get(&invoice.id)
      .map(|items| {
        items
          .iter()
          .map(|item| InvoiceItemDetails {
            item: item.clone(),
            service_name: self
              .services
              .get(&item.service_id)
              .map(|s| s.name.value().to_string())
              .unwrap_or_default(),
          })
          .collect()
      })
      .unwrap_or_default();
    items.sort_by_key(|d| d.item.line_order);

    Ok(InvoiceDetails {
      invoice: invoice.clone(),
      client,
      items,
    })
  }

  fn client_in_use(&self, id: Uuid) -> bool {
    self.invoices.values().any(|i| i.client_id == id)
  }

  fn service_in_use(&self, id: Uuid) -> bool {
    self
      .line_items
      .values()
      .flatten()
      .any(|item| item.service_id == id)
  }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
  state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn invoice_count(&self) -> usize {
    self.state.lock().await.invoices.len()
  }

  pub async fn line_item_count(&self) -> usize {
    self.state.lock().await.line_items.values().map(Vec::len).sum()
  }
}

#[async_trait]
impl ClientRepository for InMemoryStore {
  async fn create(&self, client: Client) -> Result<Client, InvoiceError> {
    let mut state = self.state.lock().await;
    state.clients.insert(client.id, client.clone());
    Ok(client)
  }

  async fn update(&self, client: Client) -> Result<Client, InvoiceError> {
    let mut state = self.state.lock().await;
    match state.clients.get_mut(&client.id) {
      Some(existing) => {
        *existing = client.clone();
        Ok(client)
      }
      None => Err(InvoiceError::ClientNotFound(client.id)),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, InvoiceError> {
    Ok(self.state.lock().await.clients.get(&id).cloned())
  }

  async fn list(&self) -> Result<Vec<Client>, InvoiceError> {
    let mut clients: Vec<Client> = self.state.lock().await.clients.values().cloned().collect();
    clients.sort_by(|a, b| a.name.value().cmp(b.name.value()));
    Ok(clients)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let mut state = self.state.lock().await;
    if state.client_in_use(id) {
      return Err(InvoiceError::ReferencedRecord(format!("Client {}", id)));
    }
    Ok(state.clients.remove(&id).is_some())
  }
}

#[async_trait]
impl ServiceRepository for InMemoryStore {
  async fn create(&self, service: Service) -> Result<Service, InvoiceError> {
    let mut state = self.state.lock().await;
    state.services.insert(service.id, service.clone());
    Ok(service)
  }

  async fn update(&self, service: Service) -> Result<Service, InvoiceError> {
    let mut state = self.state.lock().await;
    match state.services.get_mut(&service.id) {
      Some(existing) => {
        *existing = service.clone();
        Ok(service)
      }
      None => Err(InvoiceError::ServiceNotFound(service.id)),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, InvoiceError> {
    Ok(self.state.lock().await.services.get(&id).cloned())
  }

  async fn list(&self) -> Result<Vec<Service>, InvoiceError> {
    let mut services: Vec<Service> = self.state.lock().await.services.values().cloned().collect();
    services.sort_by(|a, b| a.name.value().cmp(b.name.value()));
    Ok(services)
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let mut state = self.state.lock().await;
    if state.service_in_use(id) {
      return Err(InvoiceError::ReferencedRecord(format!("Service {}", id)));
    }
    Ok(state.services.remove(&id).is_some())
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
  async fn begin(&self) -> Result<Box<dyn InvoiceTransaction>, InvoiceError> {
    let guard = self.state.clone().lock_owned().await;
    let staged = (*guard).clone();
    Ok(Box::new(InMemoryTransaction { guard, staged }))
  }

  async fn find_details(&self, id: Uuid) -> Result<Option<InvoiceDetails>, InvoiceError> {
    let state = self.state.lock().await;
    state
      .invoices
      .get(&id)
      .map(|invoice| state.details(invoice))
      .transpose()
  }

  async fn list(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let state = self.state.lock().await;
    let mut summaries = state
      .invoices
      .values()
      .map(|invoice| -> Result<InvoiceSummary, InvoiceError> {
        let client = state
          .clients
          .get(&invoice.client_id)
          .ok_or_else(|| InvoiceError::Storage(format!("Dangling client {}", invoice.client_id)))?;
        Ok(InvoiceSummary {
          invoice: invoice.clone(),
          client_name: client.name.value().to_string(),
          client_email: client.email.clone(),
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    summaries.sort_by(|a, b| {
      let key = |s: &InvoiceSummary| {
        (
          s.invoice.created_at,
          s.invoice.invoice_number.year(),
          s.invoice.invoice_number.sequence(),
        )
      };
      key(b).cmp(&key(a))
    });
    Ok(summaries)
  }

  async fn update_status(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
    let mut state = self.state.lock().await;
    let stored = state
      .invoices
      .get_mut(&invoice.id)
      .ok_or(InvoiceError::InvoiceNotFound(invoice.id))?;
    stored.status = invoice.status;
    stored.updated_at = invoice.updated_at;
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<bool, InvoiceError> {
    let mut state = self.state.lock().await;
    state.line_items.remove(&id);
    Ok(state.invoices.remove(&id).is_some())
  }
}

pub struct InMemoryTransaction {
  guard: OwnedMutexGuard<MemoryState>,
  staged: MemoryState,
}

#[async_trait]
impl InvoiceTransaction for InMemoryTransaction {
  async fn find_client(&mut self, id: Uuid) -> Result<Option<Client>, InvoiceError> {
    Ok(self.staged.clients.get(&id).cloned())
  }

  async fn find_service(&mut self, id: Uuid) -> Result<Option<Service>, InvoiceError> {
    Ok(self.staged.services.get(&id).cloned())
  }

  async fn next_invoice_sequence(&mut self, year: i32) -> Result<u32, InvoiceError> {
    let counter = self.staged.sequences.entry(year).or_insert(0);
    *counter += 1;
    Ok(*counter)
  }

  async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError> {
    if self
      .staged
      .invoices
      .values()
      .any(|i| i.invoice_number == invoice.invoice_number)
    {
      return Err(InvoiceError::InvoiceNumberAlreadyExists(
        invoice.invoice_number.value(),
      ));
    }
    if !self.staged.clients.contains_key(&invoice.client_id) {
      return Err(InvoiceError::Storage(format!(
        "Invoice references unknown client {}",
        invoice.client_id
      )));
    }
    self.staged.invoices.insert(invoice.id, invoice.clone());
    Ok(())
  }

  async fn insert_line_item(&mut self, item: &InvoiceLineItem) -> Result<(), InvoiceError> {
    if !self.staged.invoices.contains_key(&item.invoice_id) {
      return Err(InvoiceError::Storage(format!(
        "Line item references unknown invoice {}",
        item.invoice_id
      )));
    }
    if !self.staged.services.contains_key(&item.service_id) {
      return Err(InvoiceError::Storage(format!(
        "Line item references unknown service {}",
        item.service_id
      )));
    }
    self
      .staged
      .line_items
      .entry(item.invoice_id)
      .or_default()
      .push(item.clone());
    Ok(())
  }

  async fn update_invoice_totals(
    &mut self,
    invoice_id: Uuid,
    totals: &InvoiceTotals,
  ) -> Result<(), InvoiceError> {
    let invoice = self
      .staged
      .invoices
      .get_mut(&invoice_id)
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;
    invoice.apply_totals(totals);
    Ok(())
  }

  async fn commit(self: Box<Self>) -> Result<(), InvoiceError> {
    let InMemoryTransaction { mut guard, staged } = *self;
    *guard = staged;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<(), InvoiceError> {
    Ok(())
  }
}
