use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::catalog::ServiceCommand;
use crate::application::client::ClientCommand;
use crate::application::invoice::{CreateInvoiceCommand, CreateInvoiceLineItemDto};

/// Envelope wrapping every JSON response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
  pub success: bool,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> ApiResponse<T> {
  pub fn data(data: T) -> Self {
    Self {
      success: true,
      data: Some(data),
      message: None,
    }
  }

  pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
    Self {
      success: true,
      data: Some(data),
      message: Some(message.into()),
    }
  }
}

impl ApiResponse<()> {
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      success: true,
      data: None,
      message: Some(message.into()),
    }
  }

  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      data: None,
      message: Some(message.into()),
    }
  }
}

/// Request body for creating or replacing a client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,

  #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
  pub phone: Option<String>,

  pub address: Option<String>,
}

impl From<ClientRequest> for ClientCommand {
  fn from(request: ClientRequest) -> Self {
    Self {
      name: request.name,
      email: request.email,
      phone: request.phone,
      address: request.address,
    }
  }
}

/// Request body for creating or replacing a service
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,

  pub description: Option<String>,

  /// Default hourly or unit rate
  #[serde(alias = "default_rate")]
  pub rate: Decimal,
}

impl From<ServiceRequest> for ServiceCommand {
  fn from(request: ServiceRequest) -> Self {
    Self {
      name: request.name,
      description: request.description,
      default_rate: request.rate,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceItemRequest {
  pub service_id: Uuid,
  pub quantity: Decimal,
  pub rate: Option<Decimal>,
  #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
  pub description: Option<String>,
}

/// Request body for creating an invoice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
  pub client_id: Uuid,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub notes: Option<String>,

  #[serde(alias = "line_items")]
  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub items: Vec<InvoiceItemRequest>,
}

impl From<CreateInvoiceRequest> for CreateInvoiceCommand {
  fn from(request: CreateInvoiceRequest) -> Self {
    Self {
      client_id: request.client_id,
      invoice_date: request.invoice_date,
      due_date: request.due_date,
      notes: request.notes,
      line_items: request
        .items
        .into_iter()
        .map(|item| CreateInvoiceLineItemDto {
          service_id: item.service_id,
          quantity: item.quantity,
          rate: item.rate,
          description: item.description,
        })
        .collect(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
  pub status: String,
}

/// Body of `POST /api/email/invoices/{id}/send`; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,

  #[validate(length(max = 255, message = "Subject must be at most 255 characters"))]
  pub subject: Option<String>,

  pub custom_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendRequest {
  #[validate(length(min = 1, message = "invoiceIds array is required and cannot be empty"))]
  pub invoice_ids: Vec<Uuid>,

  pub custom_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
  pub reminder_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailRequest {
  #[validate(email(message = "testEmail must be a valid email address"))]
  pub test_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
  pub version: &'static str,
}
