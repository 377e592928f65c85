use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, BulkSendRequest, ReminderRequest, SendInvoiceRequest, TestEmailRequest},
    errors::ApiError,
  },
  application::email::*,
};

/// Send one invoice
/// POST /api/email/invoices/{id}/send
pub async fn send_invoice_handler(
  invoice_id: web::Path<Uuid>,
  request: Option<web::Json<SendInvoiceRequest>>,
  use_case: web::Data<Arc<SendInvoiceEmailUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let request = request.map(web::Json::into_inner).unwrap_or_default();
  request.validate()?;

  let response = use_case
    .execute(SendInvoiceEmailCommand {
      invoice_id: *invoice_id,
      email: request.email,
      subject: request.subject,
      custom_message: request.custom_message,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
    response,
    "Invoice sent successfully",
  )))
}

/// Send several invoices; one failure never aborts the batch
/// POST /api/email/invoices/bulk-send
pub async fn bulk_send_handler(
  request: web::Json<BulkSendRequest>,
  use_case: web::Data<Arc<BulkSendInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let response = use_case
    .execute(BulkSendInvoicesCommand {
      invoice_ids: request.invoice_ids,
      custom_message: request.custom_message,
    })
    .await;

  let message = format!(
    "Bulk email sending completed. Successful: {}, Failed: {}",
    response.successful.len(),
    response.failed.len()
  );
  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(response, message)))
}

/// Send a payment reminder
/// POST /api/email/invoices/{id}/reminder
pub async fn send_reminder_handler(
  invoice_id: web::Path<Uuid>,
  request: Option<web::Json<ReminderRequest>>,
  use_case: web::Data<Arc<SendPaymentReminderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let request = request.map(web::Json::into_inner).unwrap_or_default();

  let response = use_case
    .execute(SendPaymentReminderCommand {
      invoice_id: *invoice_id,
      reminder_type: request.reminder_type,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
    response,
    "Reminder sent successfully",
  )))
}

/// Send a sample invoice to check mail settings
/// POST /api/email/test
pub async fn send_test_email_handler(
  request: web::Json<TestEmailRequest>,
  use_case: web::Data<Arc<SendTestEmailUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let response = use_case
    .execute(SendTestEmailCommand {
      test_email: request.into_inner().test_email,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
    response,
    "Test email sent successfully",
  )))
}
