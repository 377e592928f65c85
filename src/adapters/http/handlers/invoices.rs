use actix_web::{
  HttpRequest, HttpResponse,
  http::header::{self, ContentDisposition, DispositionParam, DispositionType, EntityTag},
  web,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, ChangeStatusRequest, CreateInvoiceRequest},
    errors::ApiError,
  },
  application::invoice::*,
};

/// Create invoice
/// POST /api/invoices
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let details = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Created().json(ApiResponse::data_with_message(
    details,
    "Invoice created successfully",
  )))
}

/// List invoices, newest first
/// GET /api/invoices
pub async fn list_invoices_handler(
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoices = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(ApiResponse::data(invoices)))
}

/// Invoice header, client and line items
/// GET /api/invoices/{id}
pub async fn get_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let details = use_case
    .execute(GetInvoiceDetailsCommand {
      invoice_id: *invoice_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::data(details)))
}

/// Download the rendered invoice
/// GET /api/invoices/{id}/pdf
pub async fn download_invoice_pdf_handler(
  req: HttpRequest,
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DownloadInvoicePdfUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let document = use_case
    .execute(DownloadInvoicePdfCommand {
      invoice_id: *invoice_id,
    })
    .await?;

  let etag = EntityTag::new_strong(document.etag.clone());

  let cached = req
    .headers()
    .get(header::IF_NONE_MATCH)
    .and_then(|value| value.to_str().ok())
    .is_some_and(|value| {
      value
        .split(',')
        .filter_map(|tag| tag.trim().parse::<EntityTag>().ok())
        .any(|tag| tag.weak_eq(&etag))
    });
  if cached {
    return Ok(HttpResponse::NotModified().insert_header(header::ETag(etag)).finish());
  }

  Ok(
    HttpResponse::Ok()
      .content_type(document.content_type)
      .insert_header(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(document.filename)],
      })
      .insert_header(header::ETag(etag))
      .body(document.bytes),
  )
}

/// Move an invoice to a new status
/// PUT /api/invoices/{id}/status
pub async fn change_invoice_status_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<ChangeStatusRequest>,
  use_case: web::Data<Arc<ChangeInvoiceStatusUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(ChangeInvoiceStatusCommand {
      invoice_id: *invoice_id,
      new_status: request.into_inner().status,
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
    response,
    "Invoice status updated successfully",
  )))
}

/// Delete invoice and its items
/// DELETE /api/invoices/{id}
pub async fn delete_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteInvoiceCommand {
      invoice_id: *invoice_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Invoice deleted successfully")))
}
