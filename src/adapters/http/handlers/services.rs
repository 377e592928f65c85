use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, ServiceRequest},
    errors::ApiError,
  },
  application::catalog::*,
};

/// Create service
/// POST /api/services
pub async fn create_service_handler(
  request: web::Json<ServiceRequest>,
  use_case: web::Data<Arc<CreateServiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let service = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Created().json(ApiResponse::data_with_message(
    service,
    "Service created successfully",
  )))
}

/// List services
/// GET /api/services
pub async fn list_services_handler(
  use_case: web::Data<Arc<ListServicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let services = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(ApiResponse::data(services)))
}

/// Get service
/// GET /api/services/{id}
pub async fn get_service_handler(
  service_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetServiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let service = use_case
    .execute(GetServiceCommand {
      service_id: *service_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::data(service)))
}

/// Replace service fields
/// PUT /api/services/{id}
pub async fn update_service_handler(
  service_id: web::Path<Uuid>,
  request: web::Json<ServiceRequest>,
  use_case: web::Data<Arc<UpdateServiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let service = use_case
    .execute(UpdateServiceCommand {
      service_id: *service_id,
      fields: request.into_inner().into(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
    service,
    "Service updated successfully",
  )))
}

/// Delete service
/// DELETE /api/services/{id}
pub async fn delete_service_handler(
  service_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteServiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteServiceCommand {
      service_id: *service_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Service deleted successfully")))
}
