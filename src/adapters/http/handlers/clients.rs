use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{ApiResponse, ClientRequest},
    errors::ApiError,
  },
  application::client::*,
};

/// Create client
/// POST /api/clients
pub async fn create_client_handler(
  request: web::Json<ClientRequest>,
  use_case: web::Data<Arc<CreateClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let client = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Created().json(ApiResponse::data_with_message(
    client,
    "Client created successfully",
  )))
}

/// List clients
/// GET /api/clients
pub async fn list_clients_handler(
  use_case: web::Data<Arc<ListClientsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let clients = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(ApiResponse::data(clients)))
}

/// Get client
/// GET /api/clients/{id}
pub async fn get_client_handler(
  client_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let client = use_case
    .execute(GetClientCommand {
      client_id: *client_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::data(client)))
}

/// Replace client fields
/// PUT /api/clients/{id}
pub async fn update_client_handler(
  client_id: web::Path<Uuid>,
  request: web::Json<ClientRequest>,
  use_case: web::Data<Arc<UpdateClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let client = use_case
    .execute(UpdateClientCommand {
      client_id: *client_id,
      fields: request.into_inner().into(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::data_with_message(
    client,
    "Client updated successfully",
  )))
}

/// Delete client
/// DELETE /api/clients/{id}
pub async fn delete_client_handler(
  client_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteClientUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteClientCommand {
      client_id: *client_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Client deleted successfully")))
}
