use actix_web::web;
use std::sync::Arc;

use crate::application::{catalog::*, client::*, email::*, invoice::*};
use crate::domain::invoice::{DocumentRenderer, InvoiceService};

use super::errors::{json_error_handler, path_error_handler, query_error_handler};
use super::handlers::{clients, email, health, invoices, services};

/// Every use case the JSON API dispatches to.
#[derive(Clone)]
pub struct ApiRouteDependencies {
  pub create_client: Arc<CreateClientUseCase>,
  pub list_clients: Arc<ListClientsUseCase>,
  pub get_client: Arc<GetClientUseCase>,
  pub update_client: Arc<UpdateClientUseCase>,
  pub delete_client: Arc<DeleteClientUseCase>,

  pub create_service: Arc<CreateServiceUseCase>,
  pub list_services: Arc<ListServicesUseCase>,
  pub get_service: Arc<GetServiceUseCase>,
  pub update_service: Arc<UpdateServiceUseCase>,
  pub delete_service: Arc<DeleteServiceUseCase>,

  pub create_invoice: Arc<CreateInvoiceUseCase>,
  pub list_invoices: Arc<ListInvoicesUseCase>,
  pub get_invoice: Arc<GetInvoiceDetailsUseCase>,
  pub download_pdf: Arc<DownloadInvoicePdfUseCase>,
  pub change_status: Arc<ChangeInvoiceStatusUseCase>,
  pub delete_invoice: Arc<DeleteInvoiceUseCase>,

  pub send_invoice: Arc<SendInvoiceEmailUseCase>,
  pub bulk_send: Arc<BulkSendInvoicesUseCase>,
  pub send_reminder: Arc<SendPaymentReminderUseCase>,
  pub send_test_email: Arc<SendTestEmailUseCase>,
}

impl ApiRouteDependencies {
  /// Builds every use case over one invoice service.
  pub fn build(
    invoice_service: Arc<InvoiceService>,
    renderer: Arc<dyn DocumentRenderer>,
    dispatch: Arc<InvoiceDispatch>,
  ) -> Self {
    let svc = invoice_service;
    Self {
      create_client: Arc::new(CreateClientUseCase::new(svc.clone())),
      list_clients: Arc::new(ListClientsUseCase::new(svc.clone())),
      get_client: Arc::new(GetClientUseCase::new(svc.clone())),
      update_client: Arc::new(UpdateClientUseCase::new(svc.clone())),
      delete_client: Arc::new(DeleteClientUseCase::new(svc.clone())),

      create_service: Arc::new(CreateServiceUseCase::new(svc.clone())),
      list_services: Arc::new(ListServicesUseCase::new(svc.clone())),
      get_service: Arc::new(GetServiceUseCase::new(svc.clone())),
      update_service: Arc::new(UpdateServiceUseCase::new(svc.clone())),
      delete_service: Arc::new(DeleteServiceUseCase::new(svc.clone())),

      create_invoice: Arc::new(CreateInvoiceUseCase::new(svc.clone())),
      list_invoices: Arc::new(ListInvoicesUseCase::new(svc.clone())),
      get_invoice: Arc::new(GetInvoiceDetailsUseCase::new(svc.clone())),
      download_pdf: Arc::new(DownloadInvoicePdfUseCase::new(svc.clone(), renderer)),
      change_status: Arc::new(ChangeInvoiceStatusUseCase::new(svc.clone())),
      delete_invoice: Arc::new(DeleteInvoiceUseCase::new(svc.clone())),

      send_invoice: Arc::new(SendInvoiceEmailUseCase::new(svc.clone(), dispatch.clone())),
      bulk_send: Arc::new(BulkSendInvoicesUseCase::new(svc.clone(), dispatch.clone())),
      send_reminder: Arc::new(SendPaymentReminderUseCase::new(svc.clone(), dispatch.clone())),
      send_test_email: Arc::new(SendTestEmailUseCase::new(dispatch, svc.tax_rate())),
    }
  }
}

/// Configure the JSON API
///
/// Mounts every endpoint under the provided scope (normally `/api`).
///
/// # Routes
///
/// - GET /health
/// - POST, GET /clients and GET, PUT, DELETE /clients/{id}
/// - POST, GET /services and GET, PUT, DELETE /services/{id}
/// - POST, GET /invoices and GET, DELETE /invoices/{id}
/// - GET /invoices/{id}/pdf
/// - PUT /invoices/{id}/status
/// - POST /email/invoices/{id}/send
/// - POST /email/invoices/bulk-send
/// - POST /email/invoices/{id}/reminder
/// - POST /email/test
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use invoicer::adapters::http::routes::{ApiRouteDependencies, configure_api_routes};
///
/// # fn example(deps: ApiRouteDependencies) {
/// let app = App::new().service(web::scope("/api").configure(|cfg| configure_api_routes(cfg, deps)));
/// # }
/// ```
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiRouteDependencies) {
  // Extractor failures use the JSON envelope too
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler));

  cfg.route("/health", web::get().to(health::health_handler));

  cfg
    .app_data(web::Data::new(deps.create_client))
    .app_data(web::Data::new(deps.list_clients))
    .app_data(web::Data::new(deps.get_client))
    .app_data(web::Data::new(deps.update_client))
    .app_data(web::Data::new(deps.delete_client))
    .route("/clients", web::post().to(clients::create_client_handler))
    .route("/clients", web::get().to(clients::list_clients_handler))
    .route("/clients/{id}", web::get().to(clients::get_client_handler))
    .route("/clients/{id}", web::put().to(clients::update_client_handler))
    .route(
      "/clients/{id}",
      web::delete().to(clients::delete_client_handler),
    );

  cfg
    .app_data(web::Data::new(deps.create_service))
    .app_data(web::Data::new(deps.list_services))
    .app_data(web::Data::new(deps.get_service))
    .app_data(web::Data::new(deps.update_service))
    .app_data(web::Data::new(deps.delete_service))
    .route("/services", web::post().to(services::create_service_handler))
    .route("/services", web::get().to(services::list_services_handler))
    .route("/services/{id}", web::get().to(services::get_service_handler))
    .route(
      "/services/{id}",
      web::put().to(services::update_service_handler),
    )
    .route(
      "/services/{id}",
      web::delete().to(services::delete_service_handler),
    );

  cfg
    .app_data(web::Data::new(deps.create_invoice))
    .app_data(web::Data::new(deps.list_invoices))
    .app_data(web::Data::new(deps.get_invoice))
    .app_data(web::Data::new(deps.download_pdf))
    .app_data(web::Data::new(deps.change_status))
    .app_data(web::Data::new(deps.delete_invoice))
    .route("/invoices", web::post().to(invoices::create_invoice_handler))
    .route("/invoices", web::get().to(invoices::list_invoices_handler))
    .route("/invoices/{id}", web::get().to(invoices::get_invoice_handler))
    .route(
      "/invoices/{id}",
      web::delete().to(invoices::delete_invoice_handler),
    )
    .route(
      "/invoices/{id}/pdf",
      web::get().to(invoices::download_invoice_pdf_handler),
    )
    .route(
      "/invoices/{id}/status",
      web::put().to(invoices::change_invoice_status_handler),
    );

  cfg
    .app_data(web::Data::new(deps.send_invoice))
    .app_data(web::Data::new(deps.bulk_send))
    .app_data(web::Data::new(deps.send_reminder))
    .app_data(web::Data::new(deps.send_test_email))
    .route(
      "/email/invoices/bulk-send",
      web::post().to(email::bulk_send_handler),
    )
    .route(
      "/email/invoices/{id}/send",
      web::post().to(email::send_invoice_handler),
    )
    .route(
      "/email/invoices/{id}/reminder",
      web::post().to(email::send_reminder_handler),
    )
    .route("/email/test", web::post().to(email::send_test_email_handler));
}
