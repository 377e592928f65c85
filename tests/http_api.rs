use actix_web::{
  App,
  http::{StatusCode, header},
  test::{self, TestRequest},
  web,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;

use invoicer::{
  adapters::http::{ApiRouteDependencies, RequestIdMiddleware, configure_api_routes},
  application::email::InvoiceDispatch,
  domain::invoice::{DocumentRenderer, InvoiceService, InvoiceServiceDependencies, TaxRate},
  infrastructure::{
    mail::{LoggingMailer, MailTemplates},
    pdf::{Branding, PdfInvoiceRenderer},
    persistence::memory::InMemoryStore,
  },
};

fn dependencies() -> ApiRouteDependencies {
  let store = Arc::new(InMemoryStore::new());
  let service = Arc::new(InvoiceService::new(
    InvoiceServiceDependencies {
      client_repo: store.clone(),
      service_repo: store.clone(),
      invoice_repo: store,
    },
    TaxRate::new(dec!(18)).unwrap(),
  ));
  let renderer: Arc<dyn DocumentRenderer> = Arc::new(PdfInvoiceRenderer::new(Branding::default()));
  let dispatch = Arc::new(InvoiceDispatch::new(
    renderer.clone(),
    Arc::new(LoggingMailer::new()),
    Arc::new(MailTemplates::new("Northwind Studio").unwrap()),
  ));
  ApiRouteDependencies::build(service, renderer, dispatch)
}

macro_rules! app {
  () => {{
    let deps = dependencies();
    test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .service(web::scope("/api").configure(move |cfg| configure_api_routes(cfg, deps))),
    )
    .await
  }};
}

fn decimal(value: &Value) -> Decimal {
  match value {
    Value::String(s) => Decimal::from_str(s).unwrap(),
    other => Decimal::from_str(&other.to_string()).unwrap(),
  }
}

macro_rules! post_json {
  ($app:expr, $uri:expr, $body:expr) => {{
    let req = TestRequest::post().uri($uri).set_json($body).to_request();
    let resp = test::call_service(&$app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
  }};
}

macro_rules! seed_invoice {
  ($app:expr) => {{
    let (_, client) = post_json!(
      $app,
      "/api/clients",
      json!({"name": "Acme Ltd", "email": "billing@acme.test"})
    );
    let (_, service) = post_json!(
      $app,
      "/api/services",
      json!({"name": "Consulting", "rate": "100.00"})
    );
    let client_id = client["data"]["id"].as_str().unwrap().to_string();
    let service_id = service["data"]["id"].as_str().unwrap().to_string();
    let (status, invoice) = post_json!(
      $app,
      "/api/invoices",
      json!({
        "client_id": client_id,
        "invoice_date": "2026-10-01",
        "due_date": "2026-10-31",
        "items": [{"service_id": service_id, "quantity": "2"}]
      })
    );
    (status, client_id, invoice)
  }};
}

#[actix_web::test]
async fn test_health() {
  let app = app!();

  let resp = test::call_service(&app, TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["status"], "ok");
}

#[actix_web::test]
async fn test_create_invoice_returns_totals() {
  let app = app!();

  let (status, _, body) = seed_invoice!(app);

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], true);
  let invoice = &body["data"];
  assert!(invoice["invoice_number"].as_str().unwrap().starts_with("INV-"));
  assert_eq!(invoice["status"], "sent");
  assert_eq!(decimal(&invoice["subtotal"]), dec!(200));
  assert_eq!(decimal(&invoice["tax_amount"]), dec!(36));
  assert_eq!(decimal(&invoice["total_amount"]), dec!(236));
  assert_eq!(invoice["items"].as_array().unwrap().len(), 1);
  assert_eq!(invoice["items"][0]["service_name"], "Consulting");
}

#[actix_web::test]
async fn test_invoice_without_items_is_rejected() {
  let app = app!();
  let (_, client) = post_json!(app, "/api/clients", json!({"name": "Acme Ltd"}));

  let (status, body) = post_json!(
    app,
    "/api/invoices",
    json!({
      "client_id": client["data"]["id"],
      "invoice_date": "2026-10-01",
      "due_date": "2026-10-31",
      "items": []
    })
  );

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], false);
  assert_eq!(body["message"], "At least one line item is required");
}

#[actix_web::test]
async fn test_out_of_range_line_is_rejected() {
  let app = app!();
  let (_, client) = post_json!(app, "/api/clients", json!({"name": "Acme Ltd"}));
  let (_, service) = post_json!(
    app,
    "/api/services",
    json!({"name": "Consulting", "rate": "100.00"})
  );

  let (status, body) = post_json!(
    app,
    "/api/invoices",
    json!({
      "client_id": client["data"]["id"],
      "invoice_date": "2026-10-01",
      "due_date": "2026-10-31",
      "items": [{
        "service_id": service["data"]["id"],
        "quantity": "100000000000000000000",
        "rate": "10000000000"
      }]
    })
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], false);

  let (status, _) = post_json!(
    app,
    "/api/services",
    json!({"name": "Retainer", "rate": "10000000000"})
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_invoice_is_404_envelope() {
  let app = app!();

  let uri = format!("/api/invoices/{}", uuid::Uuid::new_v4());
  let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body,
    json!({"success": false, "message": "Invoice not found"})
  );
}

#[actix_web::test]
async fn test_malformed_path_and_body_use_envelope() {
  let app = app!();

  let resp = test::call_service(
    &app,
    TestRequest::get().uri("/api/invoices/not-a-uuid").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);

  let req = TestRequest::post()
    .uri("/api/clients")
    .insert_header(header::ContentType::json())
    .set_payload("{not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_pdf_download_headers_and_etag() {
  let app = app!();
  let (_, _, invoice) = seed_invoice!(app);
  let number = invoice["data"]["invoice_number"].as_str().unwrap().to_string();
  let uri = format!("/api/invoices/{}/pdf", invoice["data"]["id"].as_str().unwrap());

  let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get(header::CONTENT_TYPE).unwrap(),
    "application/pdf"
  );
  let disposition = resp
    .headers()
    .get(header::CONTENT_DISPOSITION)
    .unwrap()
    .to_str()
    .unwrap()
    .to_string();
  assert!(disposition.starts_with("attachment"));
  assert!(disposition.contains(&format!("invoice-{}.pdf", number)));
  let etag = resp.headers().get(header::ETAG).unwrap().clone();
  let body = test::read_body(resp).await;
  assert!(body.starts_with(b"%PDF-"));

  let req = TestRequest::get()
    .uri(&uri)
    .insert_header((header::IF_NONE_MATCH, etag))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
}

#[actix_web::test]
async fn test_referenced_client_delete_is_conflict() {
  let app = app!();
  let (_, client_id, invoice) = seed_invoice!(app);

  let uri = format!("/api/clients/{}", client_id);
  let resp = test::call_service(&app, TestRequest::delete().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let invoice_uri = format!("/api/invoices/{}", invoice["data"]["id"].as_str().unwrap());
  let resp = test::call_service(&app, TestRequest::delete().uri(&invoice_uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(&app, TestRequest::delete().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Client deleted successfully");
}

#[actix_web::test]
async fn test_send_then_mark_paid() {
  let app = app!();
  let (_, _, invoice) = seed_invoice!(app);
  let id = invoice["data"]["id"].as_str().unwrap().to_string();

  // No body at all is accepted for send
  let req = TestRequest::post()
    .uri(&format!("/api/email/invoices/{}/send", id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Invoice sent successfully");
  assert_eq!(body["data"]["recipient"], "billing@acme.test");
  assert_eq!(body["data"]["status"], "sent");

  let req = TestRequest::put()
    .uri(&format!("/api/invoices/{}/status", id))
    .set_json(json!({"status": "paid"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["status"], "paid");

  // Paid is terminal
  let req = TestRequest::put()
    .uri(&format!("/api/invoices/{}/status", id))
    .set_json(json!({"status": "sent"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_bulk_send_reports_each_invoice() {
  let app = app!();
  let (_, _, invoice) = seed_invoice!(app);
  let missing = uuid::Uuid::new_v4();

  let (status, body) = post_json!(
    app,
    "/api/email/invoices/bulk-send",
    json!({"invoiceIds": [invoice["data"]["id"], missing]})
  );

  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body["message"],
    "Bulk email sending completed. Successful: 1, Failed: 1"
  );
  assert_eq!(body["data"]["failed"][0]["invoiceId"], missing.to_string());

  let (status, body) = post_json!(
    app,
    "/api/email/invoices/bulk-send",
    json!({"invoiceIds": []})
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["message"],
    "invoiceIds array is required and cannot be empty"
  );
}

#[actix_web::test]
async fn test_test_email_requires_valid_address() {
  let app = app!();

  let (status, _) = post_json!(app, "/api/email/test", json!({"testEmail": "nope"}));
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) = post_json!(
    app,
    "/api/email/test",
    json!({"testEmail": "owner@northwind.test"})
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Test email sent successfully");
  assert_eq!(body["data"]["recipient"], "owner@northwind.test");
}
