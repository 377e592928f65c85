use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;

use invoicer::{
  application::{
    catalog::{CreateServiceUseCase, DeleteServiceCommand, DeleteServiceUseCase, ServiceCommand},
    client::{ClientCommand, CreateClientUseCase},
    email::{
      InvoiceDispatch, SendInvoiceEmailCommand, SendInvoiceEmailUseCase,
      SendPaymentReminderCommand, SendPaymentReminderUseCase,
    },
    invoice::{
      ChangeInvoiceStatusCommand, ChangeInvoiceStatusUseCase, CreateInvoiceCommand,
      CreateInvoiceLineItemDto, CreateInvoiceUseCase, DownloadInvoicePdfCommand,
      DownloadInvoicePdfUseCase, ListInvoicesUseCase,
    },
  },
  domain::invoice::{
    DocumentRenderer, InvoiceError, InvoiceService, InvoiceServiceDependencies, InvoiceStatus,
    ReminderTier, TaxRate,
  },
  infrastructure::{
    mail::{LoggingMailer, MailTemplates},
    pdf::{Branding, PdfInvoiceRenderer},
    persistence::memory::InMemoryStore,
  },
};

struct Harness {
  service: Arc<InvoiceService>,
  renderer: Arc<dyn DocumentRenderer>,
  dispatch: Arc<InvoiceDispatch>,
}

fn harness() -> Harness {
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
  Harness {
    service,
    renderer,
    dispatch,
  }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_invoice_lifecycle_through_reminder_to_paid() {
  let h = harness();

  let client = CreateClientUseCase::new(h.service.clone())
    .execute(ClientCommand {
      name: "Acme Ltd".to_string(),
      email: Some("billing@acme.test".to_string()),
      phone: None,
      address: Some("1 Harbour Way".to_string()),
    })
    .await
    .unwrap();
  let design = CreateServiceUseCase::new(h.service.clone())
    .execute(ServiceCommand {
      name: "Design".to_string(),
      description: None,
      default_rate: dec!(75.00),
    })
    .await
    .unwrap();
  let hosting = CreateServiceUseCase::new(h.service.clone())
    .execute(ServiceCommand {
      name: "Hosting".to_string(),
      description: Some("Monthly".to_string()),
      default_rate: dec!(20.00),
    })
    .await
    .unwrap();

  let details = CreateInvoiceUseCase::new(h.service.clone())
    .execute(CreateInvoiceCommand {
      client_id: client.id,
      invoice_date: date(2026, 9, 1),
      due_date: date(2026, 9, 30),
      notes: Some("Thank you".to_string()),
      line_items: vec![
        CreateInvoiceLineItemDto {
          service_id: design.id,
          quantity: dec!(1.5),
          rate: None,
          description: Some("Logo refresh".to_string()),
        },
        CreateInvoiceLineItemDto {
          service_id: hosting.id,
          quantity: dec!(1),
          rate: Some(dec!(25.00)),
          description: None,
        },
      ],
    })
    .await
    .unwrap();

  // 112.50 + 25.00 = 137.50, tax 24.75
  assert_eq!(details.invoice.subtotal.amount(), dec!(137.50));
  assert_eq!(details.invoice.tax_amount.amount(), dec!(24.75));
  assert_eq!(details.invoice.total_amount.amount(), dec!(162.25));
  assert_eq!(details.items[0].display_description(), "Logo refresh");
  assert_eq!(details.items[1].display_description(), "Hosting");
  let invoice_id = details.invoice.id;

  let sent = SendInvoiceEmailUseCase::new(h.service.clone(), h.dispatch.clone())
    .execute_on(
      SendInvoiceEmailCommand {
        invoice_id,
        ..Default::default()
      },
      date(2026, 9, 2),
    )
    .await
    .unwrap();
  assert_eq!(sent.status, InvoiceStatus::Sent);
  assert_eq!(sent.recipient, "billing@acme.test");

  let reminded = SendPaymentReminderUseCase::new(h.service.clone(), h.dispatch.clone())
    .execute_on(
      SendPaymentReminderCommand {
        invoice_id,
        reminder_type: Some("final".to_string()),
      },
      date(2026, 10, 15),
    )
    .await
    .unwrap();
  assert_eq!(reminded.reminder_type, ReminderTier::Final);
  assert_eq!(reminded.invoice_status, InvoiceStatus::Overdue);

  let paid = ChangeInvoiceStatusUseCase::new(h.service.clone())
    .execute(ChangeInvoiceStatusCommand {
      invoice_id,
      new_status: "paid".to_string(),
    })
    .await
    .unwrap();
  assert_eq!(paid.status, InvoiceStatus::Paid);

  let reopened = ChangeInvoiceStatusUseCase::new(h.service.clone())
    .execute(ChangeInvoiceStatusCommand {
      invoice_id,
      new_status: "sent".to_string(),
    })
    .await;
  assert!(matches!(
    reopened,
    Err(InvoiceError::InvalidStatusTransition { .. })
  ));

  let document = DownloadInvoicePdfUseCase::new(h.service.clone(), h.renderer.clone())
    .execute(DownloadInvoicePdfCommand { invoice_id })
    .await
    .unwrap();
  assert_eq!(document.content_type, "application/pdf");
  assert_eq!(
    document.filename,
    format!("invoice-{}.pdf", details.invoice.invoice_number)
  );

  // Services billed on an invoice stay put
  let removal = DeleteServiceUseCase::new(h.service.clone())
    .execute(DeleteServiceCommand {
      service_id: design.id,
    })
    .await;
  assert!(matches!(removal, Err(InvoiceError::ReferencedRecord(_))));

  let listed = ListInvoicesUseCase::new(h.service.clone())
    .execute()
    .await
    .unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].client_name, "Acme Ltd");
  assert_eq!(listed[0].invoice.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_numbers_are_sequential() {
  let h = harness();
  let client = CreateClientUseCase::new(h.service.clone())
    .execute(ClientCommand {
      name: "Acme Ltd".to_string(),
      email: None,
      phone: None,
      address: None,
    })
    .await
    .unwrap();
  let service = CreateServiceUseCase::new(h.service.clone())
    .execute(ServiceCommand {
      name: "Support".to_string(),
      description: None,
      default_rate: dec!(10),
    })
    .await
    .unwrap();
  let create = CreateInvoiceUseCase::new(h.service.clone());

  let mut numbers = Vec::new();
  for _ in 0..3 {
    let details = create
      .execute(CreateInvoiceCommand {
        client_id: client.id,
        invoice_date: date(2026, 10, 1),
        due_date: date(2026, 10, 1),
        notes: None,
        line_items: vec![CreateInvoiceLineItemDto {
          service_id: service.id,
          quantity: dec!(1),
          rate: None,
          description: None,
        }],
      })
      .await
      .unwrap();
    numbers.push(details.invoice.invoice_number.value());
  }

  let suffixes: Vec<&str> = numbers.iter().map(|n| &n[n.len() - 4..]).collect();
  assert_eq!(suffixes, vec!["0001", "0002", "0003"]);

  // Without an address on file there is nobody to send to
  let unsent = SendInvoiceEmailUseCase::new(h.service.clone(), h.dispatch.clone())
    .execute(SendInvoiceEmailCommand {
      invoice_id: h.service.list_invoices().await.unwrap()[0].invoice.id,
      ..Default::default()
    })
    .await;
  assert!(matches!(unsent, Err(InvoiceError::MissingRecipient(_))));
}
