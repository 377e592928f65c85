use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicer::{
  adapters::http::{ApiRouteDependencies, RequestIdMiddleware, configure_api_routes},
  application::email::InvoiceDispatch,
  domain::invoice::{
    DocumentRenderer, InvoiceService, InvoiceServiceDependencies, Mailer, TaxRate,
  },
  infrastructure::{
    config::{Config, DatabaseConfig, StorageBackend},
    mail::{LoggingMailer, MailTemplates, SmtpMailer},
    pdf::{Branding, PdfInvoiceRenderer},
    persistence::{
      memory::InMemoryStore,
      postgres::{PostgresClientRepository, PostgresInvoiceRepository, PostgresServiceRepository},
    },
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicer=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoicer");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let tax_rate = TaxRate::new(config.invoicing.tax_rate).context("Invalid invoicing.tax_rate")?;

  let deps = match config.database.backend {
    StorageBackend::Postgres => postgres_repositories(&config.database).await?,
    StorageBackend::Memory => {
      tracing::warn!("Using in-memory storage; data is lost on restart");
      let store = Arc::new(InMemoryStore::new());
      InvoiceServiceDependencies {
        client_repo: store.clone(),
        service_repo: store.clone(),
        invoice_repo: store,
      }
    }
  };
  let invoice_service = Arc::new(InvoiceService::new(deps, tax_rate));

  let renderer: Arc<dyn DocumentRenderer> = Arc::new(PdfInvoiceRenderer::new(Branding {
    title: config.invoicing.brand_title.clone(),
    tagline: config.invoicing.brand_tagline.clone(),
    tax_label: config.invoicing.tax_label.clone(),
  }));

  let mailer: Arc<dyn Mailer> = if config.mail.enabled {
    Arc::new(SmtpMailer::new(&config.mail).context("Failed to configure SMTP")?)
  } else {
    tracing::info!("Mail delivery disabled, outgoing mail is only logged");
    Arc::new(LoggingMailer::new())
  };

  let templates = MailTemplates::new(config.mail.company_display_name())
    .context("Failed to initialize mail templates")?;
  let dispatch = Arc::new(InvoiceDispatch::new(
    renderer.clone(),
    mailer,
    Arc::new(templates),
  ));

  let api = ApiRouteDependencies::build(invoice_service, renderer, dispatch);

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let api = api.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .service(web::scope("/api").configure(move |cfg| configure_api_routes(cfg, api)))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}

async fn postgres_repositories(
  config: &DatabaseConfig,
) -> anyhow::Result<InvoiceServiceDependencies> {
  tracing::info!("Connecting to database: {}", config.url);

  let pool = tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
      .connect(&config.url),
  )
  .await
  .map_err(|_| {
    anyhow::anyhow!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.connect_timeout_seconds
    )
  })?
  .with_context(|| format!("Could not connect to database at {}", config.url))?;

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  Ok(InvoiceServiceDependencies {
    client_repo: Arc::new(PostgresClientRepository::new(pool.clone())),
    service_repo: Arc::new(PostgresServiceRepository::new(pool.clone())),
    invoice_repo: Arc::new(PostgresInvoiceRepository::new(pool)),
  })
}
