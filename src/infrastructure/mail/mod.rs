pub mod logging_mailer;
pub mod smtp_mailer;
pub mod templates;

pub use logging_mailer::LoggingMailer;
pub use smtp_mailer::SmtpMailer;
pub use templates::MailTemplates;
