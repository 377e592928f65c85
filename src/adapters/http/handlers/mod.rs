pub mod clients;
pub mod email;
pub mod health;
pub mod invoices;
pub mod services;
