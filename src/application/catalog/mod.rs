//! Use cases for the service catalogue: the billable services that act as
//! rate templates for invoice lines.

pub mod create_service;
pub mod delete_service;
pub mod get_service;
pub mod list_services;
pub mod update_service;

pub use create_service::{CreateServiceUseCase, ServiceCommand};
pub use delete_service::{DeleteServiceCommand, DeleteServiceUseCase};
pub use get_service::{GetServiceCommand, GetServiceUseCase};
pub use list_services::ListServicesUseCase;
pub use update_service::{UpdateServiceCommand, UpdateServiceUseCase};
