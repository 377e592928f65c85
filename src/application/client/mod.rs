pub mod create_client;
pub mod delete_client;
pub mod get_client;
pub mod list_clients;
pub mod update_client;

pub use create_client::{ClientCommand, CreateClientUseCase};
pub use delete_client::{DeleteClientCommand, DeleteClientUseCase};
pub use get_client::{GetClientCommand, GetClientUseCase};
pub use list_clients::ListClientsUseCase;
pub use update_client::{UpdateClientCommand, UpdateClientUseCase};
