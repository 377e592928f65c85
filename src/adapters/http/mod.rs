pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use dtos::ApiResponse;
pub use errors::ApiError;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{ApiRouteDependencies, configure_api_routes};
