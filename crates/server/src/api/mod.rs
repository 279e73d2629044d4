pub mod error;
pub mod handlers;
pub mod insights;
pub mod keywords;
pub mod middleware;
pub mod planning;
pub mod providers;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
