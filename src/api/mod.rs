//! HTTP surface of the ladder service
//!
//! Player listing, lookup and registration, match submission, and the
//! server wrapper that runs them.

pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::ApiError;
pub use routes::create_router;
pub use server::HttpServer;
