//! Web API module for listgate.
//!
//! Exposes the list, membership and mail-intake operations over HTTP.
//! Every response is `200 OK` with a JSON body holding either an outcome
//! code or an array.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
