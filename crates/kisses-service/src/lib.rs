//! HTTP API service for the kisses ledger and generation gateway.
//!
//! Exposes the credit ledger (`/credit`) and the image-generation gateway
//! (`/image`) consumed by the web client and by the trusted compute
//! backend that charges generations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod ratelimit;
pub mod routes;
pub mod state;
pub mod together;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
