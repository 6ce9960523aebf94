//! Client SDK for the kisses service.
//!
//! Used by the trusted compute backend that actually charges generations.
//! The backend holds the shared admin secret; end-user clients never see
//! this crate's charge calls.
//!
//! # Charge ordering
//!
//! The backend charges **before** generating and compensates a failed
//! generation with a refund, so a consumer can never get a free image and
//! a transient provider failure never costs them kisses.
//! [`KissesClient::generate_charged`] implements that sequence.
//!
//! # Example
//!
//! ```no_run
//! use kisses_client::{GenerateRequest, KissesClient};
//!
//! # async fn example() -> Result<(), kisses_client::ClientError> {
//! let client = KissesClient::new("http://kisses:8080", "admin-secret");
//!
//! let balance = client.get_balance("0xabc").await?;
//! if balance >= 10 {
//!     let image = client
//!         .generate_charged(
//!             &GenerateRequest::new("the moon", "flux-tarot-v1", 42),
//!             "multimodalart",
//!             "flux-tarot-v1",
//!             "0xabc",
//!         )
//!         .await?;
//!     println!("final prompt: {}", image.prompt);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod archive;
pub mod client;
pub mod error;
pub mod types;

pub use archive::{ArchiveError, WalrusArchiver};
pub use client::{ClientOptions, KissesClient};
pub use error::ClientError;
pub use types::{ChargeReceipt, CreatorBalance, GenerateRequest, GenerateResponse};
