//! Core types for the kisses credit ledger and generation gateway.
//!
//! This crate provides the foundational types shared by the store, service,
//! and client crates:
//!
//! - **Accounts**: `AccountId`, the tagged consumer / creator-model identifier
//! - **Amounts**: `KissAmounts`, the fixed costs and grants of the ledger
//! - **Presets**: `Lora`, the style-preset catalog for image generation
//!
//! # Kiss Unit
//!
//! **Kisses** are the in-app credit unit:
//!
//! - A new consumer account starts with a 10-kiss welcome grant
//! - One image generation costs the consumer 10 kisses
//! - The preset's creator earns 2 kisses per generation
//!
//! Balances are stored as `i64` integers; there are no fractional kisses.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod amounts;
pub mod lora;

pub use account::{AccountId, ParseAccountIdError, SEPARATOR};
pub use amounts::KissAmounts;
pub use lora::{Lora, Suggestion, LORAS};
