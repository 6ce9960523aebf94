//! HTTP request handlers.

pub mod credit;
pub mod health;
pub mod image;
