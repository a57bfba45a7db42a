//! Domain layer for the static credentials plugin.

pub mod client;
pub mod service;

pub use client::INVALID_CREDENTIALS_CHALLENGE;
pub use service::StaticCredentialsStrategy;
