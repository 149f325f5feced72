//! Core abstractions for the provider layer

pub mod config;
pub mod error;
pub mod provider;
pub mod types;
