//! ModelScope API-Inference provider

pub mod client;
pub mod types;

pub use client::ModelScopeClient;
