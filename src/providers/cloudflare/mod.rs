//! Cloudflare Workers AI provider
//!
//! Calls text-to-image models (Stable Diffusion, FLUX) through the
//! Workers AI REST API of a Cloudflare account.

pub mod client;
pub mod types;

pub use client::CloudflareClient;
