//! Image provider layer
//!
//! This module provides a unified interface over the third-party image
//! generation services the gateway forwards to: Cloudflare Workers AI,
//! ModelScope and Aliyun DashScope.

pub mod cloudflare;
pub mod core;
pub mod dashscope;
pub mod http;
pub mod modelscope;

// Re-export commonly used types
pub use self::core::{
    config::{Credentials, PollSettings, ProviderConfig, ProviderEndpoints},
    error::ImageError,
    provider::{ImageProvider, ProviderFactory, ProviderKind},
    types::{GenerationParams, ImageRequest, InvalidParam, Task, UnknownTask},
};
