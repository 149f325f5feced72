//! Aliyun DashScope provider
//!
//! Image synthesis on DashScope is asynchronous: a task is submitted, then
//! polled until it succeeds, and the first result URL is downloaded.

pub mod client;
pub mod types;

pub use client::DashScopeClient;
