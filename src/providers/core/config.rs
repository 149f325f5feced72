//! Provider credentials and connection settings

use std::fmt;
use std::time::Duration;

pub const CLOUDFLARE_BASE_URL: &str = "https://api.cloudflare.com";
pub const MODELSCOPE_BASE_URL: &str = "https://api-inference.modelscope.cn";
pub const DASHSCOPE_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// API credentials for every provider, read once at startup
///
/// Values are opaque and may be empty; an empty credential only fails
/// when the provider rejects the call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub cloudflare_account_id: String,
    pub cloudflare_api_token: String,
    pub modelscope_api_token: String,
    pub dashscope_api_key: String,
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cloudflare_account_id", &self.cloudflare_account_id)
            .field("cloudflare_api_token", &redact(&self.cloudflare_api_token))
            .field("modelscope_api_token", &redact(&self.modelscope_api_token))
            .field("dashscope_api_key", &redact(&self.dashscope_api_key))
            .finish()
    }
}

/// Base URLs of the provider APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub cloudflare: String,
    pub modelscope: String,
    pub dashscope: String,
}

impl ProviderEndpoints {
    /// Point every provider at the same base URL
    pub fn all(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            cloudflare: base_url.clone(),
            modelscope: base_url.clone(),
            dashscope: base_url,
        }
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            cloudflare: CLOUDFLARE_BASE_URL.to_string(),
            modelscope: MODELSCOPE_BASE_URL.to_string(),
            dashscope: DASHSCOPE_BASE_URL.to_string(),
        }
    }
}

/// How long and how often to poll asynchronous provider tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(5),
        }
    }
}

/// Everything a provider client needs besides the model name
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub credentials: Credentials,
    pub endpoints: ProviderEndpoints,
    pub poll: PollSettings,
    /// Overall timeout of a single provider HTTP request
    pub request_timeout: Duration,
}

impl ProviderConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: ProviderEndpoints::default(),
            poll: PollSettings::default(),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
