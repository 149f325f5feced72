#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use image_gateway::catalog::ModelCatalog;
use image_gateway::providers::{
    Credentials, PollSettings, ProviderConfig, ProviderEndpoints, ProviderFactory,
};
use image_gateway::routes::configure_routes;
use image_gateway::state::AppState;

/// Bytes standing in for a generated PNG
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

/// Credentials every mock expects
pub fn test_credentials() -> Credentials {
    Credentials {
        cloudflare_account_id: "acct-123".to_string(),
        cloudflare_api_token: "cf-token".to_string(),
        modelscope_api_token: "ms-token".to_string(),
        dashscope_api_key: "ds-key".to_string(),
    }
}

/// Poll quickly so DashScope tests finish in milliseconds
pub fn fast_poll() -> PollSettings {
    PollSettings {
        timeout: Duration::from_millis(300),
        interval: Duration::from_millis(10),
    }
}

/// Factory whose providers all talk to `base_url`
pub fn factory_for(base_url: &str) -> ProviderFactory {
    let config = ProviderConfig::new(test_credentials())
        .with_endpoints(ProviderEndpoints::all(base_url))
        .with_poll(fast_poll())
        .with_request_timeout(Duration::from_secs(5));
    ProviderFactory::new(config).expect("Failed to create provider factory")
}

/// State backed by the built-in catalog and a mock provider base URL
pub fn state_for(base_url: &str) -> AppState {
    let catalog = ModelCatalog::builtin().expect("Built-in catalog should parse");
    AppState::new(catalog, factory_for(base_url))
}

/// Start the gateway on a free local port and return its base URL
pub async fn spawn_server(state: AppState) -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("Failed to find a free port")
        .port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let routes = configure_routes(Arc::new(state));
    tokio::spawn(warp::serve(routes).run(addr));

    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return format!("http://{}", addr);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Server did not start on {}", addr);
}

