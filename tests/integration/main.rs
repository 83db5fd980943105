//! Integration tests: the client against a mocked library backend

mod api_tests;
mod flow_tests;

use std::sync::Arc;

use library_admin::{api::ApiClient, config::ApiConfig, services::Services};
use wiremock::MockServer;

/// Services pointed at the mock server's `/api` prefix
pub fn services_for(server: &MockServer) -> Services {
    let config = ApiConfig {
        base_url: format!("{}/api", server.uri()),
        ..ApiConfig::default()
    };
    let api = ApiClient::new(&config).expect("client");
    Services::new(Arc::new(api))
}
