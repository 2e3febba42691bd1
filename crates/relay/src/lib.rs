//! CertMint minting relay composition root
//!
//! Sits between browser clients and the custodial minting provider.
//! Validates requests, attaches the provider credentials that must not
//! reach the client, and forwards. Two operations: submit a mint and
//! check a mint's status.

use axum::Router;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod routes;

use certmint_common::Error;

/// Upstream minting provider configuration
#[derive(Clone)]
pub struct RelayConfig {
    /// Base URL of the minting provider API
    pub upstream_base_url: String,
    /// Provider API key
    pub api_key: String,
    /// Provider client secret
    pub client_secret: String,
    /// Provider project id
    pub project_id: String,
    /// Collection to mint into
    pub collection_id: String,
    /// Port for the local server
    pub port: u16,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("upstream_base_url", &self.upstream_base_url)
            .field("api_key", &"[REDACTED]")
            .field("client_secret", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("collection_id", &self.collection_id)
            .field("port", &self.port)
            .finish()
    }
}

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://crossmint.com/api/2022-06-09";

impl RelayConfig {
    /// Create relay config from environment variables
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let require = |name: &str| {
            std::env::var(name)
                .map_err(|_| Error::Internal(format!("{} environment variable is required", name)))
        };

        Ok(Self {
            upstream_base_url: std::env::var("CROSSMINT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            api_key: require("CROSSMINT_API_KEY")?,
            client_secret: require("CROSSMINT_CLIENT_SECRET")?,
            project_id: require("CROSSMINT_PROJECT_ID")?,
            collection_id: require("CROSSMINT_COLLECTION_ID")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8787),
        })
    }
}

/// Shared relay state
#[derive(Clone)]
pub struct RelayState {
    pub http: reqwest::Client,
    pub config: RelayConfig,
}

/// Create the relay router. CORS is permissive: the relay is called
/// directly from browser clients on arbitrary origins, and preflighted
/// JSON POSTs must succeed.
pub fn create_app(config: RelayConfig) -> Router {
    let state = RelayState {
        http: reqwest::Client::new(),
        config,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(routes::create_routes().with_state(state))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
