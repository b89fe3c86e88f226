//! Fleet v1 API client.
//!
//! Reads `GET {endpoint}/fleet/v1/state`, following `nextPageToken`
//! until the server stops returning one. Each page and the whole
//! paginated read are both bounded by the configured request timeout;
//! connection setup (including the SOCKS and TLS handshakes) by the
//! connect budget.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use fleetwatch_core::{ClusterSnapshot, FleetwatchConfig, UnitState};

use crate::error::{SourceError, SourceResult};
use crate::{FetchFuture, StateSource};

/// Upper bound on pages followed in one read.
pub const MAX_PAGES: usize = 1000;

const STATE_PATH: &str = "fleet/v1/state";

/// One page of the fleet state listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatePage {
    states: Vec<UnitState>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// HTTP client for the fleet unit-state API.
#[derive(Debug, Clone)]
pub struct FleetApiClient {
    http: reqwest::Client,
    state_url: url::Url,
    read_timeout: Duration,
}

impl FleetApiClient {
    /// Build a client from validated configuration.
    pub fn new(config: &FleetwatchConfig) -> SourceResult<Self> {
        let endpoint = config
            .endpoint_url()
            .map_err(|e| SourceError::InvalidEndpoint(e.to_string()))?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.timeouts.connect_budget())
            .timeout(config.timeouts.request())
            .pool_idle_timeout(Duration::from_secs(30))
            .user_agent(concat!("fleetwatch/", env!("CARGO_PKG_VERSION")));

        if let Some(address) = &config.socks_proxy {
            info!(proxy = %address, "using socks proxy for fleet api");
            let proxy = reqwest::Proxy::all(format!("socks5h://{address}"))
                .map_err(|e| SourceError::Client(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            http,
            state_url: state_url(&endpoint)?,
            read_timeout: config.timeouts.request(),
        })
    }

    /// Full URL of the state listing.
    pub fn state_url(&self) -> &url::Url {
        &self.state_url
    }

    async fn fetch_bounded(&self) -> SourceResult<ClusterSnapshot> {
        match tokio::time::timeout(self.read_timeout, self.fetch_all()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.read_timeout, "fleet state read timed out");
                Err(SourceError::Timeout(self.read_timeout))
            }
        }
    }

    async fn fetch_all(&self) -> SourceResult<ClusterSnapshot> {
        let mut snapshot = ClusterSnapshot::new();
        let mut token: Option<String> = None;

        for page_index in 0..MAX_PAGES {
            let page = self.fetch_page(token.as_deref()).await?;
            debug!(page = page_index, units = page.states.len(), "fetched fleet state page");

            for unit in page.states {
                snapshot.insert(unit);
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => token = Some(next),
                None => {
                    debug!(units = snapshot.len(), "fleet state read complete");
                    return Ok(snapshot);
                }
            }
        }

        Err(SourceError::TooManyPages(MAX_PAGES))
    }

    async fn fetch_page(&self, token: Option<&str>) -> SourceResult<StatePage> {
        let mut request = self.http.get(self.state_url.clone());
        if let Some(token) = token {
            request = request.query(&[("nextPageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        decode_page(&bytes)
    }
}

impl StateSource for FleetApiClient {
    fn fetch_unit_states(&self) -> FetchFuture<'_> {
        Box::pin(self.fetch_bounded())
    }
}

fn decode_page(bytes: &[u8]) -> SourceResult<StatePage> {
    serde_json::from_slice(bytes).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Append the state path to the endpoint, keeping any path prefix it has.
fn state_url(endpoint: &url::Url) -> SourceResult<url::Url> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(STATE_PATH)
        .map_err(|e| SourceError::InvalidEndpoint(e.to_string()))
}
