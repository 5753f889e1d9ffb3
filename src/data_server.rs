//! # SPI-ACS data server access
//!
//! This module provides [`DataServer`], the HTTP client fetching raw light-curve payloads
//! from the SPI-ACS backend, and its [`DataServerConfig`].
//!
//! ## Overview
//!
//! - One URL template per [`DataTier`]; `{t0_isot}` and `{dt_s}` are replaced by the
//!   centre and the half width of the query window.
//! - A single GET per query, no retry: every failure the backend reports is tied to
//!   the query parameters, and network failures are left to the caller to retry.
//! - When the backend refuses a request for resource reasons it answers with a short
//!   human-readable text; such answers become [`LightCurveError::BackendRefused`].
//!
//! ## Usage
//!
//! ```rust, no_run
//! use spiacs::data_server::{DataServer, DataServerConfig};
//! use spiacs::parsers::DataTier;
//! use spiacs::query::LightCurveQuery;
//!
//! let config = DataServerConfig::new(
//!     "http://localhost:8000/genlc/ACS/{t0_isot}/{dt_s}",
//!     "http://localhost:8000/genlc/ACS/{t0_isot}/{dt_s}?format=json",
//! );
//! let server = DataServer::new(config).unwrap();
//! let query = LightCurveQuery::from_isot(
//!     "2003-03-15T23:27:40.0",
//!     "2003-03-16T00:03:15.0",
//!     Some(2.0),
//!     DataTier::Ordinary,
//! )
//! .unwrap();
//! let response = server.fetch_blocking(&query).unwrap();
//! println!("{} bytes, status {}", response.text.len(), response.status_code);
//! ```
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use itertools::Itertools;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    constants::{BACKEND_REFUSAL_MARKERS, REFUSAL_SCAN_MAX_BYTES},
    parsers::DataTier,
    query::LightCurveQuery,
    response::{raw_excerpt, RawResponse},
    spiacs_errors::LightCurveError,
};

/// Environment variable naming the configuration file, looked up first
pub const CONFIG_ENV_VAR: &str = "CDCI_SPIACS_PLUGIN_CONF_FILE";
/// Configuration file in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".spiacs_data_server_conf.yml";
/// Configuration file shipped with the crate sources
pub const PACKAGED_CONFIG_FILE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/config_dir/data_server_conf.yml");
/// Configuration file of a dispatcher deployment
pub const DISPATCHER_CONFIG_FILE: &str = "/dispatcher/conf/conf.d/spiacs_data_server_conf.yml";

fn default_timeout_seconds() -> u64 {
    60
}

/// Candidate configuration files, in resolution order: the file named by
/// [`CONFIG_ENV_VAR`] when it is set, then [`LOCAL_CONFIG_FILE`],
/// [`PACKAGED_CONFIG_FILE`] and [`DISPATCHER_CONFIG_FILE`].
pub fn config_search_paths() -> Vec<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .into_iter()
        .chain(
            [LOCAL_CONFIG_FILE, PACKAGED_CONFIG_FILE, DISPATCHER_CONFIG_FILE]
                .into_iter()
                .map(PathBuf::from),
        )
        .collect()
}

/// Location of the backend endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataServerConfig {
    /// URL template of the ordinary (consolidated, text) tier
    pub ordinary_url: String,
    /// URL template of the realtime (JSON) tier
    pub realtime_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl DataServerConfig {
    pub fn new(ordinary_url: impl Into<String>, realtime_url: impl Into<String>) -> Self {
        DataServerConfig {
            ordinary_url: ordinary_url.into(),
            realtime_url: realtime_url.into(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Load the first configuration file found in [`config_search_paths`].
    ///
    /// Errors
    /// ----------
    /// * [`LightCurveError::InvalidConfig`] listing every path tried when none exists,
    ///   or describing why the file found cannot be used.
    pub fn discover() -> Result<Self, LightCurveError> {
        Self::discover_from(&config_search_paths())
    }

    /// Load the first existing file among `candidates`
    pub fn discover_from(candidates: &[PathBuf]) -> Result<Self, LightCurveError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "loading data server configuration");
                Self::from_file(path)
            }
            None => Err(LightCurveError::InvalidConfig(format!(
                "no spiacs data server configuration found, tried: {}",
                candidates.iter().map(|path| path.display()).join(", ")
            ))),
        }
    }

    /// Read a configuration file: YAML for `.yml`/`.yaml` files, JSON otherwise
    pub fn from_file(path: &Path) -> Result<Self, LightCurveError> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            LightCurveError::InvalidConfig(format!("unable to read {}: {err}", path.display()))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, LightCurveError> {
        serde_json::from_str::<DataServerConfig>(content)
            .map_err(|err| LightCurveError::InvalidConfig(err.to_string()))?
            .validated()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, LightCurveError> {
        serde_yaml::from_str::<DataServerConfig>(content)
            .map_err(|err| LightCurveError::InvalidConfig(err.to_string()))?
            .validated()
    }

    fn validated(self) -> Result<Self, LightCurveError> {
        if self.timeout_seconds == 0 {
            return Err(LightCurveError::InvalidConfig(
                "timeout_seconds must be positive".into(),
            ));
        }
        Ok(self)
    }

    pub fn url_template(&self, tier: DataTier) -> &str {
        match tier {
            DataTier::Ordinary => &self.ordinary_url,
            DataTier::Realtime => &self.realtime_url,
        }
    }

    /// Request URL of `query`
    pub fn url_for(&self, query: &LightCurveQuery) -> String {
        self.url_template(query.data_tier)
            .replace("{t0_isot}", &query.reference_isot())
            .replace("{dt_s}", &query.half_span_seconds().to_string())
    }

    /// Form fields sent along with the GET, as the backend's web form submits them
    pub fn request_params(&self, query: &LightCurveQuery) -> [(&'static str, String); 3] {
        [
            (
                "requeststring",
                format!("{} {}", query.reference_isot(), query.half_span_seconds()),
            ),
            ("submit", "Submit".to_string()),
            ("generate", "ipnlc".to_string()),
        ]
    }
}

/// Reject the short texts the backend sends instead of data when it refuses a request.
pub(crate) fn check_backend_refusal(text: &str) -> Result<(), LightCurveError> {
    if text.len() >= REFUSAL_SCAN_MAX_BYTES {
        return Ok(());
    }
    if BACKEND_REFUSAL_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
    {
        return Err(LightCurveError::BackendRefused(raw_excerpt(text)));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DataServer {
    config: DataServerConfig,
    client: Client,
}

impl DataServer {
    pub fn new(config: DataServerConfig) -> Result<Self, LightCurveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(DataServer { config, client })
    }

    pub fn config(&self) -> &DataServerConfig {
        &self.config
    }

    /// Fetch the raw payload answering `query`.
    ///
    /// Errors
    /// ----------
    /// * [`LightCurveError::UpstreamTransport`] on connection, timeout or body read failures
    /// * [`LightCurveError::BackendRefused`] when the backend declines the request
    pub async fn fetch(&self, query: &LightCurveQuery) -> Result<RawResponse, LightCurveError> {
        let url = self.config.url_for(query);
        info!(%url, tier = %query.data_tier, "calling GET on data server");

        let response = self
            .client
            .get(&url)
            .query(&self.config.request_params(query))
            .send()
            .await?;
        let status_code = response.status().as_u16();
        let text = response.text().await?;

        debug!(
            status_code,
            len = text.len(),
            excerpt = %raw_excerpt(&text),
            "data server returned"
        );
        check_backend_refusal(&text)?;

        Ok(RawResponse { text, status_code })
    }

    /// Blocking variant of [`DataServer::fetch`], running on a private runtime.
    ///
    /// Must not be called from within an async context.
    pub fn fetch_blocking(&self, query: &LightCurveQuery) -> Result<RawResponse, LightCurveError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| LightCurveError::UpstreamTransport(err.to_string()))?;
        runtime.block_on(self.fetch(query))
    }
}
