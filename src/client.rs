use std::time::Duration;

use reqwest::blocking::RequestBuilder;
use serde::Deserialize;

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::graph::{Edge, GraphClient};
use crate::query::Query;

/// A blocking `Client` to make requests to the Graph API.
///
/// This client is built on top of a [`reqwest::blocking::Client`], so as per that
/// documentation it is advised you create a single one and **reuse** it.
#[derive(Clone)]
pub struct HttpGraphClient {
    client: reqwest::blocking::Client,
    base_url: String,
    version: String,
    access_token: String,
}

impl HttpGraphClient {
    /// Creates a new client for the Graph API from the `[graph]` settings.
    ///
    /// # Example
    /// ```rust,no_run
    /// use groupstats::{GraphConfig, HttpGraphClient};
    ///
    /// let settings = GraphConfig {
    ///     access_token: "token".to_string(),
    ///     ..GraphConfig::default()
    /// };
    /// let client = HttpGraphClient::new(&settings).unwrap();
    /// ```
    pub fn new(settings: &GraphConfig) -> Result<Self, GraphError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, settings))
    }

    /// Creates a new client for the Graph API with the given backing
    /// [`reqwest::blocking::Client`].
    pub fn with_client(client: reqwest::blocking::Client, settings: &GraphConfig) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            version: settings.version.trim_matches('/').to_string(),
            access_token: settings.access_token.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.version.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}/{}", self.base_url, self.version, path)
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Edge, GraphError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        log::debug!("Graph responded {} with {} bytes", status, body.len());
        parse_body(status.as_u16(), status.is_success(), &body)
    }
}

impl GraphClient for HttpGraphClient {
    fn get(&self, path: &str, query: &Query) -> Result<Edge, GraphError> {
        if self.access_token.is_empty() {
            return Err(GraphError::Client("no access token configured".to_string()));
        }

        let url = self.endpoint(path);
        log::debug!("GET {}", url);
        self.send(
            self.client
                .get(url)
                .query(query)
                .query(&[("access_token", self.access_token.as_str())]),
        )
    }

    fn next(&self, edge: &Edge) -> Result<Option<Edge>, GraphError> {
        // Next links already carry the access token and the original query.
        match edge.next_url() {
            Some(url) => self.send(self.client.get(url)).map(Some),
            None => Ok(None),
        }
    }
}

/// Turns a Graph response body into an [`Edge`], surfacing the API's error
/// object when there is one.
fn parse_body(status: u16, success: bool, body: &str) -> Result<Edge, GraphError> {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ApiError,
    }

    #[derive(Deserialize)]
    struct ApiError {
        message: String,
        #[serde(rename = "type")]
        kind: Option<String>,
        code: Option<i64>,
    }

    if let Ok(ErrorEnvelope { error }) = serde_json::from_str(body) {
        return Err(GraphError::Response {
            code: error.code,
            kind: error.kind,
            message: error.message,
        });
    }

    if !success {
        return Err(GraphError::Response {
            code: Some(i64::from(status)),
            kind: None,
            message: format!("unexpected HTTP status {}", status),
        });
    }

    Ok(serde_json::from_str(body)?)
}
