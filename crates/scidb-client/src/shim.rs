//! SciDB shim (HTTP) backend.
//!
//! The shim exposes sessions over plain GET requests:
//! `/new_session` returns a session id, `/execute_query?id=..&query=..`
//! runs one AFL statement, `/release_session?id=..` closes the session.
//! Errors come back as non-2xx responses with the SciDB message as body.

use crate::error::{ClientError, Result};
use crate::executor::{Dialect, Endpoint, QueryExecutor, QueryOutcome};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Storing a 7500x7500 tile can take a while; the shim answers only once
/// the query has finished.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Executes queries through a SciDB shim server.
pub struct ShimExecutor {
    client: reqwest::Client,
    base_url: String,
    session: Option<String>,
}

impl ShimExecutor {
    pub fn new(endpoint: &Endpoint) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &Endpoint, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("http://{}:{}", endpoint.host, endpoint.port),
            session: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<(bool, String)> {
        let response = self.client.get(self.url(path)).query(params).send().await?;
        let ok = response.status().is_success();
        let body = response.text().await?;
        Ok((ok, body.trim().to_string()))
    }
}

#[async_trait]
impl QueryExecutor for ShimExecutor {
    fn name(&self) -> &'static str {
        "shim"
    }

    async fn connect(&mut self) -> Result<()> {
        let (ok, body) = self
            .get("new_session", &[])
            .await
            .map_err(|e| ClientError::Connect {
                endpoint: self.base_url.clone(),
                message: e.to_string(),
            })?;

        if !ok || body.is_empty() {
            return Err(ClientError::Connect {
                endpoint: self.base_url.clone(),
                message: if body.is_empty() {
                    "empty session id".to_string()
                } else {
                    body
                },
            });
        }

        debug!(session = %body, url = %self.base_url, "Opened shim session");
        self.session = Some(body);
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, dialect: Dialect) -> Result<QueryOutcome> {
        if dialect != Dialect::Afl {
            return Err(ClientError::UnsupportedDialect {
                backend: "shim",
                dialect: dialect.as_str(),
            });
        }
        let session = self.session.clone().ok_or(ClientError::NotConnected)?;

        let start = Instant::now();
        let (ok, body) = self
            .get("execute_query", &[("id", session.as_str()), ("query", query)])
            .await?;

        if !ok {
            return Err(ClientError::Execution {
                query: query.to_string(),
                message: body,
            });
        }

        Ok(QueryOutcome {
            elapsed: start.elapsed(),
            detail: Some(body).filter(|b| !b.is_empty()),
        })
    }

    async fn disconnect(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        let (ok, body) = self
            .get("release_session", &[("id", session.as_str())])
            .await?;
        if !ok {
            warn!(session = %session, message = %body, "Shim refused to release session");
        }
        Ok(())
    }
}
