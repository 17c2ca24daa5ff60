//! The execution contract and the dry-run backend.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Query language flavor understood by SciDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Afl,
    Aql,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Afl => "afl",
            Dialect::Aql => "aql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host and port of a SciDB coordinator (or its shim).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("localhost", 1239)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// What came back from one successful query.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub elapsed: Duration,
    /// Backend-specific detail (shim query id, iquery stdout)
    pub detail: Option<String>,
}

/// A database session able to run one query at a time.
#[async_trait]
pub trait QueryExecutor: Send {
    /// Short backend label for logs.
    fn name(&self) -> &'static str;

    async fn connect(&mut self) -> Result<()>;

    /// Run one query to completion. Returns only after the database has
    /// finished with it.
    async fn execute_query(&mut self, query: &str, dialect: Dialect) -> Result<QueryOutcome>;

    async fn disconnect(&mut self) -> Result<()>;
}

/// Prints queries instead of running them.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    connected: bool,
    executed: usize,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> usize {
        self.executed
    }
}

#[async_trait]
impl QueryExecutor for DryRunExecutor {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, _dialect: Dialect) -> Result<QueryOutcome> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }
        let start = Instant::now();
        println!("{}", query);
        self.executed += 1;
        Ok(QueryOutcome {
            elapsed: start.elapsed(),
            detail: None,
        })
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }
}
