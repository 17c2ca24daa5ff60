//! `iquery` command-line backend.
//!
//! Each query runs as `iquery -c <host> -p <port> [-a] -n -q <query>`.
//! `-n` skips fetching results, which is all a `store(...)` needs.

use crate::error::{ClientError, Result};
use crate::executor::{Dialect, Endpoint, QueryExecutor, QueryOutcome};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Runs each query through the `iquery` client binary.
pub struct IqueryExecutor {
    program: PathBuf,
    endpoint: Endpoint,
    connected: bool,
}

impl IqueryExecutor {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_program("iquery", endpoint)
    }

    pub fn with_program(program: impl Into<PathBuf>, endpoint: Endpoint) -> Self {
        Self {
            program: program.into(),
            endpoint,
            connected: false,
        }
    }

    /// Arguments passed to `iquery` for one query.
    pub fn command_args(&self, query: &str, dialect: Dialect) -> Vec<String> {
        let mut args = vec![
            "-c".to_string(),
            self.endpoint.host.clone(),
            "-p".to_string(),
            self.endpoint.port.to_string(),
        ];
        if dialect == Dialect::Afl {
            args.push("-a".to_string());
        }
        args.push("-n".to_string());
        args.push("-q".to_string());
        args.push(query.to_string());
        args
    }
}

#[async_trait]
impl QueryExecutor for IqueryExecutor {
    fn name(&self) -> &'static str {
        "iquery"
    }

    async fn connect(&mut self) -> Result<()> {
        // iquery opens its own connection per invocation
        self.connected = true;
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, dialect: Dialect) -> Result<QueryOutcome> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(self.command_args(query, dialect))
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("iquery exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ClientError::Execution {
                query: query.to_string(),
                message,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(program = %self.program.display(), "iquery finished");

        Ok(QueryOutcome {
            elapsed: start.elapsed(),
            detail: Some(stdout).filter(|s| !s.is_empty()),
        })
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_afl_args() {
        let iquery = IqueryExecutor::new(Endpoint::default());
        assert_eq!(
            iquery.command_args("list()", Dialect::Afl),
            vec!["-c", "localhost", "-p", "1239", "-a", "-n", "-q", "list()"]
        );
    }

    #[test]
    fn test_aql_args_omit_afl_flag() {
        let iquery = IqueryExecutor::new(Endpoint::new("db", 5239));
        let args = iquery.command_args("select * from t", Dialect::Aql);
        assert!(!args.contains(&"-a".to_string()));
        assert_eq!(args[3], "5239");
    }
}
