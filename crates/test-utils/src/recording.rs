//! A stand-in SciDB session that records what it is asked to do.

use async_trait::async_trait;
use scidb_client::{ClientError, Dialect, QueryExecutor, QueryOutcome};
use std::sync::{Arc, Mutex};

/// When the recording executor should reject a query.
#[derive(Debug, Clone, Default)]
pub enum FailOn {
    #[default]
    Never,
    /// Fail the n-th query (0-based)
    Call(usize),
    /// Fail any query containing this text
    Contains(String),
    /// Fail `connect`
    Connect,
}

/// Everything the executor saw, shared with the test.
#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    pub connects: usize,
    pub disconnects: usize,
    /// Queries that were attempted, including the failing one
    pub queries: Vec<String>,
    pub dialects: Vec<Dialect>,
}

/// Records queries instead of running them.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    log: Arc<Mutex<SessionLog>>,
    fail_on: FailOn,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fail_on: FailOn) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    /// Snapshot of the log so far.
    pub fn log(&self) -> SessionLog {
        self.log.lock().expect("session log poisoned").clone()
    }

    /// Handle to the live log, usable after the executor is boxed.
    pub fn log_handle(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn connect(&mut self) -> scidb_client::Result<()> {
        if matches!(self.fail_on, FailOn::Connect) {
            return Err(ClientError::Connect {
                endpoint: "recording".to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.log.lock().expect("session log poisoned").connects += 1;
        Ok(())
    }

    async fn execute_query(
        &mut self,
        query: &str,
        dialect: Dialect,
    ) -> scidb_client::Result<QueryOutcome> {
        let mut log = self.log.lock().expect("session log poisoned");
        let call = log.queries.len();
        log.queries.push(query.to_string());
        log.dialects.push(dialect);

        let fail = match &self.fail_on {
            FailOn::Never | FailOn::Connect => false,
            FailOn::Call(n) => *n == call,
            FailOn::Contains(text) => query.contains(text.as_str()),
        };
        if fail {
            return Err(ClientError::Execution {
                query: query.to_string(),
                message: "SCIDB_SE_EXECUTION::SCIDB_LE_ILLEGAL_OPERATION".to_string(),
            });
        }

        Ok(QueryOutcome::default())
    }

    async fn disconnect(&mut self) -> scidb_client::Result<()> {
        self.log.lock().expect("session log poisoned").disconnects += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_through_boxed_executor() {
        let recorder = RecordingExecutor::failing(FailOn::Call(1));
        let log = recorder.log_handle();
        let mut boxed: Box<dyn QueryExecutor> = Box::new(recorder);

        boxed.connect().await.unwrap();
        boxed.execute_query("list()", Dialect::Afl).await.unwrap();
        assert!(boxed.execute_query("show(a)", Dialect::Afl).await.is_err());
        boxed.disconnect().await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.queries, vec!["list()", "show(a)"]);
        assert_eq!((log.connects, log.disconnects), (1, 1));
    }

    #[tokio::test]
    async fn test_connect_failure_not_counted() {
        let mut recorder = RecordingExecutor::failing(FailOn::Connect);
        assert!(recorder.connect().await.is_err());
        assert_eq!(recorder.log().connects, 0);
    }
}
