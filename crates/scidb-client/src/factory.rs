//! Backend selection.

use crate::error::{ClientError, Result};
use crate::executor::{DryRunExecutor, Endpoint, QueryExecutor};
use crate::iquery::IqueryExecutor;
use crate::shim::ShimExecutor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which execution backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Shim,
    #[default]
    Iquery,
    DryRun,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Shim => "shim",
            Backend::Iquery => "iquery",
            Backend::DryRun => "dry-run",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "shim" => Ok(Backend::Shim),
            "iquery" => Ok(Backend::Iquery),
            "dry-run" | "dryrun" | "dry_run" => Ok(Backend::DryRun),
            other => Err(ClientError::UnknownBackend(other.to_string())),
        }
    }
}

/// Create an executor for the given backend.
pub fn build_executor(backend: Backend, endpoint: &Endpoint) -> Result<Box<dyn QueryExecutor>> {
    Ok(match backend {
        Backend::Shim => Box::new(ShimExecutor::new(endpoint)?),
        Backend::Iquery => Box::new(IqueryExecutor::new(endpoint.clone())),
        Backend::DryRun => Box::new(DryRunExecutor::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Dialect;

    #[test]
    fn test_parse_backend() {
        assert_eq!("shim".parse::<Backend>().unwrap(), Backend::Shim);
        assert_eq!("IQUERY".parse::<Backend>().unwrap(), Backend::Iquery);
        assert_eq!("dry_run".parse::<Backend>().unwrap(), Backend::DryRun);
        assert!(matches!(
            "odbc".parse::<Backend>(),
            Err(ClientError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_build_executor_names() {
        let endpoint = Endpoint::default();
        for backend in [Backend::Shim, Backend::Iquery, Backend::DryRun] {
            let executor = build_executor(backend, &endpoint).unwrap();
            assert_eq!(executor.name(), backend.as_str());
        }
    }

    #[test]
    fn test_boxed_dry_run_session() {
        let mut executor = build_executor(Backend::DryRun, &Endpoint::default()).unwrap();
        tokio_test::block_on(async {
            executor.connect().await.unwrap();
            let outcome = executor
                .execute_query("list('arrays')", Dialect::Afl)
                .await
                .unwrap();
            assert!(outcome.detail.is_none());
            executor.disconnect().await.unwrap();
        });
    }
}
