//! SciDB query execution.
//!
//! The splitter needs exactly three operations from a database session:
//! connect, execute one query, disconnect. [`QueryExecutor`] is that
//! contract; the backends implement it over the HTTP shim, the `iquery`
//! command-line client, or not at all (dry run).

pub mod error;
pub mod executor;
pub mod factory;
pub mod iquery;
pub mod shim;

pub use error::{ClientError, Result};
pub use executor::{Dialect, DryRunExecutor, Endpoint, QueryExecutor, QueryOutcome};
pub use factory::{build_executor, Backend};
pub use iquery::IqueryExecutor;
pub use shim::ShimExecutor;
