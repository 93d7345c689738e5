//! Re-exports of all error types in this crate.

pub use crate::client::{FetchError, MomoClientError};
pub use crate::creds::CredsError;
pub use crate::dashboard::DashboardError;
