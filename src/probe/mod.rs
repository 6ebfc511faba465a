//! HTTP probe executor.
//!
//! A probe is one bounded HEAD/GET attempt. Every probe runs under a hard deadline; on
//! expiry the request future is dropped, which cancels the underlying connection.
//! Failures are folded into [`ProbeOutcome`] instead of being returned as errors.

pub mod config;
pub mod executor;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


pub use config::ProberConfig;
pub use executor::{HttpProber, ProbeBuildError, Prober};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockProber, MockResponse};
pub use types::{ProbeMethod, ProbeOutcome, ProbeRequest, is_success_status};
