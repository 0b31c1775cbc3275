//! Network probing for remote MCP servers.
//!
//! Three engines built on the ports defined in `mcpvet-core`:
//!
//! - [`ConnectionVerifier`]: staged DNS / TLS / HTTP / protocol checks
//!   for a single endpoint, plus chunked batch verification.
//! - [`AuthDiscoveryEngine`]: bearer-challenge and OAuth metadata
//!   discovery (RFC 9728 / RFC 8414).
//!
//! The production adapters (reqwest, tokio DNS, rustls) live here too.
//! Enable the `test-utils` feature to use the fake ports from
//! downstream integration tests.

pub mod batch;
pub mod discovery;
pub mod http;
pub mod net;
pub mod verifier;

pub use batch::DEFAULT_BATCH_CONCURRENCY;
pub use discovery::{AuthDiscoveryEngine, DISCOVERY_TIMEOUT};
pub use http::ReqwestProbe;
pub use net::{RustlsTlsInspector, TokioDnsResolver};
pub use verifier::{
    ConnectionVerifier, DEFAULT_HTTP_TIMEOUT, DefaultConnectionVerifier, TLS_PROBE_TIMEOUT,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Re-exports of the fake port implementations.
    pub use crate::http::testing::{CannedProbe, FakeProbe};
    pub use crate::net::testing::{FakeDns, FakeTls, FakeTlsOutcome};
}
