//! Port definitions for infrastructure the core depends on.
//!
//! Adapters live in `mcpvet-probe` (network) and `mcpvet-directory`
//! (cache). Keeping the traits here lets every consumer be tested with
//! fakes and keeps ambient global client state out of the core.

mod cache;
mod clock;
mod dns;
mod http;
mod tls;

pub use cache::DirectoryCache;
pub use clock::{Clock, SystemClock, testing as clock_testing};
pub use dns::{DnsError, DnsResolverPort};
pub use http::{HttpProbe, ProbeError, ProbeResponse, ProbeResult};
pub use tls::{TlsCertificateInfo, TlsError, TlsInspectorPort};
