//! DNS and TLS adapters.
//!
//! The DNS resolver rides on tokio's built-in lookup. The TLS inspector
//! opens a real handshake with the webpki root store and decodes the
//! leaf certificate; the verifier downgrades any failure here to a
//! warning because self-signed internal deployments are expected.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

use mcpvet_core::ports::{DnsError, DnsResolverPort, TlsCertificateInfo, TlsError, TlsInspectorPort};

/// Default bound for a single DNS lookup.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolver backed by `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy)]
pub struct TokioDnsResolver {
    timeout: Duration,
}

impl TokioDnsResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DNS_TIMEOUT,
        }
    }
}

impl Default for TokioDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolverPort for TokioDnsResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, DnsError> {
        // Port 0 satisfies ToSocketAddrs; only the addresses matter.
        let lookup = tokio::net::lookup_host((host, 0));
        match tokio::time::timeout(self.timeout, lookup).await {
            Err(_) => Err(DnsError::Timeout(host.to_string())),
            Ok(Err(e)) => Err(DnsError::ResolutionFailed {
                host: host.to_string(),
                message: e.to_string(),
            }),
            Ok(Ok(addrs)) => {
                let ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
                if ips.is_empty() {
                    Err(DnsError::NoRecords(host.to_string()))
                } else {
                    Ok(ips)
                }
            }
        }
    }
}

/// TLS inspector backed by rustls with the webpki root store.
pub struct RustlsTlsInspector {
    config: Arc<ClientConfig>,
}

impl RustlsTlsInspector {
    #[must_use]
    pub fn new() -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for RustlsTlsInspector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TlsInspectorPort for RustlsTlsInspector {
    async fn inspect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<TlsCertificateInfo, TlsError> {
        let handshake = self.handshake(host, port);
        match tokio::time::timeout(timeout, handshake).await {
            Err(_) => Err(TlsError::Timeout(host.to_string())),
            Ok(result) => result,
        }
    }
}

impl RustlsTlsInspector {
    async fn handshake(&self, host: &str, port: u16) -> Result<TlsCertificateInfo, TlsError> {
        let tcp = TcpStream::connect((host, port))
            .await
            .map_err(|e| TlsError::ConnectFailed {
                host: host.to_string(),
                port,
                message: e.to_string(),
            })?;

        let server_name = rustls_pki_types::ServerName::try_from(host.to_string()).map_err(
            |e| TlsError::HandshakeFailed {
                host: host.to_string(),
                message: e.to_string(),
            },
        )?;

        let connector = TlsConnector::from(Arc::clone(&self.config));
        let stream =
            connector
                .connect(server_name, tcp)
                .await
                .map_err(|e| TlsError::HandshakeFailed {
                    host: host.to_string(),
                    message: e.to_string(),
                })?;

        let (_, connection) = stream.get_ref();
        let leaf = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| TlsError::NoCertificate(host.to_string()))?;

        decode_certificate(leaf.as_ref(), host)
    }
}

/// Decode issuer/subject/validity out of a DER certificate.
fn decode_certificate(der: &[u8], host: &str) -> Result<TlsCertificateInfo, TlsError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|_| TlsError::NoCertificate(host.to_string()))?;

    let validity = cert.validity();
    let not_before = asn1_to_utc(validity.not_before.timestamp(), host)?;
    let not_after = asn1_to_utc(validity.not_after.timestamp(), host)?;

    Ok(TlsCertificateInfo {
        issuer: cert.issuer().to_string(),
        subject: cert.subject().to_string(),
        not_before,
        not_after,
    })
}

fn asn1_to_utc(timestamp: i64, host: &str) -> Result<DateTime<Utc>, TlsError> {
    DateTime::from_timestamp(timestamp, 0).ok_or_else(|| TlsError::NoCertificate(host.to_string()))
}

// ============================================================================
// Fake ports for Testing
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::{
        DateTime, DnsError, DnsResolverPort, Duration, IpAddr, TlsCertificateInfo, TlsError,
        TlsInspectorPort, Utc, async_trait,
    };
    use chrono::Duration as ChronoDuration;

    /// A resolver with a fixed host table.
    #[derive(Default)]
    pub struct FakeDns {
        hosts: Vec<(String, Vec<IpAddr>)>,
    }

    impl FakeDns {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Resolve a host to one loopback-ish address.
        #[must_use]
        pub fn with_host(mut self, host: &str) -> Self {
            self.hosts
                .push((host.to_string(), vec![IpAddr::from([93, 184, 216, 34])]));
            self
        }
    }

    #[async_trait]
    impl DnsResolverPort for FakeDns {
        async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, DnsError> {
            self.hosts
                .iter()
                .find(|(h, _)| h == host)
                .map(|(_, ips)| ips.clone())
                .ok_or_else(|| DnsError::ResolutionFailed {
                    host: host.to_string(),
                    message: "NXDOMAIN".to_string(),
                })
        }
    }

    /// Outcome a fake TLS inspection should produce.
    pub enum FakeTlsOutcome {
        /// Currently valid certificate.
        Valid,
        /// Certificate expired a month ago.
        Expired,
        /// Handshake failure (self-signed, protocol mismatch, ...).
        HandshakeFailure,
    }

    /// Inspector returning one fixed outcome for every host.
    pub struct FakeTls {
        outcome: FakeTlsOutcome,
    }

    impl FakeTls {
        #[must_use]
        pub const fn new(outcome: FakeTlsOutcome) -> Self {
            Self { outcome }
        }

        fn certificate(not_after: DateTime<Utc>, host: &str) -> TlsCertificateInfo {
            TlsCertificateInfo {
                issuer: "CN=Fake Root CA".to_string(),
                subject: format!("CN={host}"),
                not_before: not_after - ChronoDuration::days(90),
                not_after,
            }
        }
    }

    #[async_trait]
    impl TlsInspectorPort for FakeTls {
        async fn inspect(
            &self,
            host: &str,
            _port: u16,
            _timeout: Duration,
        ) -> Result<TlsCertificateInfo, TlsError> {
            match self.outcome {
                FakeTlsOutcome::Valid => Ok(Self::certificate(
                    Utc::now() + ChronoDuration::days(60),
                    host,
                )),
                FakeTlsOutcome::Expired => Ok(Self::certificate(
                    Utc::now() - ChronoDuration::days(30),
                    host,
                )),
                FakeTlsOutcome::HandshakeFailure => Err(TlsError::HandshakeFailed {
                    host: host.to_string(),
                    message: "unknown certificate authority".to_string(),
                }),
            }
        }
    }
}
