//! Caller identity resolvers.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::Resolver;
use tokio::time::timeout;
use tracing::{debug, warn};

use hostgate_rules::CallerIdentity;

use crate::error::IdentityError;

/// Default bound on a single reverse lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves the caller identity for one incoming connection.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are called
/// concurrently from request handlers.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Build a [`CallerIdentity`] from transport data.
    ///
    /// `remote_addr` is the transport-level source address string; a
    /// malformed value is a boundary contract violation and fails the
    /// whole resolution with [`IdentityError::AddrParse`]. `host_hint` is
    /// a hostname the transport already knows (e.g. a reverse-proxy
    /// header) and, when present, is used verbatim; no lookup happens.
    async fn resolve(
        &self,
        remote_addr: &str,
        host_hint: Option<&str>,
    ) -> Result<CallerIdentity, IdentityError>;
}

#[async_trait]
impl<R: IdentityResolver + ?Sized> IdentityResolver for Arc<R> {
    #[inline]
    async fn resolve(
        &self,
        remote_addr: &str,
        host_hint: Option<&str>,
    ) -> Result<CallerIdentity, IdentityError> {
        (**self).resolve(remote_addr, host_hint).await
    }
}

/// DNS-backed identity resolver.
///
/// When the transport supplies no hostname, performs a reverse (PTR)
/// lookup on the source address. The lookup runs under a bounded timeout;
/// a timeout or an empty/NXDOMAIN answer yields no hostname, while any
/// other resolver fault propagates as [`IdentityError::Resolution`] so
/// the surrounding system can observe it.
///
/// Cheaply cloneable; the underlying resolver is shared.
#[derive(Clone)]
pub struct DnsIdentityResolver {
    resolver: Arc<Resolver<TokioConnectionProvider>>,
    lookup_timeout: Duration,
}

impl DnsIdentityResolver {
    /// Build from the system resolver configuration.
    pub fn from_system_conf() -> Result<Self, IdentityError> {
        let builder = Resolver::builder_tokio()
            .map_err(|e| IdentityError::Config(format!("system config: {e}")))?;
        Ok(Self {
            resolver: Arc::new(builder.build()),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        })
    }

    /// Override the reverse-lookup timeout.
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Reverse-resolve an address to its first PTR name.
    ///
    /// `Ok(None)` covers "no name exists" and "lookup timed out"; both
    /// leave the caller evaluable on address rules alone.
    async fn reverse(&self, address: IpAddr) -> Result<Option<String>, IdentityError> {
        match timeout(self.lookup_timeout, self.resolver.reverse_lookup(address)).await {
            Err(_) => {
                warn!(address = %address, "reverse lookup timed out");
                Ok(None)
            }
            Ok(Ok(lookup)) => {
                let hostname = lookup.iter().next().map(|ptr| {
                    let mut name = ptr.0.to_utf8();
                    if name.ends_with('.') {
                        name.pop();
                    }
                    name
                });
                debug!(address = %address, hostname = hostname.as_deref(), "reverse lookup");
                Ok(hostname)
            }
            Ok(Err(err)) if err.is_no_records_found() => Ok(None),
            Ok(Err(err)) => Err(IdentityError::Resolution(err)),
        }
    }
}

impl std::fmt::Debug for DnsIdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsIdentityResolver")
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

#[async_trait]
impl IdentityResolver for DnsIdentityResolver {
    async fn resolve(
        &self,
        remote_addr: &str,
        host_hint: Option<&str>,
    ) -> Result<CallerIdentity, IdentityError> {
        let address: IpAddr = remote_addr.parse()?;

        if let Some(hint) = host_hint {
            return Ok(CallerIdentity::new(address, hint));
        }

        let hostname = self.reverse(address).await?;
        Ok(CallerIdentity {
            address: Some(address),
            hostname,
        })
    }
}

/// Fixed-answer resolver for tests and synthetic contexts.
///
/// Parses the address exactly like the DNS resolver (so the fatal
/// malformed-address contract still holds) but never touches the
/// network: the hostname is whatever it was configured with, unless a
/// transport hint overrides it.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    hostname: Option<String>,
}

impl StaticIdentityResolver {
    /// A resolver that never finds a hostname.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that answers every lookup with `hostname`.
    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(
        &self,
        remote_addr: &str,
        host_hint: Option<&str>,
    ) -> Result<CallerIdentity, IdentityError> {
        let address: IpAddr = remote_addr.parse()?;
        let hostname = host_hint
            .map(str::to_owned)
            .or_else(|| self.hostname.clone());
        Ok(CallerIdentity {
            address: Some(address),
            hostname,
        })
    }
}
