//! Host resolution for the `ip` field of mail events.

use std::collections::HashMap;
use std::net::{IpAddr, ToSocketAddrs};

/// Forward-resolves a host name. `None` means the lookup failed.
pub trait HostResolver: Send + Sync {
    fn resolve(&self, host: &str) -> Option<IpAddr>;
}

/// Resolves through the operating system, preferring IPv4 answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, host: &str) -> Option<IpAddr> {
        if host.is_empty() {
            return None;
        }

        let addrs: Vec<IpAddr> = match (host, 0).to_socket_addrs() {
            Ok(addrs) => addrs.map(|a| a.ip()).collect(),
            Err(e) => {
                tracing::debug!(host = %host, "Host resolution failed: {e}");
                return None;
            }
        };

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
    }
}

/// Fixed host table, for tests and air-gapped setups.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, IpAddr>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, host: impl Into<String>, ip: IpAddr) -> Self {
        self.entries.insert(host.into(), ip);
        self
    }
}

impl HostResolver for StaticResolver {
    fn resolve(&self, host: &str) -> Option<IpAddr> {
        self.entries.get(host).copied()
    }
}

/// Never resolves; used when host resolution is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledResolver;

impl HostResolver for DisabledResolver {
    fn resolve(&self, _host: &str) -> Option<IpAddr> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn system_resolver_passes_ip_literals_through() {
        let ip = SystemResolver.resolve("127.0.0.1");
        assert_eq!(ip, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }

    #[test]
    fn system_resolver_rejects_empty_host() {
        assert_eq!(SystemResolver.resolve(""), None);
    }

    #[test]
    fn static_resolver_lookup() {
        let resolver =
            StaticResolver::new().with_entry("mail.example.com", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)));
        assert_eq!(
            resolver.resolve("mail.example.com"),
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)))
        );
        assert_eq!(resolver.resolve("other.example.com"), None);
    }

    #[test]
    fn disabled_resolver_never_answers() {
        assert_eq!(DisabledResolver.resolve("127.0.0.1"), None);
    }
}
