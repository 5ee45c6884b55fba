//! IPv4 name resolution

use std::net::{SocketAddr, SocketAddrV4};

use tokio::net::lookup_host;
use tracing::warn;

use crate::endpoint::Endpoint;
use crate::error::FatalError;

/// Resolve `endpoint` to a single IPv4 socket address.
///
/// Resolution failures are fatal: a host that does not resolve now is a
/// configuration problem, not a network hiccup.
pub async fn resolve_ipv4(endpoint: &Endpoint) -> Result<SocketAddrV4, FatalError> {
    let addrs = lookup_host((endpoint.host(), endpoint.port()))
        .await
        .map_err(|source| FatalError::Resolve {
            host: endpoint.host().to_string(),
            source,
        })?;

    pick_first_ipv4(endpoint.host(), addrs)
}

/// Pick the first IPv4 address, warning when the choice was ambiguous.
pub fn pick_first_ipv4<I>(host: &str, addrs: I) -> Result<SocketAddrV4, FatalError>
where
    I: IntoIterator<Item = SocketAddr>,
{
    let mut v4 = addrs.into_iter().filter_map(|addr| match addr {
        SocketAddr::V4(addr) => Some(addr),
        SocketAddr::V6(_) => None,
    });

    let first = v4.next().ok_or_else(|| FatalError::NoIpv4Address {
        host: host.to_string(),
    })?;

    if v4.next().is_some() {
        warn!(
            "Hostname {} has more than one IPv4 address, using the first one detected: {}",
            host,
            first.ip()
        );
    }

    Ok(first)
}
