//! Peer resolution and sender validation.
//!
//! A session talks to exactly one master server. The peer is resolved once
//! per connect and every received datagram must originate from that exact
//! address; anything else is noise on the ephemeral UDP port and is
//! rejected with a transient error.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use tokio::net::lookup_host;
use tracing::debug;

use crate::core::{ClientError, ClientResult};

/// Resolve a master server hostname and port to a single peer address.
///
/// Resolution is dual-stack aware: IPv4 candidates are canonicalized to
/// their IPv4-mapped IPv6 form so they can be reached through the
/// session's IPv6 socket. The first candidate wins; an empty result or a
/// resolver failure maps to [`ClientError::DnsResolve`].
pub async fn resolve(host: &str, port: u16) -> ClientResult<SocketAddr> {
    let failure = || ClientError::DnsResolve {
        host: host.to_owned(),
        port,
    };

    let candidate = lookup_host((host, port))
        .await
        .map_err(|_| failure())?
        .next()
        .ok_or_else(failure)?;

    let peer = canonicalize(candidate);
    debug!(%host, %port, %peer, "resolved master server");
    Ok(peer)
}

/// Rewrite an IPv4 address as its IPv4-mapped IPv6 equivalent; IPv6
/// addresses pass through unchanged.
pub fn canonicalize(addr: SocketAddr) -> SocketAddr {
    SocketAddr::new(IpAddr::V6(canonical_ip(addr.ip())), addr.port())
}

fn canonical_ip(ip: IpAddr) -> Ipv6Addr {
    match ip {
        IpAddr::V4(v4) => v4.to_ipv6_mapped(),
        IpAddr::V6(v6) => v6,
    }
}

/// Whether a datagram sender matches the resolved peer.
///
/// Exact match is required, with one special case: a plain IPv4 address
/// equals an IPv6 address carrying the same IPv4-mapped bits, provided the
/// ports also match. Comparison is symmetric in which side carries the
/// mapped form.
pub fn addresses_match(sender: &SocketAddr, peer: &SocketAddr) -> bool {
    sender.port() == peer.port() && canonical_ip(sender.ip()) == canonical_ip(peer.ip())
}
