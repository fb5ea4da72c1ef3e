//! Async UDP socket wrapper for the Rewind transport.
//!
//! Owns the receive buffer and turns the per-attempt receive timeout into
//! an awaitable with an explicit deadline. The buffer capacity bounds
//! every accepted datagram, independent of any assumed maximum packet
//! size.

use std::io;
use std::net::{Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::core::RECV_BUFFER_SIZE;

/// UDP socket for one Rewind session.
///
/// Bound to an ephemeral local port on the IPv6 wildcard address, so the
/// same socket reaches IPv4 servers through IPv4-mapped addressing on
/// dual-stack hosts.
#[derive(Debug)]
pub struct RewindSocket {
    socket: UdpSocket,
    recv_buffer: Vec<u8>,
}

impl RewindSocket {
    /// Bind a dual-stack socket to an ephemeral local port.
    pub async fn bind() -> io::Result<Self> {
        Self::bind_to(SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))).await
    }

    /// Bind to a specific local address.
    pub async fn bind_to(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self {
            socket,
            recv_buffer: vec![0u8; RECV_BUFFER_SIZE],
        })
    }

    /// Get the local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Send a datagram to the given address.
    pub async fn send_to(&self, data: &[u8], addr: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(data, addr).await
    }

    /// Receive one datagram, waiting at most `wait`.
    ///
    /// An elapsed deadline surfaces as an [`io::ErrorKind::TimedOut`]
    /// error, which the engine classifies as transient.
    pub async fn recv_from_timeout(
        &mut self,
        wait: Duration,
    ) -> io::Result<(&[u8], SocketAddr)> {
        match timeout(wait, self.socket.recv_from(&mut self.recv_buffer)).await {
            Ok(Ok((len, addr))) => Ok((&self.recv_buffer[..len], addr)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(io::ErrorKind::TimedOut.into()),
        }
    }
}
