//! Error types for the Rewind client engine.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias used throughout the engine.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by the Rewind client engine.
///
/// `WrongAddress` and `WrongData` are noise at the receive boundary: the
/// handshake and poll loops absorb them and try again. `DnsResolve`,
/// `WrongPassword`, and `ResponseTimeout` always escape to the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// OS-level socket failure.
    #[error("socket i/o failure: {0}")]
    SocketIo(#[from] io::Error),

    /// Datagram received from a sender other than the resolved peer.
    #[error("datagram from unexpected sender {0}")]
    WrongAddress(SocketAddr),

    /// Malformed packet header or payload.
    #[error("malformed packet: {0}")]
    WrongData(&'static str),

    /// Peer hostname resolution failed.
    #[error("failed to resolve {host}:{port}")]
    DnsResolve {
        /// Hostname passed to connect.
        host: String,
        /// UDP port passed to connect.
        port: u16,
    },

    /// All authentication attempts were rejected by the server.
    #[error("authentication attempts exhausted, wrong password")]
    WrongPassword,

    /// The overall deadline elapsed before the required response arrived.
    #[error("no server response before deadline")]
    ResponseTimeout,
}

impl ClientError {
    /// Numeric error code, matching the wire-era contract consuming tools
    /// report to their users (0 is success, never an error).
    pub fn code(&self) -> i32 {
        match self {
            ClientError::SocketIo(_) => -1,
            ClientError::WrongAddress(_) => -2,
            ClientError::WrongData(_) => -3,
            ClientError::DnsResolve { .. } => -4,
            ClientError::WrongPassword => -5,
            ClientError::ResponseTimeout => -6,
        }
    }

    /// Whether this error is transient at a receive boundary.
    ///
    /// Transient errors cause another loop iteration inside the handshake
    /// and the poll waiter instead of failing the call.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::WrongAddress(_) | ClientError::WrongData(_) => true,
            ClientError::SocketIo(e) => {
                matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ClientError::SocketIo(io::Error::other("boom")).code(), -1);
        assert_eq!(
            ClientError::WrongAddress("127.0.0.1:5000".parse().unwrap()).code(),
            -2
        );
        assert_eq!(ClientError::WrongData("bad signature").code(), -3);
        assert_eq!(
            ClientError::DnsResolve {
                host: "master.example".into(),
                port: 54000
            }
            .code(),
            -4
        );
        assert_eq!(ClientError::WrongPassword.code(), -5);
        assert_eq!(ClientError::ResponseTimeout.code(), -6);
    }

    #[test]
    fn test_transient_classification() {
        assert!(ClientError::WrongAddress("[::1]:1".parse().unwrap()).is_transient());
        assert!(ClientError::WrongData("short header").is_transient());
        assert!(ClientError::SocketIo(io::ErrorKind::TimedOut.into()).is_transient());
        assert!(ClientError::SocketIo(io::ErrorKind::WouldBlock.into()).is_transient());

        assert!(!ClientError::SocketIo(io::ErrorKind::ConnectionRefused.into()).is_transient());
        assert!(!ClientError::WrongPassword.is_transient());
        assert!(!ClientError::ResponseTimeout.is_transient());
        assert!(
            !ClientError::DnsResolve {
                host: "x".into(),
                port: 1
            }
            .is_transient()
        );
    }
}
