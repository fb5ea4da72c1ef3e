//! Rewind client session.
//!
//! A [`RewindSession`] is the unit of lifetime for the whole engine: it
//! owns the UDP socket, the resolved peer address, the pair of sequence
//! counters, and the cached service descriptor. One session is driven by
//! one logical task at a time; there is no internal locking.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, trace};

use crate::core::{
    ClientError, ClientResult, FLAG_NONE, SERVICE_SIMPLE_APPLICATION, TYPE_CLOSE, TYPE_KEEP_ALIVE,
};
use crate::records::ServiceDescriptor;
use crate::transport::{self, Packet, RewindSocket, SequenceCounters};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, no peer resolved yet.
    Idle,
    /// Handshake in progress.
    Connecting,
    /// Handshake completed.
    Connected,
    /// Close packet sent.
    Closed,
}

/// A Rewind protocol client session.
///
/// Created once per logical client. `connect` may be called repeatedly;
/// each call re-resolves the peer (replacing the previous resolution
/// wholesale) and runs the login handshake, without resetting the
/// sequence counters. Dropping the session releases the socket, the
/// resolution, and the descriptor together.
#[derive(Debug)]
pub struct RewindSession {
    pub(crate) socket: RewindSocket,
    pub(crate) peer: Option<SocketAddr>,
    pub(crate) counters: SequenceCounters,
    pub(crate) descriptor: Vec<u8>,
    pub(crate) phase: SessionPhase,
}

impl RewindSession {
    /// Create a session for the given client ID and software version
    /// string, binding a dual-stack UDP socket to an ephemeral port.
    ///
    /// The service descriptor sent with every keep-alive is built here
    /// once and cached: client ID, the simple-application role, and a
    /// description of the form `"<version> <os> <arch>"`.
    pub async fn create(number: u32, version: &str) -> ClientResult<Self> {
        let socket = RewindSocket::bind().await?;

        let descriptor = ServiceDescriptor {
            number,
            service: SERVICE_SIMPLE_APPLICATION,
            description: format!(
                "{} {} {}",
                version,
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        };

        debug!(number, description = %descriptor.description, "session created");

        Ok(Self {
            socket,
            peer: None,
            counters: SequenceCounters::new(),
            descriptor: descriptor.to_bytes(),
            phase: SessionPhase::Idle,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The currently resolved peer, if any.
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Local address of the session's socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Current sequence number of the channel a flags value selects,
    /// without advancing it.
    pub fn sequence(&self, flags: u16) -> u32 {
        self.counters.peek(flags)
    }

    /// Send one packet to the resolved peer. Fire-and-forget: the
    /// flag-selected sequence counter is always advanced and the call
    /// never waits for any acknowledgement. Pacing of real-time frames is
    /// entirely the caller's responsibility.
    ///
    /// The payload must fit the header's 16-bit length field; longer
    /// payloads are rejected with `SocketIo(InvalidInput)` before the
    /// counter advances.
    pub async fn transmit(
        &mut self,
        packet_type: u16,
        flags: u16,
        payload: &[u8],
    ) -> ClientResult<()> {
        let peer = self
            .peer
            .ok_or_else(|| ClientError::SocketIo(io::ErrorKind::NotConnected.into()))?;
        if payload.len() > u16::MAX as usize {
            return Err(ClientError::SocketIo(io::ErrorKind::InvalidInput.into()));
        }

        let sequence = self.counters.next(flags);
        let datagram = transport::encode(packet_type, flags, sequence, payload);
        self.socket.send_to(&datagram, peer).await?;

        trace!(packet_type, flags, sequence, length = payload.len(), "transmitted");
        Ok(())
    }

    /// Send a keep-alive carrying the cached service descriptor.
    pub async fn transmit_keep_alive(&mut self) -> ClientResult<()> {
        let descriptor = self.descriptor.clone();
        self.transmit(TYPE_KEEP_ALIVE, FLAG_NONE, &descriptor).await
    }

    /// Receive one packet from the resolved peer, waiting at most `wait`.
    ///
    /// The sender address is validated first; a datagram from anyone but
    /// the resolved peer is rejected with [`ClientError::WrongAddress`].
    /// Then the header is validated and the payload sliced by its
    /// declared length. Both failures are transient: callers in a retry
    /// loop treat them as noise, never as protocol failure.
    pub async fn receive(&mut self, wait: Duration) -> ClientResult<Packet> {
        let peer = self
            .peer
            .ok_or_else(|| ClientError::SocketIo(io::ErrorKind::NotConnected.into()))?;

        let (datagram, sender) = self.socket.recv_from_timeout(wait).await?;

        if !transport::addresses_match(&sender, &peer) {
            trace!(%sender, %peer, "datagram from unexpected sender dropped");
            return Err(ClientError::WrongAddress(sender));
        }

        let (header, payload) = transport::decode(datagram)?;
        trace!(
            packet_type = header.packet_type,
            sequence = header.sequence,
            length = header.length,
            "received"
        );

        Ok(Packet {
            header,
            payload: payload.to_vec(),
        })
    }

    /// Send the control close packet and mark the session closed.
    ///
    /// The session object stays usable for a later `connect`; dropping it
    /// releases the socket.
    pub async fn close(&mut self) -> ClientResult<()> {
        self.transmit(TYPE_CLOSE, FLAG_NONE, &[]).await?;
        self.phase = SessionPhase::Closed;
        debug!("session closed");
        Ok(())
    }
}
