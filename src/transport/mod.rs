//! Rewind Protocol - Transport Layer
//!
//! Packet framing, peer resolution/validation, and the UDP socket the
//! session drives:
//!
//! - **Framing**: [`PacketHeader`], [`encode`]/[`decode`], and the
//!   per-channel [`SequenceCounters`]
//! - **Peer handling**: [`resolve`] and [`addresses_match`]
//! - **Socket**: [`RewindSocket`] with timeout-bounded receives
//!
//! The transport layer is agnostic to packet semantics: it frames bytes
//! and validates senders, nothing more.

mod frame;
pub mod peer;
mod socket;

pub use frame::{decode, encode, Packet, PacketHeader, SequenceCounters};
pub use peer::{addresses_match, resolve};
pub use socket::RewindSocket;
