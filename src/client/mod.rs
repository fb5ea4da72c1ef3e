//! Rewind Protocol - Client Engine
//!
//! The session object and the protocol flows driven through it: login
//! handshake and session polling.

mod handshake;
mod poll;
mod session;

pub use handshake::{HandshakePhase, challenge_digest};
pub use poll::QuietTracker;
pub use session::{RewindSession, SessionPhase};
