//! # Rewind Protocol
//!
//! Client engine for the Rewind UDP protocol, the transport used by DMR
//! radio infrastructure (servers, trackers, and terminal applications) to
//! exchange control traffic and digital voice frames. It provides:
//!
//! - **Framing**: the fixed 14-byte little-endian packet header with
//!   signature validation and per-channel sequence counters
//! - **Sessions**: one UDP socket, one resolved peer, one lifecycle
//! - **Login**: the challenge-response handshake with SHA-256 digests
//! - **Polling**: waiting for a call session to go quiet before using it
//!
//! ## Modules
//!
//! - [`core`]: wire constants and the error type
//! - [`transport`]: framing, peer resolution, and the UDP socket
//! - [`records`]: typed payload records carried inside packets
//! - [`client`]: the session and the protocol flows driven through it
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rewind_protocol::prelude::*;
//! use std::time::Duration;
//!
//! # async fn run() -> ClientResult<()> {
//! let mut session = RewindSession::create(2501234, "example 1.0").await?;
//! session.connect("repeater.example.net", 54005, "secret", 0).await?;
//!
//! let target = SessionPollData {
//!     session_type: SESSION_TYPE_GROUP_VOICE,
//!     flag: 0,
//!     number: 91,
//!     state: 0,
//! };
//! session
//!     .wait_for_session_inactive(&target, Duration::from_secs(60), Duration::from_secs(2))
//!     .await?;
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod core;
pub mod records;
pub mod transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::client::{HandshakePhase, QuietTracker, RewindSession, SessionPhase};
    pub use crate::records::{
        AddressData, BindingData, ConfigurationData, LocationReport, LocationRequest,
        LocationRequestKind, RedirectionData, ServiceDescriptor, SessionPollData,
        SubscriptionData, SuperHeader, TextMessageData, TextMessageStatus,
    };
    pub use crate::transport::{Packet, PacketHeader, RewindSocket, SequenceCounters};
}

// Re-export commonly used items at crate root
pub use crate::client::{RewindSession, SessionPhase};
pub use crate::core::{ClientError, ClientResult};
pub use crate::transport::{Packet, PacketHeader};
