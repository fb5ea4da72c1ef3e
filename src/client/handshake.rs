//! Login handshake with the master server.
//!
//! The handshake is a deadline-bounded loop over unreliable UDP: every
//! iteration resends a keep-alive, so packet loss before login completes
//! is masked by the natural resend rather than by explicit
//! retransmission. The server answers a keep-alive from an unknown client
//! with a challenge; the client proves the password by returning
//! `SHA-256(challenge ++ password)`.

use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::core::{
    AUTH_ATTEMPT_LIMIT, CONNECT_TIMEOUT, ClientError, ClientResult, FLAG_NONE, RECEIVE_TIMEOUT,
    TYPE_AUTHENTICATION, TYPE_CHALLENGE, TYPE_CONFIGURATION, TYPE_KEEP_ALIVE,
};
use crate::records::ConfigurationData;
use crate::transport;

use super::session::{RewindSession, SessionPhase};

/// Handshake progress, driven by the server's responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    /// Nothing sent yet.
    Init,
    /// Keep-alive sent, waiting for the server's challenge.
    AwaitChallenge,
    /// Digest or configuration sent, waiting for confirmation.
    AwaitConfirm,
    /// Login confirmed.
    Connected,
    /// Password rejected.
    Failed,
}

/// Compute the authentication digest for a challenge.
///
/// The password bytes are appended directly after the received challenge
/// bytes, with no separator or length prefix. This framing is the wire
/// contract; do not change it.
pub fn challenge_digest(challenge: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(challenge);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

impl RewindSession {
    /// Resolve the master server and run the login handshake.
    ///
    /// May be called repeatedly: each call discards any previous peer
    /// resolution before resolving anew, and does not reset the sequence
    /// counters. A failed connect leaves the session safe to retry
    /// `connect` or to drop.
    ///
    /// Non-zero `options` are sent as a `Configuration` packet once the
    /// server acknowledges the login; with zero options the server's
    /// keep-alive response itself completes the handshake.
    pub async fn connect(
        &mut self,
        host: &str,
        port: u16,
        password: &str,
        options: u32,
    ) -> ClientResult<()> {
        // Exactly one resolution is live at a time.
        self.peer = None;
        self.peer = Some(transport::resolve(host, port).await?);
        self.phase = SessionPhase::Connecting;

        let result = self.login(password, options).await;
        self.phase = match result {
            Ok(()) => SessionPhase::Connected,
            Err(_) => SessionPhase::Idle,
        };
        result
    }

    async fn login(&mut self, password: &str, options: u32) -> ClientResult<()> {
        let deadline = Instant::now() + CONNECT_TIMEOUT;
        let mut attempts = 0usize;
        let mut phase = HandshakePhase::Init;

        while Instant::now() < deadline {
            self.transmit_keep_alive().await?;
            if phase == HandshakePhase::Init {
                phase = HandshakePhase::AwaitChallenge;
            }

            let packet = match self.receive(RECEIVE_TIMEOUT).await {
                Ok(packet) => packet,
                Err(e) if e.is_transient() => {
                    trace!(?phase, error = %e, "transient receive failure, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match packet.header.packet_type {
                TYPE_CHALLENGE => {
                    if attempts >= AUTH_ATTEMPT_LIMIT {
                        phase = HandshakePhase::Failed;
                        warn!(?phase, attempts, "server kept challenging, wrong password");
                        return Err(ClientError::WrongPassword);
                    }
                    let digest = challenge_digest(&packet.payload, password);
                    self.transmit(TYPE_AUTHENTICATION, FLAG_NONE, &digest).await?;
                    attempts += 1;
                    phase = HandshakePhase::AwaitConfirm;
                    debug!(?phase, attempts, "challenge answered");
                }
                TYPE_KEEP_ALIVE => {
                    if options != 0 {
                        let config = ConfigurationData { options };
                        self.transmit(TYPE_CONFIGURATION, FLAG_NONE, &config.to_bytes())
                            .await?;
                        phase = HandshakePhase::AwaitConfirm;
                        debug!(?phase, options, "login acknowledged, sending options");
                    } else {
                        phase = HandshakePhase::Connected;
                        debug!(?phase, "login complete");
                        return Ok(());
                    }
                }
                TYPE_CONFIGURATION => {
                    phase = HandshakePhase::Connected;
                    debug!(?phase, "options confirmed, login complete");
                    return Ok(());
                }
                other => {
                    trace!(packet_type = other, "unrelated packet during handshake");
                }
            }
        }

        warn!(?phase, "handshake deadline elapsed");
        Err(ClientError::ResponseTimeout)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::core::{OPTION_SUPER_HEADER, TYPE_REPORT};
    use crate::transport::{RewindSocket, decode, encode};

    const PASSWORD: &str = "s3cret";
    const CHALLENGE: &[u8] = &[0x3a, 0x91, 0x55, 0x07, 0xc2, 0x18, 0xee, 0x40];

    async fn scripted_server() -> (RewindSocket, u16) {
        // Bound to the wildcard so the client reaches it whether localhost
        // resolves to ::1 or 127.0.0.1.
        let server = RewindSocket::bind_to("[::]:0".parse().unwrap()).await.unwrap();
        let port = server.local_addr().unwrap().port();
        (server, port)
    }

    async fn recv_packet(server: &mut RewindSocket) -> (u16, Vec<u8>, SocketAddr) {
        let (data, from) = server
            .recv_from_timeout(Duration::from_secs(10))
            .await
            .unwrap();
        let (header, payload) = decode(data).unwrap();
        (header.packet_type, payload.to_vec(), from)
    }

    #[test]
    fn test_challenge_digest_framing() {
        // SHA-256 over challenge bytes immediately followed by password
        // bytes, nothing in between.
        let mut reference = Vec::new();
        reference.extend_from_slice(CHALLENGE);
        reference.extend_from_slice(PASSWORD.as_bytes());
        let expected: [u8; 32] = Sha256::digest(&reference).into();

        assert_eq!(challenge_digest(CHALLENGE, PASSWORD), expected);
        assert_ne!(
            challenge_digest(CHALLENGE, PASSWORD),
            challenge_digest(CHALLENGE, "other")
        );
    }

    #[tokio::test]
    async fn test_connect_succeeds_and_counts_packets() {
        let (mut server, port) = scripted_server().await;

        let server_task = tokio::spawn(async move {
            let mut challenged = false;
            loop {
                let (packet_type, payload, from) = recv_packet(&mut server).await;
                match packet_type {
                    TYPE_KEEP_ALIVE if !challenged => {
                        challenged = true;
                        server
                            .send_to(&encode(TYPE_CHALLENGE, FLAG_NONE, 0, CHALLENGE), from)
                            .await
                            .unwrap();
                    }
                    TYPE_AUTHENTICATION => {
                        assert_eq!(payload, challenge_digest(CHALLENGE, PASSWORD));
                        server
                            .send_to(&encode(TYPE_KEEP_ALIVE, FLAG_NONE, 1, &[]), from)
                            .await
                            .unwrap();
                        break;
                    }
                    _ => {}
                }
            }
        });

        let mut session = RewindSession::create(2501234, "test 1.0").await.unwrap();
        session.connect("localhost", port, PASSWORD, 0).await.unwrap();

        assert_eq!(session.phase(), SessionPhase::Connected);
        // Keep-alive, authentication, keep-alive: three control packets.
        assert_eq!(session.sequence(FLAG_NONE), 3);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_sends_options_and_awaits_confirmation() {
        let (mut server, port) = scripted_server().await;

        let server_task = tokio::spawn(async move {
            let mut challenged = false;
            loop {
                let (packet_type, payload, from) = recv_packet(&mut server).await;
                match packet_type {
                    TYPE_KEEP_ALIVE if !challenged => {
                        challenged = true;
                        server
                            .send_to(&encode(TYPE_CHALLENGE, FLAG_NONE, 0, CHALLENGE), from)
                            .await
                            .unwrap();
                    }
                    TYPE_AUTHENTICATION => {
                        server
                            .send_to(&encode(TYPE_KEEP_ALIVE, FLAG_NONE, 1, &[]), from)
                            .await
                            .unwrap();
                    }
                    TYPE_CONFIGURATION => {
                        let config = ConfigurationData::from_bytes(&payload).unwrap();
                        assert_eq!(config.options, OPTION_SUPER_HEADER);
                        server
                            .send_to(
                                &encode(TYPE_CONFIGURATION, FLAG_NONE, 2, &payload),
                                from,
                            )
                            .await
                            .unwrap();
                        break;
                    }
                    _ => {}
                }
            }
        });

        let mut session = RewindSession::create(1, "test").await.unwrap();
        session
            .connect("localhost", port, PASSWORD, OPTION_SUPER_HEADER)
            .await
            .unwrap();

        assert_eq!(session.phase(), SessionPhase::Connected);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_fails_after_three_attempts() {
        let (mut server, port) = scripted_server().await;
        let auth_count = Arc::new(AtomicUsize::new(0));
        let auth_seen = auth_count.clone();

        let server_task = tokio::spawn(async move {
            // Never accept: answer every datagram with a fresh challenge.
            loop {
                let (packet_type, _, from) = recv_packet(&mut server).await;
                if packet_type == TYPE_AUTHENTICATION {
                    auth_seen.fetch_add(1, Ordering::SeqCst);
                }
                server
                    .send_to(&encode(TYPE_CHALLENGE, FLAG_NONE, 0, CHALLENGE), from)
                    .await
                    .unwrap();
            }
        });

        let mut session = RewindSession::create(1, "test").await.unwrap();
        let err = session
            .connect("localhost", port, "wrong-password", 0)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::WrongPassword));
        assert_eq!(err.code(), -5);
        assert_eq!(session.phase(), SessionPhase::Idle);

        // Let the server drain what the client already sent, then verify
        // exactly three digests went out, never a fourth.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(auth_count.load(Ordering::SeqCst), 3);
        server_task.abort();
    }

    #[tokio::test]
    async fn test_connect_absorbs_noise_and_strangers() {
        let (mut server, port) = scripted_server().await;
        let stranger = RewindSocket::bind_to("[::]:0".parse().unwrap()).await.unwrap();

        let server_task = tokio::spawn(async move {
            let mut challenged = false;
            loop {
                let (packet_type, _, from) = recv_packet(&mut server).await;
                match packet_type {
                    TYPE_KEEP_ALIVE if !challenged => {
                        challenged = true;
                        // A datagram from the wrong sender and an unrelated
                        // console report, both ahead of the challenge.
                        stranger
                            .send_to(&encode(TYPE_KEEP_ALIVE, FLAG_NONE, 0, &[]), from)
                            .await
                            .unwrap();
                        server
                            .send_to(&encode(TYPE_REPORT, FLAG_NONE, 0, b"notice"), from)
                            .await
                            .unwrap();
                        server
                            .send_to(&encode(TYPE_CHALLENGE, FLAG_NONE, 1, CHALLENGE), from)
                            .await
                            .unwrap();
                    }
                    TYPE_AUTHENTICATION => {
                        server
                            .send_to(&encode(TYPE_KEEP_ALIVE, FLAG_NONE, 2, &[]), from)
                            .await
                            .unwrap();
                        break;
                    }
                    _ => {}
                }
            }
        });

        let mut session = RewindSession::create(1, "test").await.unwrap();
        session.connect("localhost", port, PASSWORD, 0).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Connected);
        server_task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_times_out_against_silent_peer() {
        // A bound socket that never answers.
        let silent = RewindSocket::bind_to("[::1]:0".parse().unwrap()).await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let mut session = RewindSession::create(1, "test").await.unwrap();
        let start = Instant::now();
        let err = session.connect("::1", port, PASSWORD, 0).await.unwrap_err();

        assert!(matches!(err, ClientError::ResponseTimeout));
        assert_eq!(err.code(), -6);
        assert_eq!(session.phase(), SessionPhase::Idle);

        // Bounded by the connect deadline plus at most one receive timeout.
        let elapsed = start.elapsed();
        assert!(elapsed >= CONNECT_TIMEOUT);
        assert!(elapsed <= CONNECT_TIMEOUT + 2 * RECEIVE_TIMEOUT);
    }
}
