//! Waiting for a call session to go quiet.
//!
//! A destination is only considered free once the server has reported it
//! inactive for a whole quiet window: a single inactive sample races with
//! a call ending and immediately restarting, so it is never trusted on
//! its own.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, trace, warn};

use crate::core::{
    ClientError, ClientResult, FLAG_NONE, RECEIVE_TIMEOUT, TYPE_KEEP_ALIVE, TYPE_SESSION_POLL,
};
use crate::records::SessionPollData;

use super::session::RewindSession;

/// Tracks how long the target session has been continuously inactive.
///
/// `observe` feeds one poll response in: the first inactive report starts
/// the window, an active report clears it, and the tracker reports
/// success once a report arrives more than the quiet window after the
/// window started.
#[derive(Debug, Clone, Copy)]
pub struct QuietTracker {
    window: Duration,
    quiet_since: Option<Instant>,
}

impl QuietTracker {
    /// Create a tracker for the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            quiet_since: None,
        }
    }

    /// Feed one poll response; returns true once the session has stayed
    /// inactive for longer than the quiet window.
    pub fn observe(&mut self, inactive: bool, now: Instant) -> bool {
        if inactive && self.quiet_since.is_none() {
            self.quiet_since = Some(now);
        }
        if !inactive && self.quiet_since.is_some() {
            self.quiet_since = None;
        }

        match self.quiet_since {
            Some(since) => now.duration_since(since) > self.window,
            None => false,
        }
    }
}

impl RewindSession {
    /// Wait until the target call session has been inactive for
    /// `quiet_window`, polling the server once per round.
    ///
    /// `max_wait` is floor-clamped to the receive timeout; the overall
    /// deadline is `max_wait + quiet_window` from now. Returns
    /// [`ClientError::ResponseTimeout`] if the session never goes quiet
    /// for long enough before the deadline.
    pub async fn wait_for_session_inactive(
        &mut self,
        target: &SessionPollData,
        max_wait: Duration,
        quiet_window: Duration,
    ) -> ClientResult<()> {
        let max_wait = max_wait.max(RECEIVE_TIMEOUT);
        let deadline = Instant::now() + max_wait + quiet_window;

        let mut tracker = QuietTracker::new(quiet_window);
        let mut keep_alive_seen = false;
        let mut poll_seen = false;
        let request = target.to_bytes();

        while Instant::now() < deadline {
            self.transmit_keep_alive().await?;
            self.transmit(TYPE_SESSION_POLL, FLAG_NONE, &request).await?;

            let packet = match self.receive(RECEIVE_TIMEOUT).await {
                Ok(packet) => packet,
                Err(e) if e.is_transient() => {
                    trace!(error = %e, "transient receive failure, polling again");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match packet.header.packet_type {
                TYPE_KEEP_ALIVE => {
                    keep_alive_seen = true;
                }
                TYPE_SESSION_POLL => {
                    let response = match SessionPollData::from_bytes(&packet.payload) {
                        Ok(response) => response,
                        // A garbled response is noise like any other.
                        Err(e) => {
                            trace!(error = %e, "malformed poll response dropped");
                            continue;
                        }
                    };

                    let now = Instant::now();
                    if tracker.observe(response.is_inactive(), now) {
                        debug!(number = target.number, "session quiet for the whole window");
                        return Ok(());
                    }
                    trace!(state = response.state, "poll response observed");
                    poll_seen = true;
                }
                other => {
                    trace!(packet_type = other, "unrelated packet while polling");
                }
            }

            // Both answers for this round arrived; throttle before the
            // next request pair.
            if keep_alive_seen && poll_seen {
                sleep(RECEIVE_TIMEOUT).await;
                keep_alive_seen = false;
                poll_seen = false;
            }
        }

        warn!(number = target.number, "poll deadline elapsed");
        Err(ClientError::ResponseTimeout)
    }
}
