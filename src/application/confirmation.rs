//! # Confirmation Gate
//!
//! Yes/no confirmation for destructive dictionary edits.
//!
//! A confirmation is keyed by (requester, room). While one is pending, the next message
//! from that requester in that room answers it: `yes` confirms, anything else cancels.
//! If nothing arrives before the deadline the request times out. A second request for
//! the same key while one is pending is rejected and the first one is left alone.
//!
//! Registration and waiting are split (`begin` then `Pending::wait`) so the prompt can be
//! sent after the entry exists; a fast reply can therefore never miss it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::domain::traits::ChatProvider;
use crate::strings::messages;

const AFFIRMATIVE: &str = "yes";

type GateKey = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Confirmed,
    /// The requester answered with something other than `yes`.
    Declined,
    TimedOut,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("a confirmation for `{action}` is already pending")]
pub struct AlreadyPending {
    pub action: String,
}

struct PendingEntry {
    id: u64,
    action: String,
    deadline: Instant,
    respond: oneshot::Sender<bool>,
}

#[derive(Clone, Default)]
pub struct ConfirmationGate {
    pending: Arc<Mutex<HashMap<GateKey, PendingEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GateKey, PendingEntry>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a pending confirmation for `requester` in `channel`.
    pub fn begin(
        &self,
        requester: &str,
        channel: &str,
        action: &str,
        timeout: Duration,
    ) -> Result<Pending, AlreadyPending> {
        let key = (requester.to_string(), channel.to_string());
        let now = Instant::now();
        let mut pending = self.lock();

        if let Some(existing) = pending.get(&key)
            && existing.deadline > now
        {
            return Err(AlreadyPending {
                action: existing.action.clone(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        pending.insert(
            key.clone(),
            PendingEntry {
                id,
                action: action.to_string(),
                deadline: now + timeout,
                respond: tx,
            },
        );
        tracing::info!("Confirmation pending for {} in {}: {}", requester, channel, action);

        Ok(Pending {
            gate: self.clone(),
            key,
            id,
            timeout,
            rx: Some(rx),
        })
    }

    /// Registers, prompts the room, and waits for the answer.
    pub async fn request_confirmation(
        &self,
        chat: &impl ChatProvider,
        requester: &str,
        action: &str,
        timeout: Duration,
    ) -> Result<Outcome, AlreadyPending> {
        let pending = self.begin(requester, &chat.room_id(), action, timeout)?;
        if let Err(e) = chat.send_message(&messages::confirm_prompt(action)).await {
            tracing::error!("Failed to send confirmation prompt: {}", e);
        }
        Ok(pending.wait().await)
    }

    /// Offers an inbound message to the gate. Returns `true` when the message answered a
    /// pending confirmation and must not be processed as a command.
    pub fn offer(&self, requester: &str, channel: &str, text: &str) -> bool {
        let key = (requester.to_string(), channel.to_string());
        let Some(entry) = self.lock().remove(&key) else {
            return false;
        };

        if Instant::now() >= entry.deadline {
            // Lost the race against the timer; dropping the sender reports the timeout
            drop(entry);
            return false;
        }

        let confirmed = text.trim().to_lowercase() == AFFIRMATIVE;
        tracing::info!(
            "Confirmation for {} in {} answered: {}",
            requester,
            channel,
            if confirmed { "confirmed" } else { "declined" }
        );
        let _ = entry.respond.send(confirmed);
        true
    }

    #[cfg(test)]
    pub fn is_pending(&self, requester: &str, channel: &str) -> bool {
        let key = (requester.to_string(), channel.to_string());
        self.lock()
            .get(&key)
            .is_some_and(|e| e.deadline > Instant::now())
    }

    fn clear(&self, key: &GateKey, id: u64) {
        let mut pending = self.lock();
        if pending.get(key).is_some_and(|e| e.id == id) {
            pending.remove(key);
        }
    }
}

/// A registered confirmation waiting for its answer.
pub struct Pending {
    gate: ConfirmationGate,
    key: GateKey,
    id: u64,
    timeout: Duration,
    rx: Option<oneshot::Receiver<bool>>,
}

impl Pending {
    pub async fn wait(mut self) -> Outcome {
        let Some(rx) = self.rx.take() else {
            return Outcome::Declined;
        };
        let outcome = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(true)) => Outcome::Confirmed,
            Ok(Ok(false)) => Outcome::Declined,
            // Sender dropped after a late answer
            Ok(Err(_)) => Outcome::TimedOut,
            Err(_) => Outcome::TimedOut,
        };
        self.gate.clear(&self.key, self.id);
        outcome
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        // Abandoned without waiting (e.g. the prompt task was dropped)
        self.gate.clear(&self.key, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "@admin:example.org";
    const ROOM: &str = "!room:example.org";

    #[tokio::test(start_paused = true)]
    async fn test_yes_within_timeout_confirms() {
        let gate = ConfirmationGate::new();
        let pending = gate
            .begin(ADMIN, ROOM, "remove `foo`", Duration::from_secs(15))
            .unwrap();
        let waiter = tokio::spawn(pending.wait());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(gate.offer(ADMIN, ROOM, "  Yes "));
        assert_eq!(waiter.await.unwrap(), Outcome::Confirmed);
        assert!(!gate.is_pending(ADMIN, ROOM));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_reply_cancels_immediately() {
        let gate = ConfirmationGate::new();
        let pending = gate
            .begin(ADMIN, ROOM, "edit `foo`", Duration::from_secs(15))
            .unwrap();
        let start = Instant::now();
        let waiter = tokio::spawn(pending.wait());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(gate.offer(ADMIN, ROOM, "yess"));
        assert_eq!(waiter.await.unwrap(), Outcome::Declined);
        assert!(start.elapsed() < Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_times_out() {
        let gate = ConfirmationGate::new();
        let start = Instant::now();
        let pending = gate
            .begin(ADMIN, ROOM, "remove `foo`", Duration::from_secs(15))
            .unwrap();

        assert_eq!(pending.wait().await, Outcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_secs(15));
        assert!(start.elapsed() < Duration::from_secs(16));
        assert!(!gate.is_pending(ADMIN, ROOM));
        // A late answer is now an ordinary message
        assert!(!gate.offer(ADMIN, ROOM, "yes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_is_rejected() {
        let gate = ConfirmationGate::new();
        let first = gate
            .begin(ADMIN, ROOM, "remove `foo`", Duration::from_secs(15))
            .unwrap();
        let waiter = tokio::spawn(first.wait());

        let err = gate
            .begin(ADMIN, ROOM, "remove `bar`", Duration::from_secs(15))
            .err()
            .unwrap();
        assert_eq!(err.action, "remove `foo`");

        // The first confirmation is untouched
        assert!(gate.offer(ADMIN, ROOM, "yes"));
        assert_eq!(waiter.await.unwrap(), Outcome::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_requester_in_same_room_answers() {
        let gate = ConfirmationGate::new();
        let pending = gate
            .begin(ADMIN, ROOM, "remove `foo`", Duration::from_secs(15))
            .unwrap();
        let waiter = tokio::spawn(pending.wait());
        tokio::task::yield_now().await;

        assert!(!gate.offer("@someone:example.org", ROOM, "yes"));
        assert!(!gate.offer(ADMIN, "!elsewhere:example.org", "yes"));
        assert!(gate.is_pending(ADMIN, ROOM));

        assert!(gate.offer(ADMIN, ROOM, "yes"));
        assert_eq!(waiter.await.unwrap(), Outcome::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_pending_is_cleared() {
        let gate = ConfirmationGate::new();
        let pending = gate
            .begin(ADMIN, ROOM, "remove `foo`", Duration::from_secs(15))
            .unwrap();
        drop(pending);
        assert!(!gate.is_pending(ADMIN, ROOM));
        assert!(gate
            .begin(ADMIN, ROOM, "remove `bar`", Duration::from_secs(15))
            .is_ok());
    }
}
