//! Sticky voice service.
//!
//! Keeps the bot in a chosen voice channel per guild. The service owns the
//! session store and is the only writer to it; every write goes through the
//! pure [`transition`](transition::transition) function.
//!
//! The service is organized into separate modules by concern:
//! - `gate` - Permission and capacity checks for a channel
//! - `backoff` - Retry budget and delay curve
//! - `transition` - Reconnection state machine
//! - `executor` - Single physical connect or move
//! - `keepalive` - Keep-alive payload on a live connection
//! - `stick` / `unstick` - Command operations
//! - `recovery` - Scheduled reconnection attempts
//! - `audit` - Periodic check of settled sessions

pub mod audit;
pub mod backoff;
pub mod executor;
pub mod gate;
pub mod keepalive;
pub mod recovery;
pub mod stick;
pub mod transition;
pub mod unstick;

#[cfg(test)]
mod test;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serenity::all::GuildId;
use tokio::sync::Mutex;

use crate::data::discord::VoiceDirectory;
use crate::data::voice::session::{AppliedTransition, VoiceSessionRepository};
use crate::data::voice::transport::VoiceTransport;
use crate::model::voice::SupervisorAction;
use crate::service::notify::Notifier;

use self::backoff::BackoffPolicy;
use self::transition::{transition, SupervisorEvent};

/// Service providing sticky voice placement and recovery.
///
/// Cloning is cheap; clones share the session store, the collaborators, and
/// the per-guild operation locks.
#[derive(Clone)]
pub struct StickyVoiceService {
    inner: Arc<Inner>,
}

struct Inner {
    sessions: VoiceSessionRepository,
    directory: Arc<dyn VoiceDirectory>,
    transport: Arc<dyn VoiceTransport>,
    notifier: Arc<dyn Notifier>,
    policy: BackoffPolicy,
    /// Serialises connect, move, and disconnect per guild.
    guild_locks: Mutex<HashMap<GuildId, Arc<Mutex<()>>>>,
}

impl StickyVoiceService {
    /// Creates a new StickyVoiceService with an empty session store.
    ///
    /// # Arguments
    /// - `directory` - Channel lookups with the bot's resolved permissions
    /// - `transport` - Physical voice operations
    /// - `notifier` - Receives abandonment and first-stick denial notices
    /// - `policy` - Retry budget and delay curve
    pub fn new(
        directory: Arc<dyn VoiceDirectory>,
        transport: Arc<dyn VoiceTransport>,
        notifier: Arc<dyn Notifier>,
        policy: BackoffPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: VoiceSessionRepository::new(),
                directory,
                transport,
                notifier,
                policy,
                guild_locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Session store, read-only use intended.
    pub fn sessions(&self) -> &VoiceSessionRepository {
        &self.inner.sessions
    }

    async fn guild_lock(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        let mut locks = self.inner.guild_locks.lock().await;
        locks.entry(guild_id).or_default().clone()
    }

    /// Feeds one event to the state machine and stores the result.
    ///
    /// # Returns
    /// - `Some(AppliedTransition)` - Stored; actions are left to the caller
    /// - `None` - `guard` no longer matched the stored generation
    async fn commit(
        &self,
        guild_id: GuildId,
        guard: Option<u64>,
        event: SupervisorEvent,
    ) -> Option<AppliedTransition> {
        let policy = self.inner.policy;
        let now = Utc::now();

        self.inner
            .sessions
            .apply(guild_id, guard, |current| {
                transition(guild_id, current, event, &policy, now)
            })
            .await
    }

    async fn send_notifications(&self, actions: &[SupervisorAction]) {
        for action in actions {
            if let SupervisorAction::Notify(message) = action {
                self.inner.notifier.notify(message).await;
            }
        }
    }
}
