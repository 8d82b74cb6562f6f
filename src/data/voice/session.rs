use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serenity::all::GuildId;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::model::voice::{SessionPhase, SessionState, SupervisorAction, Transition};

/// Stored session plus the bookkeeping needed to serialise recovery.
struct SessionEntry {
    state: SessionState,
    /// Changes whenever in-flight attempts for this guild must be discarded.
    generation: u64,
    /// Handle of the scheduled recovery task, if any.
    retry: Option<AbortHandle>,
}

impl SessionEntry {
    fn cancel_retry(&mut self) {
        if let Some(handle) = self.retry.take() {
            handle.abort();
        }
    }
}

/// A transition after it has been written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransition {
    /// Generation of the stored session after the write.
    ///
    /// When the session was deleted this is a fresh value that matches nothing.
    pub generation: u64,
    pub next: Option<SessionState>,
    /// Actions left for the caller; `CancelRetry` is handled by the store and
    /// never appears here.
    pub actions: Vec<SupervisorAction>,
}

/// In-memory store of sticky voice sessions keyed by guild.
///
/// The store is the single authority for "where should the bot be" in each
/// guild. A session is present exactly when it has a target channel; deleting a
/// session also aborts its scheduled retry. Every write goes through
/// [`apply`](Self::apply) so that reading the current state, computing the
/// transition and storing the result happen under one lock.
///
/// Cloning is cheap and clones share the same underlying map.
#[derive(Clone, Default)]
pub struct VoiceSessionRepository {
    sessions: Arc<Mutex<HashMap<GuildId, SessionEntry>>>,
    generations: Arc<AtomicU64>,
}

impl VoiceSessionRepository {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically applies a state machine transition to a guild's session.
    ///
    /// The closure receives the current state (or `None` when the guild has no
    /// session) and returns the transition to store. A `CancelRetry` action aborts
    /// the scheduled retry and bumps the generation so that attempts already in
    /// flight are discarded when they try to commit.
    ///
    /// A guarded write comes from the recovery task itself, so deleting the
    /// session under a guard releases the retry handle without aborting it.
    ///
    /// # Arguments
    /// - `guild_id` - Guild whose session is updated
    /// - `guard` - Generation the caller observed; when set and no longer current
    ///   the transition is not applied
    /// - `transition` - Pure transition function
    ///
    /// # Returns
    /// - `Some(AppliedTransition)` - Transition was stored
    /// - `None` - The guard did not match, the caller's view is stale
    pub async fn apply<F>(
        &self,
        guild_id: GuildId,
        guard: Option<u64>,
        transition: F,
    ) -> Option<AppliedTransition>
    where
        F: FnOnce(Option<&SessionState>) -> Transition,
    {
        let mut sessions = self.sessions.lock().await;

        let current = sessions.get(&guild_id);
        if let Some(expected) = guard {
            if current.map(|entry| entry.generation) != Some(expected) {
                return None;
            }
        }

        let Transition { next, actions } = transition(current.map(|entry| &entry.state));

        let cancel = actions.contains(&SupervisorAction::CancelRetry);
        let actions: Vec<SupervisorAction> = actions
            .into_iter()
            .filter(|action| *action != SupervisorAction::CancelRetry)
            .collect();

        let generation = match &next {
            None => {
                if let Some(mut entry) = sessions.remove(&guild_id) {
                    if guard.is_none() {
                        entry.cancel_retry();
                    }
                }
                self.next_generation()
            }
            Some(state) => match sessions.get_mut(&guild_id) {
                Some(entry) => {
                    if cancel {
                        entry.cancel_retry();
                        entry.generation = self.next_generation();
                    }
                    entry.state = state.clone();
                    entry.generation
                }
                None => {
                    let generation = self.next_generation();
                    sessions.insert(
                        guild_id,
                        SessionEntry {
                            state: state.clone(),
                            generation,
                            retry: None,
                        },
                    );
                    generation
                }
            },
        };

        Some(AppliedTransition {
            generation,
            next,
            actions,
        })
    }

    /// Gets the current state of a guild's session.
    pub async fn get(&self, guild_id: GuildId) -> Option<SessionState> {
        let sessions = self.sessions.lock().await;
        sessions.get(&guild_id).map(|entry| entry.state.clone())
    }

    /// Gets a guild's session only if it is still at the given generation.
    ///
    /// Used by recovery attempts to re-validate their target at the moment of
    /// execution rather than the moment of scheduling.
    pub async fn get_current(&self, guild_id: GuildId, generation: u64) -> Option<SessionState> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&guild_id)
            .filter(|entry| entry.generation == generation)
            .map(|entry| entry.state.clone())
    }

    /// Gets the generation of a guild's session.
    #[cfg(test)]
    pub async fn generation(&self, guild_id: GuildId) -> Option<u64> {
        let sessions = self.sessions.lock().await;
        sessions.get(&guild_id).map(|entry| entry.generation)
    }

    /// Records the handle of a freshly spawned recovery task.
    ///
    /// The handle replaces any previous one without aborting it, since the only
    /// task that can be replaced is one that has already finished scheduling.
    ///
    /// # Returns
    /// - `true` - Handle stored
    /// - `false` - The session is gone or was superseded; the caller must abort
    ///   the task itself
    pub async fn attach_retry(
        &self,
        guild_id: GuildId,
        generation: u64,
        handle: AbortHandle,
    ) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&guild_id) {
            Some(entry) if entry.generation == generation => {
                entry.retry = Some(handle);
                true
            }
            _ => false,
        }
    }

    /// Gets every session currently in the settled phase.
    pub async fn settled(&self) -> Vec<SessionState> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter(|entry| entry.state.phase == SessionPhase::Settled)
            .map(|entry| entry.state.clone())
            .collect()
    }

    /// Number of guilds with a sticky session.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }
}
