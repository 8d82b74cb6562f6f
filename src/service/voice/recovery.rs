//! Reconnection attempts after the bot lost its place.

use std::time::Duration;

use serenity::all::{ChannelId, GuildId};

use crate::error::voice::VoiceError;
use crate::model::voice::{GateDecision, SupervisorAction};

use super::executor::ConnectionExecutor;
use super::gate;
use super::transition::SupervisorEvent;
use super::StickyVoiceService;

impl StickyVoiceService {
    /// Reacts to a voice state update for the bot's own member.
    ///
    /// When the guild has a settled session and the bot is no longer in the
    /// target channel, the session moves to recovering and one recovery task is
    /// spawned. Updates arriving while a recovery is already running are
    /// ignored.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the update belongs to
    /// - `channel_id` - Channel the bot is now in, `None` when disconnected
    pub async fn handle_voice_state(&self, guild_id: GuildId, channel_id: Option<ChannelId>) {
        let Some(applied) = self
            .commit(guild_id, None, SupervisorEvent::VoiceStateChanged { channel_id })
            .await
        else {
            return;
        };

        for action in &applied.actions {
            if let SupervisorAction::ScheduleAttempt { after } = action {
                if let Some(state) = &applied.next {
                    tracing::info!(
                        "Bot left channel {} in guild {} (last placed {}), reconnecting in {:?}",
                        state.session.target_channel_id,
                        guild_id,
                        state.session.last_attempt_at,
                        after
                    );
                }
                self.spawn_recovery(guild_id, applied.generation, *after)
                    .await;
            }
        }

        self.send_notifications(&applied.actions).await;
    }

    /// Spawns the recovery task for one generation of a session.
    ///
    /// The task runs attempts until one settles the session, the session is
    /// abandoned, or the generation goes stale.
    async fn spawn_recovery(&self, guild_id: GuildId, generation: u64, first_delay: Duration) {
        let service = self.clone();
        let jitter = self.inner.policy.jitter();

        let task = tokio::spawn(async move {
            let mut delay = first_delay + jitter;
            loop {
                tokio::time::sleep(delay).await;

                match service.attempt_once(guild_id, generation).await {
                    Some(next) => delay = next,
                    None => break,
                }
            }
        });

        if !self
            .inner
            .sessions
            .attach_retry(guild_id, generation, task.abort_handle())
            .await
        {
            task.abort();
        }
    }

    /// Runs one placement attempt under the guild lock.
    ///
    /// The target is re-read at the moment of the attempt, and the generation
    /// is checked both before the physical operation and when the outcome is
    /// stored, so a stick or unstick issued meanwhile always wins.
    ///
    /// # Returns
    /// - `Some(Duration)` - Attempt failed below the ceiling; wait this long
    /// - `None` - Session settled, abandoned, or superseded
    async fn attempt_once(&self, guild_id: GuildId, generation: u64) -> Option<Duration> {
        let lock = self.guild_lock(guild_id).await;
        let _guard = lock.lock().await;

        let state = self
            .inner
            .sessions
            .get_current(guild_id, generation)
            .await
            .filter(|state| state.is_recovering())?;
        let target = state.session.target_channel_id;

        let outcome = match self.check_target(guild_id, target).await {
            Ok(()) => {
                // The lookup awaited; an unstick may have landed meanwhile.
                self.inner
                    .sessions
                    .get_current(guild_id, generation)
                    .await?;

                ConnectionExecutor::new(self.inner.transport.as_ref())
                    .place(guild_id, target)
                    .await
            }
            Err(e) => Err(e),
        };

        let event = match outcome {
            Ok(placement) => {
                tracing::info!(
                    "Reconnected to channel {} in guild {}: {:?}",
                    target,
                    guild_id,
                    placement
                );
                SupervisorEvent::AttemptSucceeded { channel_id: target }
            }
            Err(error) => {
                tracing::warn!(
                    "Reconnect to channel {} in guild {} failed: {}",
                    target,
                    guild_id,
                    error
                );
                SupervisorEvent::AttemptFailed {
                    channel_id: target,
                    error,
                }
            }
        };

        let applied = self.commit(guild_id, Some(generation), event).await?;
        if applied.next.is_none() {
            tracing::warn!("Gave up reconnecting in guild {}", guild_id);
        }
        self.send_notifications(&applied.actions).await;

        applied.actions.iter().find_map(|action| match action {
            SupervisorAction::ScheduleAttempt { after } => Some(*after + self.inner.policy.jitter()),
            _ => None,
        })
    }

    /// Resolves the target and runs the gate against it.
    async fn check_target(&self, guild_id: GuildId, target: ChannelId) -> Result<(), VoiceError> {
        let snapshot = self
            .inner
            .directory
            .voice_channel(guild_id, target)
            .await?
            .ok_or(VoiceError::ChannelUnreachable)?;

        match gate::evaluate(&snapshot) {
            GateDecision::Eligible => Ok(()),
            GateDecision::Denied(reason) => Err(VoiceError::PermissionDenied(reason)),
        }
    }
}
