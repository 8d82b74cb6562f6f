//! Reconnection state machine.
//!
//! The supervisor never mutates a session directly. Every change is the result
//! of feeding an event to [`transition`] together with the stored state, and the
//! returned actions are carried out by the caller after the new state is stored.
//! Keeping this function free of I/O lets the full recovery policy be tested
//! without a voice transport.

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId};

use crate::error::voice::VoiceError;
use crate::model::voice::{
    GuildVoiceSession, SessionPhase, SessionState, SupervisorAction, Transition,
};
use crate::service::voice::backoff::BackoffPolicy;

/// Input to the reconnection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A "stick" placed the bot in `channel_id`.
    Stuck { channel_id: ChannelId },
    /// An "unstick" was requested.
    Unstuck,
    /// The gateway reported the bot's own voice channel.
    VoiceStateChanged { channel_id: Option<ChannelId> },
    /// A recovery attempt placed the bot in `channel_id`.
    AttemptSucceeded { channel_id: ChannelId },
    /// A recovery attempt towards `channel_id` failed.
    AttemptFailed {
        channel_id: ChannelId,
        error: VoiceError,
    },
}

/// Computes the next state and the actions to perform for one event.
///
/// # Arguments
/// - `guild_id` - Guild the event belongs to
/// - `current` - Stored state, `None` when the guild is idle
/// - `event` - Event to apply
/// - `policy` - Retry budget and delay curve
/// - `now` - Time the event is applied
pub fn transition(
    guild_id: GuildId,
    current: Option<&SessionState>,
    event: SupervisorEvent,
    policy: &BackoffPolicy,
    now: DateTime<Utc>,
) -> Transition {
    match event {
        SupervisorEvent::Stuck { channel_id } => Transition {
            next: Some(SessionState::settled(GuildVoiceSession::new(
                guild_id, channel_id, now,
            ))),
            actions: vec![SupervisorAction::CancelRetry],
        },

        SupervisorEvent::Unstuck => Transition {
            next: None,
            actions: vec![SupervisorAction::CancelRetry, SupervisorAction::Disconnect],
        },

        SupervisorEvent::VoiceStateChanged { channel_id } => {
            let Some(state) = current else {
                return Transition::unchanged(current);
            };

            match state.phase {
                // An attempt is already scheduled or running.
                SessionPhase::Recovering => Transition::unchanged(current),
                SessionPhase::Settled => {
                    let session = &state.session;
                    if channel_id == Some(session.target_channel_id) {
                        return Transition::unchanged(current);
                    }

                    // A full unit from the drop, so the gateway settles first and a
                    // flapping channel gets at most one attempt per unit.
                    let after = policy.delay_for(session.consecutive_failures);
                    Transition {
                        next: Some(SessionState::recovering(session.clone())),
                        actions: vec![SupervisorAction::ScheduleAttempt { after }],
                    }
                }
            }
        }

        SupervisorEvent::AttemptSucceeded { channel_id } => {
            let Some(state) = current.filter(|s| s.session.target_channel_id == channel_id)
            else {
                return Transition::unchanged(current);
            };

            let mut session = state.session.clone();
            session.consecutive_failures = 0;
            session.last_attempt_at = now;

            Transition {
                next: Some(SessionState::settled(session)),
                actions: Vec::new(),
            }
        }

        SupervisorEvent::AttemptFailed { channel_id, error } => {
            let Some(state) = current.filter(|s| s.session.target_channel_id == channel_id)
            else {
                return Transition::unchanged(current);
            };

            if error == VoiceError::ChannelUnreachable {
                return Transition {
                    next: None,
                    actions: vec![SupervisorAction::Notify(format!(
                        "Auto-reconnect stopped in guild {}: channel {} is no longer reachable.",
                        guild_id, channel_id
                    ))],
                };
            }

            let mut session = state.session.clone();
            session.consecutive_failures = session.consecutive_failures.saturating_add(1);
            session.last_attempt_at = now;

            if policy.is_exhausted(session.consecutive_failures) {
                return Transition {
                    next: None,
                    actions: vec![SupervisorAction::Notify(format!(
                        "Auto-reconnect stopped in guild {}: too many failed attempts. Last error: {}",
                        guild_id, error
                    ))],
                };
            }

            let after = policy.delay_for(session.consecutive_failures);
            Transition {
                next: Some(SessionState::recovering(session)),
                actions: vec![SupervisorAction::ScheduleAttempt { after }],
            }
        }
    }
}
