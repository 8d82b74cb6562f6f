//! Sticky voice domain models.
//!
//! Provides the records the sticky voice subsystem reasons about: the per-guild
//! session describing where the bot must stay, a point-in-time snapshot of a
//! voice channel as seen by the bot, and the outcomes reported back to the
//! command surface.

use std::fmt;

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, Permissions};

/// Where the bot must be in a guild and how recovery is going.
///
/// A session only exists while a target channel is set; clearing the target
/// removes the session from the store instead of leaving an empty record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildVoiceSession {
    /// Guild the session belongs to.
    pub guild_id: GuildId,
    /// Voice or stage channel the bot must occupy.
    pub target_channel_id: ChannelId,
    /// Failed placement attempts since the last success.
    pub consecutive_failures: u32,
    /// Time of the last placement attempt, successful or not.
    pub last_attempt_at: DateTime<Utc>,
}

impl GuildVoiceSession {
    /// Creates a freshly placed session with no recorded failures.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the session belongs to
    /// - `target_channel_id` - Channel the bot was just placed in
    /// - `now` - Time of the successful placement
    pub fn new(guild_id: GuildId, target_channel_id: ChannelId, now: DateTime<Utc>) -> Self {
        Self {
            guild_id,
            target_channel_id,
            consecutive_failures: 0,
            last_attempt_at: now,
        }
    }
}

/// Supervisor phase of an existing session.
///
/// `Idle` is represented by the absence of a session and the abandoned state is
/// never stored, so only the two live phases appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The bot occupies the target channel.
    Settled,
    /// The bot is absent or misplaced and a bounded retry sequence is running.
    Recovering,
}

/// A session together with its supervisor phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session: GuildVoiceSession,
    pub phase: SessionPhase,
}

impl SessionState {
    pub fn settled(session: GuildVoiceSession) -> Self {
        Self {
            session,
            phase: SessionPhase::Settled,
        }
    }

    pub fn recovering(session: GuildVoiceSession) -> Self {
        Self {
            session,
            phase: SessionPhase::Recovering,
        }
    }

    pub fn is_recovering(&self) -> bool {
        self.phase == SessionPhase::Recovering
    }
}

/// Channel kinds that can hold a voice connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceChannelKind {
    Voice,
    Stage,
}

/// Voice channel as seen by the bot at lookup time.
///
/// Permissions are already resolved for the bot's own member, including role
/// permissions and channel overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceChannelSnapshot {
    pub channel_id: ChannelId,
    pub name: String,
    pub kind: VoiceChannelKind,
    /// Maximum number of members, `None` when the channel is unlimited.
    pub user_limit: Option<u32>,
    /// Members currently in the channel, not counting the bot itself.
    pub occupancy: usize,
    /// The bot's effective permissions in this channel.
    pub permissions: Permissions,
}

/// Why the permission gate refused a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NoView,
    NoConnect,
    ChannelFull,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenialReason::NoView => "no view_channel",
            DenialReason::NoConnect => "no connect",
            DenialReason::ChannelFull => "channel full",
        };
        f.write_str(text)
    }
}

/// Decision of the permission gate for a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Eligible,
    Denied(DenialReason),
}

impl GateDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, GateDecision::Eligible)
    }
}

/// Physical operation performed by the connection executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Opened a fresh voice connection.
    Connected,
    /// Moved an existing connection from another channel.
    Moved,
    /// The existing connection was already on the target channel.
    AlreadyPresent,
}

/// Successful result of the "stick" command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickPlacement {
    pub channel_name: String,
    pub placement: Placement,
}

/// Reasons the "stick" command can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickDenial {
    /// The invoker is not in a voice channel.
    NotInVoice,
    /// The invoker's channel cannot hold a voice connection.
    NotConnectable,
    /// The permission gate refused the channel.
    PermissionDenied(DenialReason),
    /// The channel lookup or the voice transport failed.
    ConnectFailed,
}

/// Result of the "unstick" command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnstickOutcome {
    /// Whether a live voice connection was closed.
    pub was_connected: bool,
}

/// Result of pushing the keep-alive payload onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAliveStatus {
    /// No live transport for the guild.
    NotConnected,
    /// The transport already carries a stream, nothing was started.
    AlreadyStreaming,
    /// The keep-alive payload was started.
    Started,
    /// The transport refused the payload.
    Failed,
}

/// Summary of one pass of the voice audit sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Settled sessions inspected.
    pub checked: usize,
    /// Sessions whose transport was found off-target and handed to recovery.
    pub recovering: usize,
    /// Sessions where the keep-alive payload had to be restarted.
    pub keepalive_started: usize,
}

/// Side effect requested by the reconnection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorAction {
    /// Run the next placement attempt once the delay has elapsed.
    ScheduleAttempt { after: std::time::Duration },
    /// Drop any scheduled attempt and invalidate attempts already in flight.
    CancelRetry,
    /// Forcibly close the guild's voice transport.
    Disconnect,
    /// Send an operational notification.
    Notify(String),
}

/// Result of feeding one event to the reconnection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State to store; `None` deletes the session.
    pub next: Option<SessionState>,
    pub actions: Vec<SupervisorAction>,
}

impl Transition {
    /// Keeps the current state and requests nothing.
    pub fn unchanged(current: Option<&SessionState>) -> Self {
        Self {
            next: current.cloned(),
            actions: Vec::new(),
        }
    }
}
