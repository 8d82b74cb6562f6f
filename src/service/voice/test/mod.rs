use crate::data::discord::VoiceDirectory;
use crate::data::voice::transport::VoiceTransport;
use crate::error::voice::{DirectoryError, TransportError, VoiceError};
use crate::model::voice::{
    DenialReason, KeepAliveStatus, Placement, SessionPhase, StickDenial, VoiceChannelKind,
    VoiceChannelSnapshot,
};
use crate::service::notify::Notifier;
use crate::service::voice::backoff::BackoffPolicy;
use crate::service::voice::StickyVoiceService;
use serenity::all::{ChannelId, GuildId, Permissions};
use serenity::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

mod audit;
mod stick;

const GUILD: GuildId = GuildId::new(1);
const CHANNEL_A: ChannelId = ChannelId::new(10);
const CHANNEL_B: ChannelId = ChannelId::new(20);

/// Physical operations recorded by [`FakeTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransportCall {
    Connect(ChannelId),
    MoveTo(ChannelId),
    Disconnect,
    StartKeepAlive,
}

/// Holds a placement inside the transport until released.
#[derive(Default)]
struct Hold {
    entered: Notify,
    release: Notify,
}

impl Hold {
    /// Waits until the held placement has started.
    async fn entered(&self) {
        self.entered.notified().await;
    }

    fn release(&self) {
        self.release.notify_one();
    }
}

/// In-memory voice connection per guild.
#[derive(Default)]
struct FakeTransport {
    current: Mutex<HashMap<GuildId, ChannelId>>,
    streaming: Mutex<HashSet<GuildId>>,
    calls: Mutex<Vec<TransportCall>>,
    /// Connect and move calls that fail before the next one succeeds.
    fail_next: AtomicUsize,
    fail_always: Mutex<bool>,
    fail_keepalive: Mutex<bool>,
    self_mute_checks: AtomicUsize,
    hold: Mutex<Option<Arc<Hold>>>,
}

impl FakeTransport {
    fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    fn placements(&self) -> Vec<TransportCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, TransportCall::Connect(_) | TransportCall::MoveTo(_)))
            .collect()
    }

    fn current(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.current.lock().unwrap().get(&guild_id).copied()
    }

    /// Drops the connection without any call, like a kick or a network loss.
    fn drop_connection(&self, guild_id: GuildId) {
        self.current.lock().unwrap().remove(&guild_id);
        self.streaming.lock().unwrap().remove(&guild_id);
    }

    fn stop_stream(&self, guild_id: GuildId) {
        self.streaming.lock().unwrap().remove(&guild_id);
    }

    fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    fn fail_always(&self) {
        *self.fail_always.lock().unwrap() = true;
    }

    /// Blocks the next connect or move, with the guild lock held by its caller,
    /// until the returned hold is released.
    fn hold_next_placement(&self) -> Arc<Hold> {
        let hold = Arc::new(Hold::default());
        *self.hold.lock().unwrap() = Some(hold.clone());
        hold
    }

    fn should_fail(&self) -> bool {
        if *self.fail_always.lock().unwrap() {
            return true;
        }
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    async fn place(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        call: TransportCall,
    ) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(call);

        let hold = self.hold.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }

        if self.should_fail() {
            return Err(TransportError::new("voice gateway timed out"));
        }
        self.current.lock().unwrap().insert(guild_id, channel_id);
        Ok(())
    }
}

#[async_trait]
impl VoiceTransport for FakeTransport {
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.current(guild_id)
    }

    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), TransportError> {
        self.place(guild_id, channel_id, TransportCall::Connect(channel_id))
            .await
    }

    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), TransportError> {
        self.place(guild_id, channel_id, TransportCall::MoveTo(channel_id))
            .await
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<bool, TransportError> {
        self.calls.lock().unwrap().push(TransportCall::Disconnect);
        self.streaming.lock().unwrap().remove(&guild_id);
        Ok(self.current.lock().unwrap().remove(&guild_id).is_some())
    }

    async fn ensure_self_muted(&self, _guild_id: GuildId) -> Result<(), TransportError> {
        self.self_mute_checks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn is_streaming(&self, guild_id: GuildId) -> bool {
        self.streaming.lock().unwrap().contains(&guild_id)
    }

    async fn start_keepalive(&self, guild_id: GuildId) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(TransportCall::StartKeepAlive);
        if *self.fail_keepalive.lock().unwrap() {
            return Err(TransportError::new("encoder unavailable"));
        }
        self.streaming.lock().unwrap().insert(guild_id);
        Ok(())
    }
}

/// Channel lookups served from a mutable map.
#[derive(Default)]
struct FakeDirectory {
    channels: Mutex<HashMap<ChannelId, VoiceChannelSnapshot>>,
    lookups: AtomicUsize,
    /// Lookups that fail before the next one is answered.
    fail_next: AtomicUsize,
}

impl FakeDirectory {
    fn insert(&self, snapshot: VoiceChannelSnapshot) {
        self.channels
            .lock()
            .unwrap()
            .insert(snapshot.channel_id, snapshot);
    }

    fn remove(&self, channel_id: ChannelId) {
        self.channels.lock().unwrap().remove(&channel_id);
    }

    fn set_permissions(&self, channel_id: ChannelId, permissions: Permissions) {
        if let Some(snapshot) = self.channels.lock().unwrap().get_mut(&channel_id) {
            snapshot.permissions = permissions;
        }
    }

    fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceDirectory for FakeDirectory {
    async fn voice_channel(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<VoiceChannelSnapshot>, DirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DirectoryError::new("guild 1 is not cached"));
        }
        Ok(self.channels.lock().unwrap().get(&channel_id).cloned())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    service: StickyVoiceService,
    directory: Arc<FakeDirectory>,
    transport: Arc<FakeTransport>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// Service with channels A and B joinable and no jitter.
    fn new() -> Self {
        let directory = Arc::new(FakeDirectory::default());
        directory.insert(voice_channel(CHANNEL_A, "Alpha"));
        directory.insert(voice_channel(CHANNEL_B, "Bravo"));

        let transport = Arc::new(FakeTransport::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let service = StickyVoiceService::new(
            directory.clone(),
            transport.clone(),
            notifier.clone(),
            policy(),
        );

        Self {
            service,
            directory,
            transport,
            notifier,
        }
    }

    /// Sticks to channel A and drops the connection behind the bot's back,
    /// then delivers the matching voice state update.
    async fn stick_then_disconnect(&self) {
        self.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();
        self.transport.drop_connection(GUILD);
        self.service.handle_voice_state(GUILD, None).await;
    }
}

fn policy() -> BackoffPolicy {
    BackoffPolicy {
        base: 2,
        unit: Duration::from_secs(1),
        ceiling: 3,
        max_jitter: Duration::ZERO,
    }
}

fn voice_channel(channel_id: ChannelId, name: &str) -> VoiceChannelSnapshot {
    VoiceChannelSnapshot {
        channel_id,
        name: name.to_string(),
        kind: VoiceChannelKind::Voice,
        user_limit: None,
        occupancy: 0,
        permissions: Permissions::VIEW_CHANNEL | Permissions::CONNECT,
    }
}

/// Advances paused time, letting every task due in between run.
async fn advance(seconds: f64) {
    tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
}
