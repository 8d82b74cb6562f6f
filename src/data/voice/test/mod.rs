use crate::data::voice::session::VoiceSessionRepository;
use crate::model::voice::{GuildVoiceSession, SessionState, SupervisorAction, Transition};
use chrono::Utc;
use serenity::all::{ChannelId, GuildId};
use std::time::Duration;


const GUILD: GuildId = GuildId::new(1);
const CHANNEL: ChannelId = ChannelId::new(10);

fn settled_session() -> SessionState {
    SessionState::settled(GuildVoiceSession::new(GUILD, CHANNEL, Utc::now()))
}

fn store(state: SessionState) -> impl FnOnce(Option<&SessionState>) -> Transition {
    move |_| Transition {
        next: Some(state),
        actions: vec![SupervisorAction::CancelRetry],
    }
}

fn delete() -> impl FnOnce(Option<&SessionState>) -> Transition {
    |_| Transition {
        next: None,
        actions: vec![SupervisorAction::CancelRetry, SupervisorAction::Disconnect],
    }
}

fn spawn_pending() -> tokio::task::JoinHandle<()> {
    tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    })
}
