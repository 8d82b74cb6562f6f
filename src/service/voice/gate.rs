//! Permission gate for voice placement.

use crate::model::voice::{DenialReason, GateDecision, VoiceChannelKind, VoiceChannelSnapshot};

/// Decides whether the bot may occupy a channel.
///
/// View is checked before connect, and capacity last. A full voice channel is
/// still eligible when the bot holds move-members, which lets it bypass the
/// member cap. Stage channels never have a cap.
pub fn evaluate(snapshot: &VoiceChannelSnapshot) -> GateDecision {
    let permissions = snapshot.permissions;

    if !permissions.view_channel() {
        return GateDecision::Denied(DenialReason::NoView);
    }
    if !permissions.connect() {
        return GateDecision::Denied(DenialReason::NoConnect);
    }

    if snapshot.kind == VoiceChannelKind::Voice {
        if let Some(limit) = snapshot.user_limit.filter(|limit| *limit > 0) {
            let full = snapshot.occupancy >= limit as usize;
            if full && !permissions.move_members() {
                return GateDecision::Denied(DenialReason::ChannelFull);
            }
        }
    }

    GateDecision::Eligible
}
