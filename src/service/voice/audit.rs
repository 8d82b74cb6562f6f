//! Periodic audit of settled sessions.

use crate::model::voice::{AuditReport, KeepAliveStatus};

use super::keepalive::KeepAliveEmitter;
use super::StickyVoiceService;

impl StickyVoiceService {
    /// Checks every settled session against the live transport.
    ///
    /// A dropped socket does not always produce a voice state update. When the
    /// transport is not on the target channel the session is handed to
    /// recovery exactly as if the gateway had reported it. Otherwise self-mute
    /// is re-asserted and the keep-alive payload restarted if it stopped.
    pub async fn audit(&self) -> AuditReport {
        let mut report = AuditReport::default();

        for state in self.inner.sessions.settled().await {
            let guild_id = state.session.guild_id;
            let target = state.session.target_channel_id;
            report.checked += 1;

            let current = {
                let lock = self.guild_lock(guild_id).await;
                let _guard = lock.lock().await;

                let current = self.inner.transport.current_channel(guild_id).await;
                if current == Some(target) {
                    if let Err(e) = self.inner.transport.ensure_self_muted(guild_id).await {
                        tracing::warn!(
                            "Failed to re-assert self-mute in guild {}: {}",
                            guild_id,
                            e
                        );
                    }

                    let status = KeepAliveEmitter::new(self.inner.transport.as_ref())
                        .ensure(guild_id)
                        .await;
                    if status == KeepAliveStatus::Started {
                        report.keepalive_started += 1;
                    }
                }
                current
            };

            if current != Some(target) {
                tracing::warn!(
                    "Voice audit found guild {} off its sticky channel {} (transport on {:?})",
                    guild_id,
                    target,
                    current
                );
                self.handle_voice_state(guild_id, current).await;
                report.recovering += 1;
            }
        }

        if report.checked > 0 {
            tracing::debug!(
                "Voice audit checked {} session(s): {} recovering, {} keep-alive restarted",
                report.checked,
                report.recovering,
                report.keepalive_started
            );
        }

        report
    }
}
