use super::*;

/// Tests that a silently dropped connection is detected.
///
/// Verifies that the audit hands the session to recovery without any voice
/// state update, and the recovery reconnects it.
///
/// Expected: one recovering session, reconnected after the base delay
#[tokio::test(start_paused = true)]
async fn detects_dropped_connection() {
    let h = Harness::new();
    h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();
    h.transport.drop_connection(GUILD);

    let report = h.service.audit().await;

    assert_eq!(report.checked, 1);
    assert_eq!(report.recovering, 1);
    assert!(h.service.sessions().get(GUILD).await.unwrap().is_recovering());

    advance(1.5).await;

    assert_eq!(h.transport.current(GUILD), Some(CHANNEL_A));
    let state = h.service.sessions().get(GUILD).await.unwrap();
    assert_eq!(state.phase, SessionPhase::Settled);
}

/// Tests that a stopped keep-alive stream is restarted.
///
/// Expected: keepalive_started 1, transport streaming again
#[tokio::test]
async fn restarts_stopped_keepalive() {
    let h = Harness::new();
    h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();
    h.transport.stop_stream(GUILD);

    let report = h.service.audit().await;

    assert_eq!(report.checked, 1);
    assert_eq!(report.recovering, 0);
    assert_eq!(report.keepalive_started, 1);
    assert!(h.transport.is_streaming(GUILD).await);
}

/// Tests an audit over healthy and recovering sessions.
///
/// Verifies that a healthy session needs no action and a recovering one is
/// left to its running retry.
///
/// Expected: only the settled session is checked, nothing restarted
#[tokio::test(start_paused = true)]
async fn skips_recovering_sessions() {
    let h = Harness::new();
    h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();

    let other = GuildId::new(2);
    h.service.stick(other, Some(CHANNEL_B)).await.unwrap();
    h.transport.drop_connection(other);
    h.service.handle_voice_state(other, None).await;

    let report = h.service.audit().await;

    assert_eq!(report.checked, 1);
    assert_eq!(report.recovering, 0);
    assert_eq!(report.keepalive_started, 0);
}
