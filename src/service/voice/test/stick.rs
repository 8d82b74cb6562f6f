use super::*;

/// Tests sticking when the bot is not in voice.
///
/// Verifies that the bot connects, the keep-alive payload is started, and a
/// settled session with zero failures is stored.
///
/// Expected: Ok with Placement::Connected
#[tokio::test]
async fn connects_and_creates_session() {
    let h = Harness::new();

    let placement = h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();

    assert_eq!(placement.placement, Placement::Connected);
    assert_eq!(placement.channel_name, "Alpha");
    assert_eq!(
        h.transport.calls(),
        vec![
            TransportCall::Connect(CHANNEL_A),
            TransportCall::StartKeepAlive
        ]
    );

    let state = h.service.sessions().get(GUILD).await.unwrap();
    assert_eq!(state.phase, SessionPhase::Settled);
    assert_eq!(state.session.target_channel_id, CHANNEL_A);
    assert_eq!(state.session.consecutive_failures, 0);
    assert!(h.notifier.messages().is_empty());
}

/// Tests sticking without being in a voice channel.
///
/// Expected: Err(NotInVoice) and no session
#[tokio::test]
async fn denies_when_invoker_not_in_voice() {
    let h = Harness::new();

    let result = h.service.stick(GUILD, None).await;

    assert_eq!(result, Err(StickDenial::NotInVoice));
    assert_eq!(h.service.sessions().len().await, 0);
    assert!(h.transport.calls().is_empty());
}

/// Tests sticking to a channel the directory cannot resolve as voice.
///
/// Expected: Err(NotConnectable) and no session
#[tokio::test]
async fn denies_unknown_channel() {
    let h = Harness::new();

    let result = h.service.stick(GUILD, Some(ChannelId::new(99))).await;

    assert_eq!(result, Err(StickDenial::NotConnectable));
    assert_eq!(h.service.sessions().len().await, 0);
}

/// Tests a channel lookup that cannot be answered.
///
/// Verifies that an outage is reported as a failed connect rather than a
/// non-voice channel, and nothing is written or notified.
///
/// Expected: Err(ConnectFailed), then a normal stick succeeds
#[tokio::test]
async fn lookup_failure_reports_connect_failed() {
    let h = Harness::new();
    h.directory.fail_next(1);

    let result = h.service.stick(GUILD, Some(CHANNEL_A)).await;

    assert_eq!(result, Err(StickDenial::ConnectFailed));
    assert_eq!(h.service.sessions().len().await, 0);
    assert!(h.transport.calls().is_empty());
    assert!(h.notifier.messages().is_empty());

    let placement = h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();
    assert_eq!(placement.placement, Placement::Connected);
}

/// Tests that a gate denial on stick is reported to the invoker and the
/// operator.
///
/// Expected: Err(PermissionDenied(NoConnect)), one notification, no transport call
#[tokio::test]
async fn gate_denial_notifies_operator() {
    let h = Harness::new();
    h.directory.set_permissions(CHANNEL_A, Permissions::VIEW_CHANNEL);

    let result = h.service.stick(GUILD, Some(CHANNEL_A)).await;

    assert_eq!(
        result,
        Err(StickDenial::PermissionDenied(DenialReason::NoConnect))
    );
    assert!(h.transport.calls().is_empty());
    assert_eq!(h.service.sessions().len().await, 0);

    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("no connect"));
}

/// Tests a transport failure during stick.
///
/// Verifies that a failed connect creates no session and an existing session
/// for another channel is left in place.
///
/// Expected: Err(ConnectFailed), previous session unchanged
#[tokio::test]
async fn transport_failure_creates_no_session() {
    let h = Harness::new();
    h.transport.fail_next(1);

    let result = h.service.stick(GUILD, Some(CHANNEL_A)).await;

    assert_eq!(result, Err(StickDenial::ConnectFailed));
    assert_eq!(h.service.sessions().len().await, 0);

    h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();
    h.transport.fail_next(1);
    let result = h.service.stick(GUILD, Some(CHANNEL_B)).await;

    assert_eq!(result, Err(StickDenial::ConnectFailed));
    let state = h.service.sessions().get(GUILD).await.unwrap();
    assert_eq!(state.session.target_channel_id, CHANNEL_A);
}

/// Tests re-sticking to another channel.
///
/// Expected: Placement::Moved and the session retargeted
#[tokio::test]
async fn restick_moves_connection() {
    let h = Harness::new();
    h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();

    let placement = h.service.stick(GUILD, Some(CHANNEL_B)).await.unwrap();

    assert_eq!(placement.placement, Placement::Moved);
    assert_eq!(h.transport.current(GUILD), Some(CHANNEL_B));
    let state = h.service.sessions().get(GUILD).await.unwrap();
    assert_eq!(state.session.target_channel_id, CHANNEL_B);
}

/// Tests sticking to the channel the bot already occupies.
///
/// Verifies that no transport operation is issued and the running keep-alive
/// is not restarted.
///
/// Expected: Placement::AlreadyPresent
#[tokio::test]
async fn restick_same_channel_is_noop() {
    let h = Harness::new();
    h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();

    let placement = h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();

    assert_eq!(placement.placement, Placement::AlreadyPresent);
    assert_eq!(
        h.transport.calls(),
        vec![
            TransportCall::Connect(CHANNEL_A),
            TransportCall::StartKeepAlive
        ]
    );
}

/// Tests that a full channel is refused unless the bot can move members.
///
/// Expected: ChannelFull without move-members, Connected with it
#[tokio::test]
async fn full_channel_requires_move_members() {
    let h = Harness::new();
    let mut full = voice_channel(CHANNEL_A, "Alpha");
    full.user_limit = Some(2);
    full.occupancy = 2;
    h.directory.insert(full);

    let denied = h.service.stick(GUILD, Some(CHANNEL_A)).await;
    assert_eq!(
        denied,
        Err(StickDenial::PermissionDenied(DenialReason::ChannelFull))
    );

    h.directory.set_permissions(
        CHANNEL_A,
        Permissions::VIEW_CHANNEL | Permissions::CONNECT | Permissions::MOVE_MEMBERS,
    );
    let placed = h.service.stick(GUILD, Some(CHANNEL_A)).await.unwrap();
    assert_eq!(placed.placement, Placement::Connected);
}
