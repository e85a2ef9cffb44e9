mod common;

use std::sync::Arc;
use std::time::Duration;

use navsync_core::player::Player;
use navsync_navigation::domain::aggregates::Phase;
use navsync_navigation::domain::commands::NavigationOrigin;
use navsync_runtime::error::AppError;
use navsync_runtime::runtime;
use navsync_test_support::{
    HistoryEntry, PlayerCall, RecordingPage, ScriptedPlayer, StallingPlayer,
};
use navsync_timeline::SectionId;

fn id(raw: &str) -> SectionId {
    SectionId::new(raw).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_playback_ticks_drive_the_active_section() {
    // Arrange
    let page = Arc::new(RecordingPage::new());
    let player = Arc::new(ScriptedPlayer::playing());
    let (handle, _task) = runtime::start(
        common::build_controller(&page),
        Some(Arc::clone(&player) as Arc<dyn Player>),
    );
    let started = handle.view().await.unwrap();

    // Act
    player.emit_tick(10.0);
    player.emit_tick(31.0);
    let view = handle.view().await.unwrap();

    // Assert
    assert_eq!(started.active_section, Some(id("intro")));
    assert!(started.player_connected);
    assert_eq!(view.active_section, Some(id("features")));
    assert_eq!(view.phase, Phase::Idle);
    assert_eq!(
        page.history(),
        vec![HistoryEntry::Replace("features".into())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_ticks_during_a_seek_are_ignored_until_it_settles() {
    // Arrange
    let page = Arc::new(RecordingPage::new());
    let player = Arc::new(ScriptedPlayer::playing());
    let (handle, _task) = runtime::start(
        common::build_controller(&page),
        Some(Arc::clone(&player) as Arc<dyn Player>),
    );
    handle.view().await.unwrap();
    player.clear_calls();

    // Act
    handle.navigate("pricing", NavigationOrigin::NavItem).unwrap();
    player.emit_tick(31.0);
    let during = handle.view().await.unwrap();

    tokio::time::sleep(Duration::from_millis(1001)).await;
    let settled = handle.view().await.unwrap();
    player.emit_tick(31.0);
    let after = handle.view().await.unwrap();

    // Assert
    assert_eq!(during.active_section, Some(id("pricing")));
    assert_eq!(
        during.phase,
        Phase::Seeking {
            target: id("pricing")
        }
    );
    assert_eq!(
        player.calls(),
        vec![PlayerCall::Pause, PlayerCall::Seek(75.0), PlayerCall::Play]
    );
    assert_eq!(settled.phase, Phase::Idle);
    assert_eq!(settled.active_section, Some(id("pricing")));
    assert_eq!(after.active_section, Some(id("features")));
    assert_eq!(
        page.history(),
        vec![
            HistoryEntry::Push("pricing".into()),
            HistoryEntry::Replace("features".into()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_fragment_change_seeks_and_canonicalizes_index() {
    // Arrange
    let page = Arc::new(RecordingPage::new());
    let player = Arc::new(ScriptedPlayer::paused());
    let (handle, _task) = runtime::start(
        common::build_controller(&page),
        Some(Arc::clone(&player) as Arc<dyn Player>),
    );
    handle.view().await.unwrap();
    player.clear_calls();

    // Act
    page.set_fragment("1");
    handle.fragment_changed().unwrap();
    let view = handle.view().await.unwrap();

    // Assert
    assert_eq!(view.active_section, Some(id("features")));
    assert_eq!(player.calls(), vec![PlayerCall::Seek(30.0)]);
    assert_eq!(
        page.history(),
        vec![HistoryEntry::Replace("features".into())]
    );
    assert_eq!(page.scrolled_to_top(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_runs_without_a_player() {
    // Arrange
    let page = Arc::new(RecordingPage::with_fragment("pricing"));
    let (handle, _task) = runtime::start(common::build_controller(&page), None);

    // Act
    let started = handle.view().await.unwrap();
    handle.navigate("features", NavigationOrigin::MobileMenu).unwrap();
    let view = handle.view().await.unwrap();

    // Assert
    assert_eq!(started.active_section, Some(id("pricing")));
    assert!(!started.player_connected);
    assert_eq!(page.revealed(), 1);
    assert_eq!(view.active_section, Some(id("features")));
    assert_eq!(page.menu_closed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_returns_the_controller_and_closes_the_handle() {
    // Arrange
    let page = Arc::new(RecordingPage::new());
    let player = Arc::new(ScriptedPlayer::paused());
    let (handle, task) = runtime::start(
        common::build_controller(&page),
        Some(Arc::clone(&player) as Arc<dyn Player>),
    );
    handle.navigate("features", NavigationOrigin::InPageLink).unwrap();

    // Act
    handle.shutdown().unwrap();
    let mut controller = task.await.unwrap();

    // Assert
    assert_eq!(controller.state().active(), Some(&id("features")));
    assert!(controller.take_events().is_empty());
    assert!(matches!(
        handle.navigate("intro", NavigationOrigin::NavItem),
        Err(AppError::RuntimeStopped)
    ));
    assert!(matches!(handle.view().await, Err(AppError::RuntimeStopped)));
    // Ticks after shutdown are dropped silently.
    player.emit_tick(80.0);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_player_does_not_block_later_navigation() {
    // Arrange
    let page = Arc::new(RecordingPage::new());
    let (handle, _task) = runtime::start(
        common::build_controller(&page),
        Some(Arc::new(StallingPlayer) as Arc<dyn Player>),
    );
    handle.view().await.unwrap();

    // Act
    handle.navigate("pricing", NavigationOrigin::NavItem).unwrap();
    handle.navigate("features", NavigationOrigin::NavItem).unwrap();
    let view = tokio::time::timeout(Duration::from_secs(60), handle.view())
        .await
        .expect("navigation loop stalled")
        .unwrap();

    // Assert
    assert_eq!(view.active_section, Some(id("features")));
    assert!(view.player_connected);
    assert_eq!(
        page.history(),
        vec![
            HistoryEntry::Push("pricing".into()),
            HistoryEntry::Push("features".into()),
        ]
    );
}
