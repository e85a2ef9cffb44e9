//! The navigation event loop.
//!
//! Every input of the page (player ticks, clicks, fragment changes) becomes a
//! [`PageEvent`] on one channel, consumed by one task that owns the
//! controller. Events are handled to completion in arrival order: ticks that
//! arrive while a seek is awaiting the player are queued and, since the
//! settle guard is still raised when they are handled, ignored.

use std::sync::Arc;

use navsync_core::command::Command;
use navsync_core::event::JournalEvent;
use navsync_core::player::{PlaybackTick, Player};
use navsync_navigation::application::command_handlers::{NavOutcome, NavSync};
use navsync_navigation::application::query_handlers::{NavigationView, get_navigation_view};
use navsync_navigation::domain::commands::{FollowFragment, NavigateTo, NavigationOrigin};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::AppError;

/// An input to the navigation loop.
#[derive(Debug)]
pub enum PageEvent {
    /// The player reported its position.
    TimeUpdate(PlaybackTick),
    /// The user clicked a navigation trigger.
    Navigate {
        /// The trigger's `data-section` value.
        target: String,
        /// Which kind of trigger.
        origin: NavigationOrigin,
    },
    /// The URL fragment changed outside the carousel.
    FragmentChanged,
    /// Asks for a snapshot of the navigation state.
    Inspect(oneshot::Sender<NavigationView>),
    /// Stops the loop; the controller is returned through the join handle.
    Shutdown,
}

/// Cloneable sender side of the navigation loop.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    events: mpsc::UnboundedSender<PageEvent>,
}

impl RuntimeHandle {
    fn send(&self, event: PageEvent) -> Result<(), AppError> {
        self.events
            .send(event)
            .map_err(|_| AppError::RuntimeStopped)
    }

    /// Queues a user navigation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RuntimeStopped` if the loop has ended.
    pub fn navigate(
        &self,
        target: impl Into<String>,
        origin: NavigationOrigin,
    ) -> Result<(), AppError> {
        self.send(PageEvent::Navigate {
            target: target.into(),
            origin,
        })
    }

    /// Queues a fragment change.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RuntimeStopped` if the loop has ended.
    pub fn fragment_changed(&self) -> Result<(), AppError> {
        self.send(PageEvent::FragmentChanged)
    }

    /// Queues a playback tick.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RuntimeStopped` if the loop has ended.
    pub fn time_update(&self, seconds: f64) -> Result<(), AppError> {
        self.send(PageEvent::TimeUpdate(PlaybackTick { seconds }))
    }

    /// Snapshot of the navigation state, taken after every event queued
    /// before this call has been handled.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RuntimeStopped` if the loop has ended.
    pub async fn view(&self) -> Result<NavigationView, AppError> {
        let (reply, response) = oneshot::channel();
        self.send(PageEvent::Inspect(reply))?;
        response.await.map_err(|_| AppError::RuntimeStopped)
    }

    /// Asks the loop to stop after the events already queued.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RuntimeStopped` if the loop has ended.
    pub fn shutdown(&self) -> Result<(), AppError> {
        self.send(PageEvent::Shutdown)
    }
}

/// Spawns the navigation loop.
///
/// The task first runs [`NavSync::initialize`] with `player`, subscribes to
/// the player's time updates if it connected, then handles events until
/// [`RuntimeHandle::shutdown`]. Must be called inside a tokio runtime.
pub fn start(
    controller: NavSync,
    player: Option<Arc<dyn Player>>,
) -> (RuntimeHandle, JoinHandle<NavSync>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let handle = RuntimeHandle {
        events: sender.clone(),
    };

    let task = tokio::spawn(async move {
        let mut controller = controller;
        let link = controller.initialize(player).await;
        info!(?link, "navigation runtime started");

        if let Some(player) = controller.player() {
            let forward = sender;
            player.subscribe_time_updates(Box::new(move |tick| {
                // A closed channel only means the loop has stopped.
                let _ = forward.send(PageEvent::TimeUpdate(tick));
            }));
        }
        publish_journal(&mut controller);

        run(controller, receiver).await
    });

    (handle, task)
}

async fn run(mut controller: NavSync, mut events: mpsc::UnboundedReceiver<PageEvent>) -> NavSync {
    while let Some(event) = events.recv().await {
        match event {
            PageEvent::TimeUpdate(tick) => {
                controller.handle_time_update(tick);
            }
            PageEvent::Navigate { target, origin } => {
                let command = NavigateTo::new(target, origin);
                let outcome = controller.navigate_to(&command).await;
                log_outcome(&command, outcome);
            }
            PageEvent::FragmentChanged => {
                let command = FollowFragment::new();
                let outcome = controller.handle_fragment_change(&command).await;
                log_outcome(&command, outcome);
            }
            PageEvent::Inspect(reply) => {
                // The caller may have given up waiting.
                let _ = reply.send(get_navigation_view(&controller));
            }
            PageEvent::Shutdown => break,
        }
        publish_journal(&mut controller);
    }

    info!("navigation runtime stopped");
    controller
}

fn log_outcome(command: &dyn Command, outcome: NavOutcome) {
    debug!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        ?outcome,
        "command handled"
    );
}

fn publish_journal(controller: &mut NavSync) {
    for event in controller.take_events() {
        let meta = event.metadata();
        info!(
            event_type = event.event_type(),
            correlation_id = %meta.correlation_id,
            payload = %event.to_payload(),
            "journal"
        );
    }
}
