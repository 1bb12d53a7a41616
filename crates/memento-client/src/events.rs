//! Broadcast channel carrying events the hosting UI must react to.
//!
//! Built on `tokio::broadcast`: the pipeline and loaders publish, any number
//! of UI subscribers consume. Publishing never fails; events emitted while
//! nobody listens are dropped.

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Buffer size for the broadcast channel.
const CHANNEL_CAPACITY: usize = 64;

/// Events surfaced to the hosting UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The refresh token was rejected terminally; the session has been
    /// cleared and the UI should redirect to the login view with a
    /// "session expired" message.
    SessionExpired,
    /// A transient failure the user should see as a dismissable message.
    Toast {
        /// Message text.
        message: String,
    },
}

/// Stream wrapper handed to subscribers.
pub type UiEventStream = BroadcastStream<UiEvent>;

/// Shared publisher for [`UiEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl EventBus {
    /// Construct a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events emitted from this point on.
    #[must_use]
    pub fn subscribe(&self) -> UiEventStream {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Publish an event to all current subscribers.
    pub fn emit(&self, event: UiEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
