//! Change notification fan-out.
//!
//! The [`Notifier`] is an explicitly owned registry of live subscribers.
//! Each subscriber has a bounded channel; broadcasting never blocks, and a
//! subscriber that is gone, too slow to drain its buffer, or idle past the
//! configured timeout is dropped without affecting anyone else.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use seathold::clock::SystemClock;
//! use seathold::config::StreamOptions;
//! use seathold::notifier::{Notifier, SeatEvent};
//!
//! let notifier = Notifier::new(Arc::new(SystemClock), StreamOptions::default());
//! let subscription = notifier.subscribe(Some("tok1".into()));
//!
//! notifier.ping();
//! assert!(matches!(subscription.try_recv(), Ok(SeatEvent::Ping)));
//! ```

mod feed;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use serde::Serialize;

use crate::clock::Clock;
use crate::config::StreamOptions;
use crate::seat::{Seat, SeatView};

pub use crossbeam_channel::{RecvTimeoutError, TryRecvError};
pub use feed::ChangeFeed;

/// Identifies one subscription within its notifier.
pub type SubscriberId = u64;

/// An event pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatEvent {
    /// The post-mutation record of a seat.
    SeatUpdate(Seat),
    /// Keepalive.
    Ping,
}

impl SeatEvent {
    /// The event name on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SeatUpdate(_) => "seat_update",
            Self::Ping => "ping",
        }
    }

    /// Renders a seat update for a particular viewer; `None` for pings.
    ///
    /// `heldByMe` is computed against the viewer's token, not the token of
    /// whoever caused the change.
    #[must_use]
    pub fn view_for(&self, viewer_token: Option<&str>, now: DateTime<Utc>) -> Option<SeatView> {
        match self {
            Self::SeatUpdate(seat) => Some(seat.view_for(viewer_token, now)),
            Self::Ping => None,
        }
    }
}

/// A rendered event as a client receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamMessage {
    /// A seat changed.
    SeatUpdate(SeatView),
    /// Keepalive.
    Ping(&'static str),
}

struct Subscriber {
    id: SubscriberId,
    sender: Sender<SeatEvent>,
    last_active: Arc<Mutex<DateTime<Utc>>>,
}

/// Registry of live subscribers.
///
/// Broadcasts are issued under the registry lock, so every subscriber sees
/// them in the order they were issued.
pub struct Notifier {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
    options: StreamOptions,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, options: StreamOptions) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            clock,
            options,
        }
    }

    /// Returns the tuning this notifier was built with.
    #[must_use]
    pub const fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// Registers a new subscriber that receives every later broadcast.
    #[must_use]
    pub fn subscribe(&self, viewer_token: Option<String>) -> Subscription {
        let mut subscribers = self.subscribers.lock();
        self.register(&mut subscribers, viewer_token, Vec::new())
    }

    /// Registers a subscriber whose queue starts with the events `snapshot`
    /// returns.
    ///
    /// `snapshot` runs under the registry lock, so no broadcast can land
    /// between the state it reads and the events it queues. A change made
    /// after the read is broadcast after the snapshot. The buffer is grown
    /// by the snapshot's length.
    ///
    /// `snapshot` must not call back into this notifier.
    ///
    /// # Errors
    ///
    /// Returns the snapshot's error; nothing is registered in that case.
    pub fn subscribe_primed<E>(
        &self,
        viewer_token: Option<String>,
        snapshot: impl FnOnce() -> Result<Vec<SeatEvent>, E>,
    ) -> Result<Subscription, E> {
        let mut subscribers = self.subscribers.lock();
        let initial = snapshot()?;
        Ok(self.register(&mut subscribers, viewer_token, initial))
    }

    fn register(
        &self,
        subscribers: &mut Vec<Subscriber>,
        viewer_token: Option<String>,
        initial: Vec<SeatEvent>,
    ) -> Subscription {
        let (sender, receiver) = bounded(self.options.buffer.max(1) + initial.len());
        for event in initial {
            // Capacity covers the whole snapshot.
            let _ = sender.try_send(event);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let last_active = Arc::new(Mutex::new(self.clock.now()));
        subscribers.push(Subscriber {
            id,
            sender,
            last_active: Arc::clone(&last_active),
        });
        log::debug!("subscriber {id} registered with {} queued", receiver.len());

        Subscription {
            id,
            viewer_token,
            receiver,
            last_active,
            clock: Arc::clone(&self.clock),
        }
    }

    /// Pushes an event to every live subscriber and returns how many took it.
    ///
    /// Never blocks. Idle subscribers are dropped first; subscribers whose
    /// buffer is full or whose receiver is gone are dropped instead of
    /// receiving the event.
    pub fn broadcast(&self, event: &SeatEvent) -> usize {
        let now = self.clock.now();
        let mut subscribers = self.subscribers.lock();
        Self::retain_active(&mut subscribers, now, self.options.idle_timeout);

        let before = subscribers.len();
        subscribers.retain(|subscriber| match subscriber.sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("subscriber {} buffer full, dropping it", subscriber.id);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        let dead = before - subscribers.len();
        if dead > 0 {
            log::debug!("removed {dead} dead subscribers");
        }
        subscribers.len()
    }

    /// Broadcasts a keepalive.
    pub fn ping(&self) -> usize {
        self.broadcast(&SeatEvent::Ping)
    }

    /// Drops subscribers idle since before `now - idle_timeout`.
    ///
    /// Returns how many were dropped.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let mut subscribers = self.subscribers.lock();
        Self::retain_active(&mut subscribers, now, self.options.idle_timeout)
    }

    /// Returns the number of registered subscribers, including any that
    /// disconnected since the last broadcast.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn retain_active(
        subscribers: &mut Vec<Subscriber>,
        now: DateTime<Utc>,
        idle_timeout: chrono::Duration,
    ) -> usize {
        let before = subscribers.len();
        subscribers.retain(|subscriber| {
            let active = *subscriber.last_active.lock() + idle_timeout > now;
            if !active {
                log::debug!("subscriber {} idle, dropping it", subscriber.id);
            }
            active
        });
        before - subscribers.len()
    }
}

/// A subscriber's end of the stream.
///
/// Receiving marks the subscription active. Once the notifier drops it,
/// receives report a disconnect and the caller must subscribe again.
pub struct Subscription {
    id: SubscriberId,
    viewer_token: Option<String>,
    receiver: Receiver<SeatEvent>,
    last_active: Arc<Mutex<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("viewer_token", &self.viewer_token)
            .field("pending", &self.receiver.len())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Returns this subscription's id.
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Returns the token events are rendered for.
    #[must_use]
    pub fn viewer_token(&self) -> Option<&str> {
        self.viewer_token.as_deref()
    }

    /// Blocks for the next event; `None` once the notifier dropped us.
    pub fn recv(&self) -> Option<SeatEvent> {
        let event = self.receiver.recv().ok();
        self.touch();
        event
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// # Errors
    ///
    /// Returns [`RecvTimeoutError::Timeout`] if nothing arrived, or
    /// [`RecvTimeoutError::Disconnected`] once the notifier dropped us.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SeatEvent, RecvTimeoutError> {
        let event = self.receiver.recv_timeout(timeout);
        self.touch();
        event
    }

    /// Takes the next event if one is waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] if nothing is waiting, or
    /// [`TryRecvError::Disconnected`] once the notifier dropped us.
    pub fn try_recv(&self) -> Result<SeatEvent, TryRecvError> {
        let event = self.receiver.try_recv();
        self.touch();
        event
    }

    /// Renders an event for this subscription's viewer.
    #[must_use]
    pub fn render(&self, event: &SeatEvent) -> StreamMessage {
        match event.view_for(self.viewer_token(), self.clock.now()) {
            Some(view) => StreamMessage::SeatUpdate(view),
            None => StreamMessage::Ping("keepalive"),
        }
    }

    fn touch(&self) {
        *self.last_active.lock() = self.clock.now();
    }
}
