//! Event types for the jester event system
//!
//! Provides the stage event definitions and the EventBus shared by the
//! performance loop and whatever presents it.

mod overlay_types;

pub use overlay_types::{Overlay, OverlayKind};

use crate::models::{JokeId, PerformanceState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Stage event types
///
/// One event is emitted after every observable mutation of the performance
/// loop. Events are fire-and-forget; nobody acknowledges them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StageEvent {
    /// Performance state changed
    StateChanged {
        session_id: String,
        old_state: PerformanceState,
        new_state: PerformanceState,
        timestamp: DateTime<Utc>,
    },

    /// Act 1 obtained a joke
    JokeFetched {
        session_id: String,
        joke_id: JokeId,
        category: String,
        timestamp: DateTime<Utc>,
    },

    /// Act 3 produced an analysis of the predicted punchline
    GuessAnalyzed {
        session_id: String,
        joke_id: JokeId,
        predicted_punchline: String,
        similarity: f64,
        confidence: f64,
        is_triumph: bool,
        timestamp: DateTime<Utc>,
    },

    /// Act 4 classified the joke and updated the session tallies
    Revealed {
        session_id: String,
        joke_id: JokeId,
        is_triumph: bool,
        triumphs: u32,
        defeats: u32,
        timestamp: DateTime<Utc>,
    },

    /// A blocking overlay was raised or cleared
    OverlayChanged {
        session_id: String,
        overlay: OverlayKind,
        active: bool,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Manual network retry progress
    RetryProgress {
        session_id: String,
        is_retrying: bool,
        retry_count: u32,
        timestamp: DateTime<Utc>,
    },

    /// Session was discarded and a fresh one created
    SessionCleared {
        old_session_id: String,
        new_session_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Performance loop stopped
    Stopped {
        session_id: String,
        triumphs: u32,
        defeats: u32,
        timestamp: DateTime<Utc>,
    },
}

impl StageEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            StageEvent::StateChanged { .. } => "StateChanged",
            StageEvent::JokeFetched { .. } => "JokeFetched",
            StageEvent::GuessAnalyzed { .. } => "GuessAnalyzed",
            StageEvent::Revealed { .. } => "Revealed",
            StageEvent::OverlayChanged { .. } => "OverlayChanged",
            StageEvent::RetryProgress { .. } => "RetryProgress",
            StageEvent::SessionCleared { .. } => "SessionCleared",
            StageEvent::Stopped { .. } => "Stopped",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block the performance loop)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use jester_common::events::{EventBus, StageEvent};
/// use jester_common::PerformanceState;
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(StageEvent::StateChanged {
///     session_id: "a1b2c3d4".to_string(),
///     old_state: PerformanceState::Idle,
///     new_state: PerformanceState::Fetching,
///     timestamp: chrono::Utc::now(),
/// });
///
/// let event = rx.try_recv().unwrap();
/// assert_eq!(event.event_type(), "StateChanged");
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StageEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// * `capacity` - Number of events to buffer before lagging receivers lose old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<StageEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: StageEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_changed() -> StageEvent {
        StageEvent::StateChanged {
            session_id: "deadbeef".to_string(),
            old_state: PerformanceState::Idle,
            new_state: PerformanceState::Fetching,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
    }

    #[test]
    fn test_eventbus_without_subscribers_is_silent() {
        let bus = EventBus::new(10);
        bus.emit_lossy(state_changed());

        // Subscribers only see events emitted after they joined
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_eventbus_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit_lossy(state_changed());

        assert_eq!(rx1.try_recv().unwrap().event_type(), "StateChanged");
        assert_eq!(rx2.try_recv().unwrap().event_type(), "StateChanged");
    }

    #[test]
    fn test_eventbus_emit_lossy_on_full_channel() {
        let bus = EventBus::new(2);
        let _rx = bus.subscribe();
        for _ in 0..10 {
            bus.emit_lossy(state_changed());
        }
        assert_eq!(bus.capacity(), 2);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = StageEvent::OverlayChanged {
            session_id: "deadbeef".to_string(),
            overlay: OverlayKind::NetworkAwaiting,
            active: true,
            message: "The courier was lost on the road...".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"OverlayChanged\""));
        assert!(json.contains("\"overlay\":\"networkAwaiting\""));

        let back: StageEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type(), "OverlayChanged");
    }
}
