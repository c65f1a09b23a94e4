use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

const ROOM_CAPACITY: usize = 64;

/// An event published to a room, delivered to clients as
/// `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomEvent {
    pub event: String,
    pub data: serde_json::Value,
}

impl RoomEvent {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Named rooms backed by broadcast channels. Rooms are created on the first
/// subscribe and dropped when their last subscriber leaves.
#[derive(Clone, Default)]
pub struct RoomBroadcaster {
    inner: Arc<RwLock<HashMap<String, Room>>>,
}

struct Room {
    sender: broadcast::Sender<RoomEvent>,
    subscriber_count: usize,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, room: &str) -> broadcast::Receiver<RoomEvent> {
        let mut rooms = self.inner.write().await;

        let entry = rooms.entry(room.to_string()).or_insert_with(|| {
            let (sender, _) = broadcast::channel(ROOM_CAPACITY);
            tracing::debug!("Created room {room}");
            Room {
                sender,
                subscriber_count: 0,
            }
        });

        entry.subscriber_count += 1;
        tracing::debug!("Joined room {room} ({} members)", entry.subscriber_count);

        entry.sender.subscribe()
    }

    pub async fn unsubscribe(&self, room: &str) {
        let mut rooms = self.inner.write().await;

        if let Some(entry) = rooms.get_mut(room) {
            entry.subscriber_count = entry.subscriber_count.saturating_sub(1);

            if entry.subscriber_count == 0 {
                rooms.remove(room);
                tracing::debug!("Removed empty room {room}");
            }
        }
    }

    /// Send an event to everyone currently in `room`. Returns the number of
    /// receivers reached; a room nobody has joined reaches zero.
    pub async fn publish(&self, room: &str, event: RoomEvent) -> usize {
        let rooms = self.inner.read().await;

        let Some(entry) = rooms.get(room) else {
            tracing::debug!("No members in room {room}, dropping {}", event.event);
            return 0;
        };

        match entry.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!("Published to room {room} ({receivers} receivers)");
                receivers
            }
            Err(_) => 0,
        }
    }

    pub async fn subscriber_count(&self, room: &str) -> usize {
        let rooms = self.inner.read().await;
        rooms.get(room).map(|r| r.subscriber_count).unwrap_or(0)
    }

    pub async fn room_count(&self) -> usize {
        self.inner.read().await.len()
    }
}
