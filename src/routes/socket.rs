use std::collections::HashMap;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::rooms::{RoomBroadcaster, RoomEvent};
use crate::AppState;

pub const JOIN_PROJECT_ROOM_EVENT: &str = "joinProjectRoom";

const SEND_BUFFER: usize = 32;

/// A frame sent by the client: `{"event": "joinProjectRoom", "data": "<room>"}`.
#[derive(Debug, Deserialize)]
struct ClientMessage {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(upgrade))
}

async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let rooms = state.service.rooms().clone();
    ws.on_upgrade(move |socket| handle_socket(socket, rooms))
}

async fn handle_socket(socket: WebSocket, rooms: RoomBroadcaster) {
    let connection_id = Uuid::new_v4();
    tracing::info!("Client {connection_id} connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<RoomEvent>(SEND_BUFFER);

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode {} event: {e}", event.event);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut joined: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_client_message(connection_id, text.as_str(), &rooms, &tx, &mut joined)
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("WebSocket error on {connection_id}: {e}");
                break;
            }
        }
    }

    for (room, forwarder) in joined {
        forwarder.abort();
        rooms.unsubscribe(&room).await;
    }
    drop(tx);
    let _ = send_task.await;

    tracing::info!("Client {connection_id} disconnected");
}

async fn handle_client_message(
    connection_id: Uuid,
    text: &str,
    rooms: &RoomBroadcaster,
    tx: &mpsc::Sender<RoomEvent>,
    joined: &mut HashMap<String, JoinHandle<()>>,
) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Ignoring malformed frame from {connection_id}: {e}");
            return;
        }
    };

    if message.event != JOIN_PROJECT_ROOM_EVENT {
        tracing::debug!("Ignoring unknown event {} from {connection_id}", message.event);
        return;
    }

    let Some(room) = room_name(&message.data) else {
        tracing::debug!("Ignoring {JOIN_PROJECT_ROOM_EVENT} without a room from {connection_id}");
        return;
    };

    if joined.contains_key(&room) {
        return;
    }

    let events = rooms.subscribe(&room).await;
    tracing::info!("Client {connection_id} joined room {room}");
    joined.insert(room, forward(events, tx.clone()));
}

/// Rooms are named by strings; numeric ids are accepted and stringified.
fn room_name(data: &serde_json::Value) -> Option<String> {
    match data {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn forward(
    mut events: broadcast::Receiver<RoomEvent>,
    tx: mpsc::Sender<RoomEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Room subscriber lagged, missed {missed} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn room_names_come_from_strings_and_numbers() {
        assert_eq!(room_name(&json!("p1")), Some("p1".to_string()));
        assert_eq!(room_name(&json!(42)), Some("42".to_string()));
        assert_eq!(room_name(&json!("")), None);
        assert_eq!(room_name(&json!(null)), None);
        assert_eq!(room_name(&json!({ "projectId": "p1" })), None);
    }

    #[tokio::test]
    async fn joining_twice_keeps_one_membership() {
        let rooms = RoomBroadcaster::new();
        let (tx, _rx) = mpsc::channel(SEND_BUFFER);
        let mut joined = HashMap::new();
        let frame = r#"{"event": "joinProjectRoom", "data": "p1"}"#;

        handle_client_message(Uuid::new_v4(), frame, &rooms, &tx, &mut joined).await;
        handle_client_message(Uuid::new_v4(), frame, &rooms, &tx, &mut joined).await;

        assert_eq!(joined.len(), 1);
        assert_eq!(rooms.subscriber_count("p1").await, 1);
    }

    #[tokio::test]
    async fn unknown_and_malformed_frames_are_ignored() {
        let rooms = RoomBroadcaster::new();
        let (tx, _rx) = mpsc::channel(SEND_BUFFER);
        let mut joined = HashMap::new();

        handle_client_message(Uuid::new_v4(), "not json", &rooms, &tx, &mut joined).await;
        handle_client_message(
            Uuid::new_v4(),
            r#"{"event": "leaveProjectRoom", "data": "p1"}"#,
            &rooms,
            &tx,
            &mut joined,
        )
        .await;

        assert!(joined.is_empty());
        assert_eq!(rooms.room_count().await, 0);
    }

    #[tokio::test]
    async fn joined_room_events_reach_the_connection() {
        let rooms = RoomBroadcaster::new();
        let (tx, mut rx) = mpsc::channel(SEND_BUFFER);
        let mut joined = HashMap::new();

        handle_client_message(
            Uuid::new_v4(),
            r#"{"event": "joinProjectRoom", "data": "p1"}"#,
            &rooms,
            &tx,
            &mut joined,
        )
        .await;

        rooms
            .publish("p1", RoomEvent::new("collaborationRequest", json!([])))
            .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event, "collaborationRequest");
    }
}
