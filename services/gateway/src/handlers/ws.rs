//! Market data WebSocket handler.
//!
//! Each connection registers a subscriber with the publisher and pumps its
//! outbound queue into the socket. The feed is broadcast-only: incoming
//! text frames are ignored. Pings go out on the configured heartbeat
//! interval; the subscriber is removed when the peer disconnects.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::debug;

pub async fn market_data_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (subscriber_id, mut frames) = state.publisher.subscribe();
    state.publisher.activate(subscriber_id);

    let (mut sink, mut stream) = socket.split();
    let mut heartbeat = tokio::time::interval(state.config.heartbeat_interval());
    heartbeat.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            _ = heartbeat.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(Message::Text(request))) => {
                        debug!(subscriber_id, request = request.as_str(), "ignoring market data request");
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.publisher.unsubscribe(subscriber_id);
}
