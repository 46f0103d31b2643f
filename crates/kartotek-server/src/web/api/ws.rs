use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;
use uuid::Uuid;

/// GET /ws -- WebSocket upgrade for the client event relay
pub async fn relay_socket(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_relay(socket, state))
}

async fn handle_relay(mut socket: WebSocket, state: Arc<AppState>) {
    let client_id = Uuid::new_v4();
    let mut rx = state.relay.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        // Events go to every client except their publisher
                        if event.origin == client_id {
                            continue;
                        }
                        if socket.send(Message::Text(event.payload.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Relay subscriber {} lagged by {} events", client_id, n);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(payload))) => {
                        state.relay.publish(client_id, payload.to_string());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {} // ignore pings/pongs/binary frames
                }
            }
        }
    }
}
