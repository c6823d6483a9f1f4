//! WebSocket handler for real-time signal streaming

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tracing::{debug, error, info};

use crate::api::state::ApiState;

/// WebSocket upgrade handler
///
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ApiState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Handle WebSocket connection
///
/// The first frame is the current snapshot as a `monitoring_update`, followed
/// by every signal published while the client stays connected.
async fn handle_websocket(socket: WebSocket, state: ApiState) {
    let mut subscription = match state.monitor.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            error!("cannot subscribe WebSocket client: {e}");
            return;
        }
    };

    info!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(signal) = subscription.recv().await {
            let text = match serde_json::to_string(&signal) {
                Ok(text) => text,
                Err(e) => {
                    error!("failed to serialize signal: {e}");
                    continue;
                }
            };

            if sender.send(Message::Text(text)).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
        subscription.unsubscribe();
    });

    // Inbound messages carry no commands; we only watch for the close
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    info!("WebSocket client disconnected");
}
