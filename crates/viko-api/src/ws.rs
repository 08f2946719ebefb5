use axum::extract::State;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use viko_types::frames::{ChatFrame, ServerFrame};

use crate::pipeline;
use crate::state::AppState;

pub async fn ws_chat(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Live chat socket: each inbound `{type:"message"}` frame runs the same
/// send pipeline as the REST endpoint; the reply is either the persisted
/// message or an error frame. A bad frame never tears the connection down.
///
/// Fan-out to the other participant's open clients is the data backend's
/// change-feed, not this socket.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    debug!("chat socket connected");

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                debug!("chat socket read error: {err}");
                break;
            }
        };

        let text = match frame {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            // Ping/pong are answered at the protocol layer.
            _ => continue,
        };

        let reply = process_frame(&state, &text).await;

        let json = match serde_json::to_string(&reply) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to encode socket reply: {err}");
                continue;
            }
        };

        if socket.send(WsMessage::Text(json.into())).await.is_err() {
            break;
        }
    }

    debug!("chat socket closed");
}

async fn process_frame(state: &AppState, text: &str) -> ServerFrame {
    let frame: ChatFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            debug!("unparseable chat frame: {err}");
            return ServerFrame::Error {
                error: "Failed to process message".to_string(),
            };
        }
    };

    let ChatFrame::Message(req) = frame;

    match pipeline::send_message(state, req).await {
        Ok(message) => ServerFrame::Message { data: message },
        Err(err) => {
            warn!("socket send failed: {err}");
            ServerFrame::Error {
                error: "Failed to process message".to_string(),
            }
        }
    }
}
