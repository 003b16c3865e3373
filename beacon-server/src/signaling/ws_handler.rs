use crate::signaling::SignalingService;
use crate::transport::ConnectionHandle;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (handle, mut rx) = ConnectionHandle::channel();
    let mut connection = service.connect(handle);

    info!(connection = %connection.id(), "New WebSocket connection");

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut send_task => break,

            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    connection.handle_text(&text).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    warn!(connection = %connection.id(), "WebSocket receive error: {}", e);
                    break;
                }
                Some(Ok(Message::Binary(data))) => {
                    warn!(connection = %connection.id(), len = data.len(), "Ignoring binary frame");
                }
                Some(Ok(_)) => {}
            },
        }
    }

    send_task.abort();
    connection.close().await;
    info!(connection = %connection.id(), "WebSocket disconnected");
}
