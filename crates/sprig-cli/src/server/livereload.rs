// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Dev push channel over WebSocket.

use axum::extract::ws::{Message, WebSocket};
use tokio::sync::broadcast;
use tracing::debug;

/// Text frame telling the browser to reload.
pub const REFRESH_MESSAGE: &str = "refresh";

/// Forwards refresh notifications to one connected browser until either
/// side goes away. Dropping `rx` on exit removes the connection from the hub.
pub async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<()>) {
    debug!("Dev client connected");
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(()) => {
                        if socket.send(Message::Text(REFRESH_MESSAGE.to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    // Missed notifications collapse into the next one.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    debug!("Dev client disconnected");
}
