use crate::api::state::{AppState, MessageStructure};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{sink::SinkExt, stream::StreamExt};
use yrs::{ReadTxn, Transact, Update, updates::decoder::Decode};

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new().route("/ws", get(ws_handler))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before snapshotting so no update falls between the two.
    let mut rx = state.editor_broadcast_tx.subscribe();

    // 1. ON CONNECT: send the full document state
    let full_state = full_state(&state);
    if sender
        .send(Message::Binary(full_state.into()))
        .await
        .is_err()
    {
        return;
    }

    // 2. Forward server broadcasts
    let mut send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            let ws_msg = match msg {
                MessageStructure::YjsUpdate(data) => Message::Binary(data.into()),
                MessageStructure::Event(json) => Message::Text(json.into()),
            };

            if let Err(e) = sender.send(ws_msg).await {
                tracing::debug!("websocket send failed: {:?}", e);
                break;
            }
        }
    });

    // 3. Apply client edits to the server doc
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Binary(data) = msg {
                apply_client_update(&state_clone, &data);
            }
        }
    });

    // Keep connection alive until one side closes
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
}

pub(crate) fn full_state(state: &AppState) -> Vec<u8> {
    let editor = state.editor();
    let txn = editor.doc().transact();
    txn.encode_state_as_update_v1(&yrs::StateVector::default())
}

/// Takes the editor lock, so remote edits never interleave with a highlight pass.
pub(crate) fn apply_client_update(state: &AppState, data: &[u8]) {
    let update = match Update::decode_v1(data) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!("Failed to decode update: {:?}", e);
            return;
        }
    };
    let editor = state.editor();
    let mut txn = editor.doc().transact_mut();
    if let Err(e) = txn.apply_update(update) {
        tracing::warn!("Failed to apply update: {:?}", e);
    }
}
