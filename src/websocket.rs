// src/websocket.rs

//! Per-connection protocol coordinator.
//!
//! A connection moves Connecting → Authenticating → Active → Disconnected.
//! Authentication failure closes the socket before anything is registered.
//! On entering Active the connection is registered in the presence
//! directory, receives the online-users snapshot, and subscribes its
//! fan-out handler; afterwards it serves operations from its read loop one
//! at a time until the socket goes away, when cleanup runs unconditionally.

use std::collections::HashSet;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Extension;
use futures_util::sink::SinkExt;
use futures_util::stream::{SplitSink, SplitStream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::auth::{self, SessionContext};
use crate::bus::SubscriptionId;
use crate::error::ChatError;
use crate::models::{
    ChatId, ClientEvent, DeliveryEvent, Message, MessageId, PresenceState, ServerEvent, Status,
    UserId,
};
use crate::state::{AppState, ConnectionHandle};

/// Upgrade handler for the WebSocket route.
///
/// The session context is whatever the HTTP session layer attached to the
/// request; with test login enabled, an `x-test-user` header feeds the
/// test resolver.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut ctx = session;
    if state.test_login && ctx.test_user.is_none() {
        ctx.test_user = headers
            .get("x-test-user")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state, ctx))
}

/// Manages the lifecycle of one connection.
async fn handle_socket(socket: WebSocket, state: AppState, ctx: SessionContext) {
    let (mut sink, receiver) = socket.split();

    let user_id = match auth::authenticate(&ctx) {
        Ok(user_id) => user_id,
        Err(err) => {
            info!("rejecting unauthenticated socket");
            send_raw(&mut sink, &error_event(&err)).await;
            let _ = sink.close().await;
            return;
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let conn = ConnectionHandle::new(user_id, tx);
    info!(user = %user_id, conn = %conn.id, "socket authenticated");

    // Writer task: drains the outbound queue into the socket.
    let mut write_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !send_raw(&mut sink, &event).await {
                break;
            }
        }
    });

    let subscription = attach(&state, &conn).await;

    let mut read_task = tokio::spawn(read_from_client(receiver, state.clone(), conn.clone()));

    // Either side ending means the connection is done.
    tokio::select! {
        _ = &mut read_task => write_task.abort(),
        _ = &mut write_task => read_task.abort(),
    }

    disconnect(&state, &conn, subscription).await;
}

/// Post-authentication attach sequence: presence registration (which
/// broadcasts the online notice), the online-users snapshot for the new
/// client, then the fan-out subscription.
async fn attach(state: &AppState, conn: &ConnectionHandle) -> SubscriptionId {
    state.presence.register(conn.clone()).await;
    conn.push(ServerEvent::OnlineUsers { users: state.presence.list_online().await });

    let subscriber = conn.clone();
    state
        .bus
        .subscribe(move |event: &DeliveryEvent| {
            // Never echo a sender's own message back at them.
            if event.message.author == subscriber.user_id {
                return;
            }
            subscriber.push(ServerEvent::NewMessage {
                chat_id: event.chat_id,
                message: event.message.clone(),
            });
        })
        .await
}

/// Cleanup, in a fixed order: room membership, presence (which broadcasts
/// the offline notice), then the bus subscription. Runs on any socket
/// termination, in-flight operations notwithstanding.
async fn disconnect(state: &AppState, conn: &ConnectionHandle, subscription: SubscriptionId) {
    state.rooms.leave(conn.id).await;
    state.presence.deregister(conn.user_id, conn.id).await;
    state.bus.unsubscribe(subscription).await;
    info!(user = %conn.user_id, conn = %conn.id, "socket disconnected");
}

/// Reads frames from the client and serves them sequentially, so a
/// suspended operation can never race a second one from the same
/// connection.
async fn read_from_client(
    mut receiver: SplitStream<WebSocket>,
    state: AppState,
    conn: ConnectionHandle,
) {
    while let Some(Ok(frame)) = receiver.next().await {
        let WsMessage::Text(text) = frame else {
            continue;
        };
        state.presence.touch(conn.user_id).await;
        match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => dispatch(&state, &conn, event).await,
            Err(err) => {
                debug!(user = %conn.user_id, %err, "unparseable client event");
                conn.push(error_event(&ChatError::InvalidInput("Malformed event")));
            }
        }
    }
}

/// Routes one client event to its operation. Every operation answers with
/// exactly one terminal event; failures are translated here, never allowed
/// to tear down the connection.
async fn dispatch(state: &AppState, conn: &ConnectionHandle, event: ClientEvent) {
    match event {
        ClientEvent::GetHistory { receiver } => match get_history(state, conn, &receiver).await {
            Ok(history) => conn.push(ServerEvent::ChatHistory {
                status: Status::Ok,
                data: Some(history),
                error: None,
            }),
            Err(err) => {
                report("getHistory", &err);
                // History failures answer on the event the client listens
                // on, not the generic error channel.
                conn.push(ServerEvent::ChatHistory {
                    status: Status::Error,
                    data: None,
                    error: Some(err.to_string()),
                });
            }
        },
        ClientEvent::SendMessage { receiver, text } => {
            match send_message(state, conn, &receiver, &text).await {
                Ok(()) => conn.push(ServerEvent::SendMessage { status: Status::Ok }),
                Err(err) => {
                    report("sendMessage", &err);
                    conn.push(error_event(&err));
                }
            }
        }
        ClientEvent::MarkAsRead { chat_id, message_id } => {
            match mark_as_read(state, conn, &chat_id, &message_id).await {
                Ok(()) => conn.push(ServerEvent::MarkAsRead { status: Status::Ok }),
                Err(err) => {
                    report("markAsRead", &err);
                    conn.push(error_event(&err));
                }
            }
        }
        ClientEvent::GetUserStatus { user_id } => {
            let online = match user_id.parse::<UserId>() {
                Ok(target) => state.presence.is_online(target).await,
                // An identity that cannot exist is simply offline.
                Err(_) => false,
            };
            conn.push(ServerEvent::UserStatus {
                user_id,
                status: if online { PresenceState::Online } else { PresenceState::Offline },
            });
        }
    }
}

/// Fetches the chat history with `receiver`, stamping everything the
/// caller had not yet read and pushing a read receipt to each stamped
/// message's author. Returns the post-stamp sequence.
async fn get_history(
    state: &AppState,
    conn: &ConnectionHandle,
    receiver: &str,
) -> Result<Vec<Message>, ChatError> {
    let receiver_id: UserId = receiver.parse().map_err(|_| ChatError::RecipientNotFound)?;
    state
        .store
        .find_user(receiver_id)
        .await?
        .ok_or(ChatError::RecipientNotFound)?;

    // No chat yet is a valid outcome: empty history, no room to join.
    let Some(chat_id) = state.store.find_chat(conn.user_id, receiver_id).await? else {
        return Ok(Vec::new());
    };

    let before = state.store.messages(chat_id).await?;
    let newly_read: HashSet<MessageId> = before
        .iter()
        .filter(|m| m.author != conn.user_id && m.read_by(conn.user_id).is_none())
        .map(|m| m.id)
        .collect();

    let stamped = state.store.stamp_all_unread(chat_id, conn.user_id).await?;
    state.rooms.join(chat_id, conn.clone()).await;

    let history = state.store.messages(chat_id).await?;
    if stamped > 0 {
        notify_read(state, chat_id, conn.user_id, &history, &newly_read).await;
    }
    Ok(history)
}

/// Pushes a read receipt for every message that just flipped to read,
/// targeting only the connections in the chat's room that belong to that
/// message's author.
async fn notify_read(
    state: &AppState,
    chat_id: ChatId,
    reader: UserId,
    history: &[Message],
    newly_read: &HashSet<MessageId>,
) {
    let members = state.rooms.members_of(chat_id).await;
    for message in history.iter().filter(|m| newly_read.contains(&m.id)) {
        let Some(read_at) = message.read_by(reader) else {
            continue;
        };
        let event = ServerEvent::MessageRead {
            chat_id,
            message_id: message.id,
            read_at,
            reader_id: reader,
        };
        for member in members.iter().filter(|member| member.user_id == message.author) {
            member.push(event.clone());
        }
    }
}

/// Appends a message to the (lazily created) chat with the receiver, joins
/// the sender to its room, and publishes one delivery event. The sender's
/// own fan-out handler suppresses the echo.
async fn send_message(
    state: &AppState,
    conn: &ConnectionHandle,
    receiver: &str,
    text: &str,
) -> Result<(), ChatError> {
    if receiver.is_empty() || text.is_empty() {
        return Err(ChatError::InvalidInput("Missing receiver or text"));
    }
    let receiver_id: UserId = receiver.parse().map_err(|_| ChatError::RecipientNotFound)?;
    state
        .store
        .find_user(receiver_id)
        .await?
        .ok_or(ChatError::RecipientNotFound)?;

    let (chat_id, message) = state.store.append_message(conn.user_id, receiver_id, text).await?;
    state.rooms.join(chat_id, conn.clone()).await;
    state
        .bus
        .publish(&DeliveryEvent { chat_id, message, participants: chat_id.participants() })
        .await;
    Ok(())
}

/// Stamps the caller's read timestamp on one message. Re-marking is a
/// no-op ack; no read receipt is emitted for a direct mark, only the bulk
/// stamp in history retrieval notifies authors.
async fn mark_as_read(
    state: &AppState,
    conn: &ConnectionHandle,
    chat_id: &str,
    message_id: &str,
) -> Result<(), ChatError> {
    if chat_id.is_empty() || message_id.is_empty() {
        return Err(ChatError::InvalidInput("Missing chatId or messageId"));
    }
    let chat_id: ChatId = chat_id.parse().map_err(|_| ChatError::NotFoundOrForbidden)?;
    let message_id: MessageId = message_id.parse().map_err(|_| ChatError::NotFoundOrForbidden)?;

    state
        .store
        .stamp_read(chat_id, message_id, conn.user_id)
        .await?
        .ok_or(ChatError::NotFoundOrForbidden)?;
    Ok(())
}

fn error_event(err: &ChatError) -> ServerEvent {
    ServerEvent::Error { error: err.to_string(), status: Status::Error }
}

fn report(op: &'static str, err: &ChatError) {
    match err.detail() {
        Some(detail) => error!(op, detail, "operation failed"),
        None => debug!(op, %err, "operation rejected"),
    }
}

async fn send_raw(sink: &mut SplitSink<WebSocket, WsMessage>, event: &ServerEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(text) => sink.send(WsMessage::Text(text.into())).await.is_ok(),
        Err(err) => {
            error!(%err, "failed to encode outbound event");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use crate::storage::MemoryStore;
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;
    use uuid::Uuid;

    async fn state_with_users() -> (AppState, UserId, UserId) {
        let store = MemoryStore::new();
        let ann = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.add_user(UserProfile { id: ann, name: "ann".to_string() }).await;
        store.add_user(UserProfile { id: bob, name: "bob".to_string() }).await;
        (AppState::new(Arc::new(store)), ann, bob)
    }

    async fn connect(
        state: &AppState,
        user: UserId,
    ) -> (ConnectionHandle, UnboundedReceiver<ServerEvent>, SubscriptionId) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = ConnectionHandle::new(user, tx);
        let subscription = attach(state, &conn).await;
        (conn, rx, subscription)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn connecting_announces_presence_and_snapshots_online() {
        let (state, ann, bob) = state_with_users().await;

        let (_ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        let events = drain(&mut ann_rx);
        assert_eq!(
            events[0],
            ServerEvent::UserStatus {
                user_id: ann.to_string(),
                status: PresenceState::Online,
            }
        );
        assert!(matches!(&events[1], ServerEvent::OnlineUsers { users } if users == &vec![ann]));

        let (_bob_conn, mut bob_rx, _) = connect(&state, bob).await;
        // The earlier connection sees the newcomer...
        assert_eq!(
            drain(&mut ann_rx),
            vec![ServerEvent::UserStatus {
                user_id: bob.to_string(),
                status: PresenceState::Online,
            }]
        );
        // ...and the newcomer's snapshot holds both.
        let events = drain(&mut bob_rx);
        match &events[1] {
            ServerEvent::OnlineUsers { users } => {
                assert_eq!(users.len(), 2);
                assert!(users.contains(&ann) && users.contains(&bob));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_fans_out_to_peer_but_never_echoes() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        let (_bob_conn, mut bob_rx, _) = connect(&state, bob).await;
        drain(&mut ann_rx);
        drain(&mut bob_rx);

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage { receiver: bob.to_string(), text: "hi".to_string() },
        )
        .await;

        // The author gets the ack and nothing else.
        assert_eq!(drain(&mut ann_rx), vec![ServerEvent::SendMessage { status: Status::Ok }]);

        let events = drain(&mut bob_rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ServerEvent::NewMessage { chat_id, message } => {
                assert_eq!(*chat_id, ChatId::of(ann, bob));
                assert_eq!(message.author, ann);
                assert_eq!(message.text, "hi");
                assert!(message.read_status.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_rejects_bad_input_and_unknown_recipients() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        drain(&mut ann_rx);

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage { receiver: bob.to_string(), text: String::new() },
        )
        .await;
        assert_eq!(
            drain(&mut ann_rx),
            vec![ServerEvent::Error {
                error: "Missing receiver or text".to_string(),
                status: Status::Error,
            }]
        );

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage {
                receiver: Uuid::new_v4().to_string(),
                text: "hello?".to_string(),
            },
        )
        .await;
        assert_eq!(
            drain(&mut ann_rx),
            vec![ServerEvent::Error {
                error: "Recipient not found".to_string(),
                status: Status::Error,
            }]
        );
    }

    #[tokio::test]
    async fn history_stamps_reads_and_receipts_the_author() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        let (bob_conn, mut bob_rx, _) = connect(&state, bob).await;

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage { receiver: bob.to_string(), text: "hi".to_string() },
        )
        .await;
        drain(&mut ann_rx);
        drain(&mut bob_rx);

        dispatch(&state, &bob_conn, ClientEvent::GetHistory { receiver: ann.to_string() }).await;

        let bob_events = drain(&mut bob_rx);
        assert_eq!(bob_events.len(), 1);
        let message_id = match &bob_events[0] {
            ServerEvent::ChatHistory { status: Status::Ok, data: Some(data), error: None } => {
                assert_eq!(data.len(), 1);
                assert!(data[0].read_by(bob).is_some());
                data[0].id
            }
            other => panic!("unexpected event: {other:?}"),
        };

        // The author's live connection gets exactly one receipt.
        let ann_events = drain(&mut ann_rx);
        assert_eq!(ann_events.len(), 1);
        match &ann_events[0] {
            ServerEvent::MessageRead { chat_id, message_id: read_id, reader_id, .. } => {
                assert_eq!(*chat_id, ChatId::of(ann, bob));
                assert_eq!(*read_id, message_id);
                assert_eq!(*reader_id, bob);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn history_is_idempotent() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        let (bob_conn, mut bob_rx, _) = connect(&state, bob).await;

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage { receiver: bob.to_string(), text: "hi".to_string() },
        )
        .await;
        dispatch(&state, &bob_conn, ClientEvent::GetHistory { receiver: ann.to_string() }).await;
        let first: Vec<ServerEvent> = drain(&mut bob_rx)
            .into_iter()
            .filter(|e| matches!(e, ServerEvent::ChatHistory { .. }))
            .collect();
        drain(&mut ann_rx);

        dispatch(&state, &bob_conn, ClientEvent::GetHistory { receiver: ann.to_string() }).await;
        let second: Vec<ServerEvent> = drain(&mut bob_rx)
            .into_iter()
            .filter(|e| matches!(e, ServerEvent::ChatHistory { .. }))
            .collect();

        // Identical sequences, and no further receipts for the author.
        assert_eq!(first, second);
        assert!(drain(&mut ann_rx).is_empty());
    }

    #[tokio::test]
    async fn history_without_chat_is_empty_and_joins_nothing() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        drain(&mut ann_rx);

        dispatch(&state, &ann_conn, ClientEvent::GetHistory { receiver: bob.to_string() }).await;
        assert_eq!(
            drain(&mut ann_rx),
            vec![ServerEvent::ChatHistory {
                status: Status::Ok,
                data: Some(Vec::new()),
                error: None,
            }]
        );
        assert!(state.rooms.members_of(ChatId::of(ann, bob)).await.is_empty());
    }

    #[tokio::test]
    async fn history_reports_unknown_recipients_on_its_own_event() {
        let (state, ann, _) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        drain(&mut ann_rx);

        for receiver in [Uuid::new_v4().to_string(), "not-an-id".to_string()] {
            dispatch(&state, &ann_conn, ClientEvent::GetHistory { receiver }).await;
            assert_eq!(
                drain(&mut ann_rx),
                vec![ServerEvent::ChatHistory {
                    status: Status::Error,
                    data: None,
                    error: Some("Recipient not found".to_string()),
                }]
            );
        }
    }

    #[tokio::test]
    async fn mark_read_forbids_own_messages_and_is_idempotent() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        let (bob_conn, mut bob_rx, _) = connect(&state, bob).await;

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage { receiver: bob.to_string(), text: "hi".to_string() },
        )
        .await;
        drain(&mut ann_rx);
        let chat_id = ChatId::of(ann, bob);
        let message_id = state.store.messages(chat_id).await.unwrap()[0].id;
        drain(&mut bob_rx);

        // The author cannot mark their own message.
        dispatch(
            &state,
            &ann_conn,
            ClientEvent::MarkAsRead {
                chat_id: chat_id.to_string(),
                message_id: message_id.to_string(),
            },
        )
        .await;
        assert_eq!(
            drain(&mut ann_rx),
            vec![ServerEvent::Error {
                error: "Message not found or you are not a participant".to_string(),
                status: Status::Error,
            }]
        );
        assert!(state.store.messages(chat_id).await.unwrap()[0].read_status.is_empty());

        // The recipient can, and re-marking is an ack-level no-op with no
        // receipt pushed to anyone.
        for _ in 0..2 {
            dispatch(
                &state,
                &bob_conn,
                ClientEvent::MarkAsRead {
                    chat_id: chat_id.to_string(),
                    message_id: message_id.to_string(),
                },
            )
            .await;
            assert_eq!(drain(&mut bob_rx), vec![ServerEvent::MarkAsRead { status: Status::Ok }]);
        }
        assert!(drain(&mut ann_rx).is_empty());

        // Missing fields are an input error, not a not-found.
        dispatch(
            &state,
            &bob_conn,
            ClientEvent::MarkAsRead { chat_id: String::new(), message_id: String::new() },
        )
        .await;
        assert_eq!(
            drain(&mut bob_rx),
            vec![ServerEvent::Error {
                error: "Missing chatId or messageId".to_string(),
                status: Status::Error,
            }]
        );
    }

    #[tokio::test]
    async fn presence_queries_never_error() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        let (_bob_conn, _bob_rx, _) = connect(&state, bob).await;
        drain(&mut ann_rx);

        for (target, expected) in [
            (bob.to_string(), PresenceState::Online),
            (Uuid::new_v4().to_string(), PresenceState::Offline),
            ("garbage".to_string(), PresenceState::Offline),
        ] {
            dispatch(&state, &ann_conn, ClientEvent::GetUserStatus { user_id: target.clone() })
                .await;
            assert_eq!(
                drain(&mut ann_rx),
                vec![ServerEvent::UserStatus { user_id: target, status: expected }]
            );
        }
    }

    #[tokio::test]
    async fn disconnect_scrubs_presence_rooms_and_subscription() {
        let (state, ann, bob) = state_with_users().await;
        let (ann_conn, mut ann_rx, ann_sub) = connect(&state, ann).await;
        let (bob_conn, mut bob_rx, _) = connect(&state, bob).await;

        dispatch(
            &state,
            &ann_conn,
            ClientEvent::SendMessage { receiver: bob.to_string(), text: "hi".to_string() },
        )
        .await;
        drain(&mut ann_rx);
        drain(&mut bob_rx);

        disconnect(&state, &ann_conn, ann_sub).await;

        // The survivor sees the offline broadcast.
        assert_eq!(
            drain(&mut bob_rx),
            vec![ServerEvent::UserStatus {
                user_id: ann.to_string(),
                status: PresenceState::Offline,
            }]
        );
        assert!(!state.presence.is_online(ann).await);
        assert!(state.rooms.members_of(ChatId::of(ann, bob)).await.is_empty());

        // A later send must not reach the departed subscription.
        dispatch(
            &state,
            &bob_conn,
            ClientEvent::SendMessage { receiver: ann.to_string(), text: "still there?".to_string() },
        )
        .await;
        assert!(drain(&mut ann_rx).is_empty());

        // And the directory now reports them offline to anyone who asks.
        dispatch(&state, &bob_conn, ClientEvent::GetUserStatus { user_id: ann.to_string() }).await;
        let events = drain(&mut bob_rx);
        assert!(events.contains(&ServerEvent::UserStatus {
            user_id: ann.to_string(),
            status: PresenceState::Offline,
        }));
    }

    #[tokio::test]
    async fn malformed_frames_get_an_error_event() {
        let (state, ann, _) = state_with_users().await;
        let (ann_conn, mut ann_rx, _) = connect(&state, ann).await;
        drain(&mut ann_rx);

        // Mirrors the read loop's handling of an unparseable frame.
        let parsed = serde_json::from_str::<ClientEvent>("{\"type\":\"unknown\"}");
        assert!(parsed.is_err());
        ann_conn.push(error_event(&ChatError::InvalidInput("Malformed event")));
        assert_eq!(
            drain(&mut ann_rx),
            vec![ServerEvent::Error {
                error: "Malformed event".to_string(),
                status: Status::Error,
            }]
        );
    }
}
