use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use chrono::{DateTime, Local, TimeZone};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tracing::{info, trace, warn};

use gratitude_core::session::project;
use gratitude_types::events::GatewayEvent;

use crate::feed::{Snapshot, SnapshotFeed};

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Streams projected snapshots to one viewer until they disconnect.
///
/// The gate was checked at the HTTP upgrade, so `is_admin` decides whether
/// pending notes are ever sent down this socket.
pub async fn handle_connection(socket: WebSocket, feed: SnapshotFeed, is_admin: bool) {
    let (mut sender, mut receiver) = socket.split();
    let mut snapshots = feed.subscribe();

    info!("Viewer connected to gateway (admin={})", is_admin);

    // Initial snapshot so the client renders without waiting for a change
    let initial = snapshots.borrow_and_update().clone();
    if send_snapshot(&mut sender, &initial, is_admin).await.is_err() {
        return;
    }

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();

    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    if send_snapshot(&mut sender, &snapshot, is_admin).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The gateway is push-only; inbound frames only matter for liveness.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Pong(_) => {
                    pong_received.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                other => trace!("Ignoring inbound gateway frame: {:?}", other),
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Viewer disconnected from gateway (admin={})", is_admin);
}

/// What one viewer receives for a snapshot: the projected wall, or the
/// refresh error.
pub fn snapshot_event<Tz: TimeZone>(
    snapshot: &Snapshot,
    is_admin: bool,
    now: &DateTime<Tz>,
) -> GatewayEvent {
    match &snapshot.error {
        Some(message) => GatewayEvent::SnapshotError {
            message: message.clone(),
        },
        None => GatewayEvent::Snapshot(project(&snapshot.notes, is_admin, now)),
    }
}

async fn send_snapshot(
    sender: &mut SplitSink<WebSocket, Message>,
    snapshot: &Snapshot,
    is_admin: bool,
) -> Result<(), axum::Error> {
    let event = snapshot_event(snapshot, is_admin, &Local::now());

    let text = match serde_json::to_string(&event) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode gateway event: {}", e);
            return Ok(());
        }
    };

    sender.send(Message::Text(text.into())).await
}
