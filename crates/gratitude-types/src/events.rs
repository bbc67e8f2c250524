use serde::{Deserialize, Serialize};

use crate::api::WallView;

/// Events sent over the WebSocket gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// Full replacement view, projected for the receiving connection.
    Snapshot(WallView),

    /// The store could not be read; the last snapshot stays authoritative.
    SnapshotError { message: String },
}
