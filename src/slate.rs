//! Slate and chat message data model
//!
//! A slate is the transaction negotiation document the two wallets pass back
//! and forth. Beyond the three keys this tool needs for correlation and
//! structural validation the document is opaque, so everything else is kept
//! in a flattened map and round-trips untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transaction negotiation document exchanged between the two wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slate {
    pub num_participants: u64,
    /// Correlation key for the whole handshake.
    pub id: String,
    /// Transaction payload; consumed by the wallet, never interpreted here.
    pub tx: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A text message read from the chat transport. Ephemeral: the backend
/// expires it after its exploding lifetime.
#[derive(Debug, Clone)]
pub struct Message {
    pub sender: String,
    pub body: String,
    pub unread: bool,
    pub sent_at: DateTime<Utc>,
}

/// Parse `body` as a slate: a JSON object carrying all of
/// `num_participants`, `id` and `tx`. Anything else is not a slate.
pub fn parse_slate(body: &str) -> Option<Slate> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    if !["num_participants", "id", "tx"]
        .iter()
        .all(|key| object.contains_key(*key))
    {
        return None;
    }
    serde_json::from_value(value).ok()
}
