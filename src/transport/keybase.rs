//! Keybase chat backend
//!
//! Drives the `keybase` CLI: `keybase chat send` for exploding messages and
//! `keybase chat api` (JSON in, JSON out) for reading a channel. Messages
//! ride on the `dev` topic type so they stay out of the peer's normal chat.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::debug;

use super::{Lifetime, MessageTransport};
use crate::slate::Message;
use crate::{Error, Result};

const TOPIC_TYPE: &str = "dev";

pub struct Keybase {
    program: PathBuf,
}

impl Keybase {
    /// Resolve the keybase executable. Fails before any subprocess or
    /// network activity when it is not installed.
    pub fn new() -> Result<Self> {
        let program = which::which("keybase").map_err(|_| {
            Error::User(
                "Keybase executable not found. Make sure it is installed and in your PATH."
                    .to_string(),
            )
        })?;
        Ok(Self { program })
    }

    async fn api_call(&self, payload: &Value) -> Result<Value> {
        let output = Command::new(&self.program)
            .args(["chat", "api", "-m"])
            .arg(payload.to_string())
            .output()
            .await
            .map_err(|e| Error::Transport(format!("Failed to invoke keybase: {e}")))?;

        if !output.stderr.is_empty() {
            return Err(Error::Transport(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|_| Error::Transport("Bad response".to_string()))
    }
}

#[async_trait]
impl MessageTransport for Keybase {
    fn name(&self) -> &'static str {
        "keybase"
    }

    async fn send_message(&self, body: &str, recipient: &str, ttl: Lifetime) -> Result<bool> {
        let lifetime = ttl.to_string();
        debug!(recipient, %lifetime, "Sending exploding message");
        let output = Command::new(&self.program)
            .args(["chat", "send", "--exploding-lifetime", &lifetime])
            .args(["--topic-type", TOPIC_TYPE])
            .arg(recipient)
            .arg(body)
            .output()
            .await
            .map_err(|e| Error::Transport(format!("Failed to invoke keybase: {e}")))?;
        Ok(output.status.success())
    }

    async fn receive_unread(&self, peer: &str) -> Result<Vec<Message>> {
        let payload = json!({
            "method": "read",
            "params": {
                "options": {
                    "channel": {"name": peer, "topic_type": TOPIC_TYPE},
                    "unread_only": true,
                    "peek": true
                }
            }
        });
        let response = self.api_call(&payload).await?;
        let parsed: ReadResponse =
            serde_json::from_value(response).map_err(|_| Error::Transport("Bad response".to_string()))?;
        Ok(collect_unread_text(parsed))
    }
}

// Wire shape of `keybase chat api` read replies; only the fields consumed
// here are modelled.

#[derive(Debug, Deserialize)]
struct ReadResponse {
    result: ReadResult,
}

#[derive(Debug, Deserialize)]
struct ReadResult {
    #[serde(default)]
    messages: Vec<MessageEnvelope>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    msg: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    sender: WireSender,
    content: WireContent,
    #[serde(default)]
    unread: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    sent_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct WireSender {
    username: String,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<WireText>,
}

#[derive(Debug, Deserialize)]
struct WireText {
    body: String,
}

fn collect_unread_text(response: ReadResponse) -> Vec<Message> {
    response
        .result
        .messages
        .into_iter()
        .filter_map(|envelope| {
            let msg = envelope.msg;
            if msg.content.kind != "text" || !msg.unread {
                return None;
            }
            let text = msg.content.text?;
            Some(Message {
                sender: msg.sender.username,
                body: text.body,
                unread: msg.unread,
                sent_at: msg.sent_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_fixture() -> Value {
        json!({
            "result": {
                "messages": [
                    {"msg": {
                        "id": 7,
                        "sender": {"username": "bob"},
                        "content": {"type": "text", "text": {"body": "fresh"}},
                        "unread": true,
                        "sent_at": 1714000000
                    }},
                    {"msg": {
                        "id": 6,
                        "sender": {"username": "bob"},
                        "content": {"type": "text", "text": {"body": "stale"}},
                        "unread": false,
                        "sent_at": 1713999000
                    }},
                    {"msg": {
                        "id": 5,
                        "sender": {"username": "bob"},
                        "content": {"type": "attachment"},
                        "unread": true,
                        "sent_at": 1713998000
                    }}
                ],
                "ratelimits": [{"tank": "chat", "capacity": 7200}]
            }
        })
    }

    #[test]
    fn keeps_only_unread_text_messages() {
        let parsed: ReadResponse = serde_json::from_value(read_fixture()).unwrap();
        let messages = collect_unread_text(parsed);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, "bob");
        assert_eq!(messages[0].body, "fresh");
        assert!(messages[0].unread);
        assert_eq!(messages[0].sent_at.timestamp(), 1714000000);
    }

    #[test]
    fn empty_channel_yields_no_messages() {
        let parsed: ReadResponse =
            serde_json::from_value(json!({"result": {"messages": []}})).unwrap();
        assert!(collect_unread_text(parsed).is_empty());
    }

    #[test]
    fn unexpected_api_shape_is_rejected() {
        assert!(serde_json::from_value::<ReadResponse>(json!({"error": "not logged in"})).is_err());
        assert!(serde_json::from_slice::<Value>(b"keybase: not logged in").is_err());
    }
}
