//! Chat transports for slate exchange
//!
//! A transport delivers short-lived ("exploding") text messages to a named
//! peer and reads the peer's unread messages back. The trait keeps the
//! handshake logic independent of the concrete backend:
//! - `Keybase` drives the keybase CLI as a subprocess
//! - an in-memory double backs the tests
//!
//! Slate waiting is plain fixed-interval polling; the backends offer no push
//! channel worth the extra machinery.

pub mod keybase;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::slate::{parse_slate, Message, Slate};
use crate::Result;

pub use keybase::Keybase;

/// Cadence of the poll loop.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Exploding lifetime of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifetime {
    /// Whole seconds, normalized to the backend's `<n>s` syntax.
    Seconds(u64),
    /// Raw duration-with-unit string, passed through verbatim.
    Custom(String),
}

impl Default for Lifetime {
    fn default() -> Self {
        Lifetime::Custom("1m".to_string())
    }
}

impl From<u64> for Lifetime {
    fn from(secs: u64) -> Self {
        Lifetime::Seconds(secs)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Seconds(secs) => write!(f, "{secs}s"),
            Lifetime::Custom(raw) => f.write_str(raw),
        }
    }
}

/// An out-of-band messaging channel between the two wallets.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Deliver `body` to `recipient`, expiring after `ttl`. Returns `false`
    /// when the backend refused the message (non-zero exit), `Err` when the
    /// backend could not be invoked at all.
    async fn send_message(&self, body: &str, recipient: &str, ttl: Lifetime) -> Result<bool>;

    /// Unread text messages on the peer's channel. The query peeks; nothing
    /// is marked read by reading.
    async fn receive_unread(&self, peer: &str) -> Result<Vec<Message>>;
}

/// Poll `peer`'s channel once per [`POLL_INTERVAL`] until a message body
/// validates as a slate or `window` elapses. Elapsed wall-clock time is
/// re-checked every iteration so slow transport calls shorten the wait
/// instead of extending it.
pub async fn poll_for_slate(
    transport: &dyn MessageTransport,
    peer: &str,
    window: Duration,
) -> Result<Option<Slate>> {
    info!(peer, backend = transport.name(), "Waiting for message");
    let start = Instant::now();
    while start.elapsed() < window {
        let messages = transport.receive_unread(peer).await?;
        debug!(peer, count = messages.len(), "Polled channel");
        for message in messages {
            if let Some(slate) = parse_slate(&message.body) {
                return Ok(Some(slate));
            }
        }
        sleep(POLL_INTERVAL).await;
    }
    Ok(None)
}

/// The closed set of supported backends, selected by name on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Keybase,
}

impl Backend {
    /// Construct the transport for this backend. Fails fast when the
    /// backend's executable is not installed.
    pub fn connect(self) -> Result<Box<dyn MessageTransport>> {
        match self {
            Backend::Keybase => Ok(Box::new(Keybase::new()?)),
        }
    }
}
