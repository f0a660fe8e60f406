//! Grin payments over ephemeral chat
//!
//! Coordinates the two-party grin transaction handshake out-of-band:
//! - The sender asks the local wallet owner API for a slate, ships it to the
//!   counterparty as an exploding chat message, polls for the signed reply,
//!   then finalizes and broadcasts, rolling the transaction back on timeout
//!   or any failure along the way.
//! - The receiver polls for an incoming slate, countersigns it via the local
//!   wallet foreign API and replies on the same channel.
//!
//! Wallet cryptography and chain validation stay in the wallet; the chat
//! protocol stays in the backend. This crate is the glue and the state
//! machine between them.

pub mod amount;
pub mod config;
pub mod handshake;
pub mod slate;
pub mod transport;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use error::{Error, Result};
pub use handshake::{ReceiveOutcome, SendOptions, SendOutcome};
pub use slate::{Message, Slate};
pub use transport::{Backend, Lifetime, MessageTransport};
pub use wallet::{ForeignApi, OwnerApi};
