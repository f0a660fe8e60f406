//! Error types for the grin chat-payment CLI

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Local misconfiguration: missing executable, credential file, bad amount.
    #[error("{0}")]
    User(String),

    /// The wallet RPC was reachable but rejected or failed the request.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The chat backend failed to send/receive or returned malformed data.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The wallet RPC host was unreachable; the message carries the remedy.
    #[error("{0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_and_transport_errors_carry_context() {
        let err = Error::Wallet("no funds".to_string());
        assert_eq!(format!("{err}"), "Wallet error: no funds");
        let err = Error::Transport("bad response".to_string());
        assert_eq!(format!("{err}"), "Transport error: bad response");
    }
}
