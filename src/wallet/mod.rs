//! Wallet RPC clients
//!
//! Two narrow HTTP clients against the local grin wallet: the owner API
//! (authenticated, drives the sender side) and the foreign API
//! (unauthenticated, countersigns incoming slates). Both share the same
//! response contract. A 200 with a body parses as JSON; a 200 without one is
//! a bare success marker; anything else is a wallet error carrying the raw
//! response text.

pub mod foreign;
pub mod owner;

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::{Error, Result};

pub use foreign::ForeignApi;
pub use owner::OwnerApi;

/// Issue a prepared request and apply the shared response contract.
/// `hint` names the command that starts the missing listener; it is folded
/// into the connection error so the remedy reaches the user.
pub(crate) async fn execute(request: RequestBuilder, url: &Url, hint: &str) -> Result<Value> {
    let response = request.send().await.map_err(|e| {
        if e.is_connect() {
            Error::Connection(format!(
                "Unable to connect to {url}, make sure there is {hint}"
            ))
        } else {
            Error::Network(e)
        }
    })?;

    let status = response.status();
    let text = response.text().await?;
    if status == StatusCode::OK {
        if text.is_empty() {
            Ok(Value::Bool(true))
        } else {
            serde_json::from_str(&text)
                .map_err(|_| Error::Wallet(format!("malformed response: {text}")))
        }
    } else {
        Err(Error::Wallet(text))
    }
}
