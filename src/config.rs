//! Defaults and credential loading
//!
//! Everything here mirrors the stock grin wallet setup: owner API on
//! `127.0.0.1:13420` behind basic auth, foreign API on `127.0.0.1:13415`
//! without auth, and the API secret written by the wallet to
//! `~/.grin/.api_secret`.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::{Error, Result};

/// Default host:port values for the local wallet listeners.
pub mod hosts {
    pub const OWNER: &str = "127.0.0.1:13420";
    pub const FOREIGN: &str = "127.0.0.1:13415";
}

/// Default basic-auth username for the owner API.
pub const OWNER_API_USERNAME: &str = "grin";

/// Seconds before an unanswered outgoing slate is rolled back; also the
/// exploding lifetime of the chat message carrying it.
pub const DEFAULT_SEND_TTL_SECS: u64 = 60;

/// Fixed window the receive command waits for an incoming slate.
pub const RECEIVE_WAIT_SECS: u64 = 300;

pub const DEFAULT_CONFIRMATIONS: u64 = 5;
pub const DEFAULT_MAX_OUTPUTS: u32 = 2;

fn default_secret_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".grin").join(".api_secret"))
}

/// Load the owner API secret from `path`, or from `~/.grin/.api_secret`
/// when no path is given. The file contents are used as-is.
pub fn read_api_secret(path: Option<&Path>) -> Result<SecretString> {
    let secret_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_secret_path()
            .ok_or_else(|| Error::User("Could not determine home directory".to_string()))?,
    };
    if !secret_path.is_file() {
        return Err(Error::User(format!(
            "File not found: {}",
            secret_path.display()
        )));
    }
    let secret = std::fs::read_to_string(&secret_path)
        .map_err(|e| Error::User(format!("Could not read {}: {e}", secret_path.display())))?;
    Ok(SecretString::from(secret))
}
