//! The send/receive handshake
//!
//! Send side: create a slate at the owner wallet, push it to the recipient
//! over the chat transport, wait for the countersigned reply, finalize and
//! broadcast. Once `create_tx` has succeeded the wallet holds locked
//! outputs, so every failure path before a successful broadcast cancels the
//! transaction, including a failed delivery of the initial message.
//!
//! Receive side: wait for an incoming slate, countersign it at the foreign
//! wallet, reply on the same channel. Timeouts are expected outcomes on both
//! sides, not errors.

use std::time::Duration;

use tracing::{info, warn};

use crate::slate::Slate;
use crate::transport::{poll_for_slate, Lifetime, MessageTransport};
use crate::wallet::{ForeignApi, OwnerApi};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Amount in nanogrins.
    pub amount: u64,
    pub recipient: String,
    /// Seconds the outgoing slate stays valid; doubles as the exploding
    /// lifetime of the message carrying it.
    pub ttl_secs: u64,
    pub confirmations: u64,
    pub max_outputs: u32,
    pub fluff: bool,
}

#[derive(Debug)]
pub enum SendOutcome {
    Broadcast { slate_id: String },
    TimedOut { slate_id: String },
}

#[derive(Debug)]
pub enum ReceiveOutcome {
    Signed { sender: String },
    TimedOut,
}

pub async fn send(
    owner: &OwnerApi,
    transport: &dyn MessageTransport,
    opts: &SendOptions,
) -> Result<SendOutcome> {
    let slate = owner
        .create_tx(opts.amount, opts.confirmations, opts.max_outputs, opts.fluff)
        .await?;
    let slate_id = slate.id.clone();

    let reply = match deliver_and_await_reply(transport, &slate, opts).await {
        Ok(reply) => reply,
        Err(e) => {
            owner.rollback(&slate_id).await?;
            return Err(e);
        }
    };

    let Some(reply) = reply else {
        warn!(%slate_id, ttl = opts.ttl_secs, "No reply before the ttl expired");
        owner.rollback(&slate_id).await?;
        return Ok(SendOutcome::TimedOut { slate_id });
    };

    info!(from = %opts.recipient, "Received reply");
    match finalize_and_broadcast(owner, &reply).await {
        Ok(()) => Ok(SendOutcome::Broadcast { slate_id }),
        Err(e) => {
            owner.rollback(&slate_id).await?;
            Err(e)
        }
    }
}

async fn deliver_and_await_reply(
    transport: &dyn MessageTransport,
    slate: &Slate,
    opts: &SendOptions,
) -> Result<Option<Slate>> {
    let body = serde_json::to_string(slate)?;
    let delivered = transport
        .send_message(&body, &opts.recipient, Lifetime::Seconds(opts.ttl_secs))
        .await?;
    if !delivered {
        return Err(Error::Transport(format!(
            "Could not deliver slate to {}",
            opts.recipient
        )));
    }
    poll_for_slate(transport, &opts.recipient, Duration::from_secs(opts.ttl_secs)).await
}

async fn finalize_and_broadcast(owner: &OwnerApi, reply: &Slate) -> Result<()> {
    let tx = owner.finalize(reply).await?;
    owner.broadcast(&tx, false).await
}

pub async fn receive(
    foreign: &ForeignApi,
    transport: &dyn MessageTransport,
    sender: &str,
    wait: Duration,
) -> Result<ReceiveOutcome> {
    let Some(slate) = poll_for_slate(transport, sender, wait).await? else {
        return Ok(ReceiveOutcome::TimedOut);
    };

    info!(sender, slate_id = %slate.id, "Received slate");
    let signed = foreign.receive_tx(&slate).await?;

    info!(sender, "Returning signed slate");
    let delivered = transport
        .send_message(&serde_json::to_string(&signed)?, sender, Lifetime::default())
        .await?;
    if !delivered {
        return Err(Error::Transport(format!(
            "Could not return the signed slate to {sender}"
        )));
    }
    Ok(ReceiveOutcome::Signed {
        sender: sender.to_string(),
    })
}
