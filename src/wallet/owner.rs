//! Owner API client: the sender side of the wallet RPC.

use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use url::Url;

use crate::slate::Slate;
use crate::{Error, Result};

const CONNECT_HINT: &str = "an owner api listening (try: grin wallet owner_api)";

pub struct OwnerApi {
    base: Url,
    username: String,
    secret: SecretString,
    client: Client,
}

/// One row of `retrieve_txs`; only the correlation fields are modelled.
/// `tx_slate_id` is absent on coinbase entries.
#[derive(Debug, Deserialize)]
struct TxLogEntry {
    id: u32,
    tx_slate_id: Option<String>,
}

impl OwnerApi {
    pub fn new(host: &str, username: &str, secret: SecretString) -> Result<Self> {
        let base = Url::parse(&format!("http://{host}/v1/wallet/owner/"))
            .map_err(|e| Error::User(format!("Invalid owner api host {host}: {e}")))?;
        Ok(Self {
            base,
            username: username.to_string(),
            secret,
            client: Client::new(),
        })
    }

    async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let url = self
            .base
            .join(endpoint)
            .map_err(|e| Error::User(format!("Invalid endpoint {endpoint}: {e}")))?;
        let mut request = self
            .client
            .request(method, url.clone())
            .basic_auth(&self.username, Some(self.secret.expose_secret()));
        if let Some(payload) = body {
            request = request.json(payload);
        }
        super::execute(request, &url, CONNECT_HINT).await
    }

    /// Ask the wallet for a new send slate over `amount` nanogrins, using
    /// file-based exchange, one change output and the use-all-inputs
    /// selection strategy.
    pub async fn create_tx(
        &self,
        amount: u64,
        confirmations: u64,
        max_outputs: u32,
        fluff: bool,
    ) -> Result<Slate> {
        info!(amount, confirmations, "Creating new transaction");
        let payload = json!({
            "amount": amount,
            "minimum_confirmations": confirmations,
            "method": "file",
            "dest": "",
            "max_outputs": max_outputs,
            "num_change_outputs": 1,
            "selection_strategy_is_use_all": true,
            "fluff": fluff
        });
        let response = self
            .request(Method::POST, "issue_send_tx", Some(&payload))
            .await?;
        serde_json::from_value(response)
            .map_err(|_| Error::Wallet("wallet returned an invalid slate".to_string()))
    }

    /// Submit the counter-signed slate; returns the finalized transaction
    /// payload, ready for [`broadcast`](Self::broadcast).
    pub async fn finalize(&self, slate: &Slate) -> Result<Value> {
        info!(slate_id = %slate.id, "Finalizing transaction");
        let payload = serde_json::to_value(slate)?;
        self.request(Method::POST, "finalize_tx", Some(&payload))
            .await
    }

    /// Relay the finalized transaction to the network. `fluff` requests
    /// immediate broadcast, skipping the stem phase.
    pub async fn broadcast(&self, tx: &Value, fluff: bool) -> Result<()> {
        info!(fluff, "Broadcasting transaction");
        let endpoint = if fluff { "post_tx?fluff" } else { "post_tx" };
        self.request(Method::POST, endpoint, Some(tx)).await?;
        Ok(())
    }

    /// Cancel the transaction behind `slate_id`. The wallet addresses
    /// cancellation by its internal index, so that is resolved first.
    pub async fn rollback(&self, slate_id: &str) -> Result<()> {
        info!(slate_id, "Rolling back transaction");
        let index = self.find_tx_index(slate_id).await?;
        self.request(Method::POST, &format!("cancel_tx?id={index}"), None)
            .await?;
        Ok(())
    }

    /// Scan the wallet's transaction log for the entry whose `tx_slate_id`
    /// matches. No match is a hard wallet error, never retried.
    pub async fn find_tx_index(&self, slate_id: &str) -> Result<u32> {
        let response = self.request(Method::GET, "retrieve_txs", None).await?;
        let (_refreshed, txs): (bool, Vec<TxLogEntry>) = serde_json::from_value(response)
            .map_err(|_| Error::Wallet("malformed retrieve_txs response".to_string()))?;
        txs.into_iter()
            .find(|tx| tx.tx_slate_id.as_deref() == Some(slate_id))
            .map(|tx| tx.id)
            .ok_or_else(|| Error::Wallet(format!("Slate id {slate_id} not found")))
    }
}
