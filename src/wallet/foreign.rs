//! Foreign API client: countersigns incoming slates on the receiver side.

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::slate::Slate;
use crate::{Error, Result};

const CONNECT_HINT: &str = "a wallet listening (try: grin wallet listen)";

pub struct ForeignApi {
    base: Url,
    client: Client,
}

impl ForeignApi {
    pub fn new(host: &str) -> Result<Self> {
        let base = Url::parse(&format!("http://{host}/v1/wallet/foreign/"))
            .map_err(|e| Error::User(format!("Invalid foreign api host {host}: {e}")))?;
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let url = self
            .base
            .join(endpoint)
            .map_err(|e| Error::User(format!("Invalid endpoint {endpoint}: {e}")))?;
        let mut request = self.client.request(method, url.clone());
        if let Some(payload) = body {
            request = request.json(payload);
        }
        super::execute(request, &url, CONNECT_HINT).await
    }

    /// Have the wallet add its participant data to the incoming slate.
    pub async fn receive_tx(&self, slate: &Slate) -> Result<Slate> {
        info!(slate_id = %slate.id, "Signing transaction");
        let payload = serde_json::to_value(slate)?;
        let response = self
            .request(Method::POST, "receive_tx", Some(&payload))
            .await?;
        serde_json::from_value(response)
            .map_err(|_| Error::Wallet("wallet returned an invalid slate".to_string()))
    }
}
