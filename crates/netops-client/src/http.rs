//! Conditions authority over HTTP + JSON.

use std::collections::BTreeSet;

use netops_core::ConditionsAuthority;
use netops_shared::{AuthorityError, ConditionsDocument, OperatorId, ServerOperatorConditions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ConfigError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptBody<'a> {
    operator_ids: &'a BTreeSet<OperatorId>,
}

pub struct HttpAuthority {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthority {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.authority_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthorityError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.client.get(&url).send().await.map_err(transport)?;
        decode(resp).await
    }
}

impl ConditionsAuthority for HttpAuthority {
    async fn server_operators(&self) -> Result<ServerOperatorConditions, AuthorityError> {
        self.get("operators").await
    }

    async fn fetch_usage_conditions(&self) -> Result<ConditionsDocument, AuthorityError> {
        self.get("conditions").await
    }

    async fn accept_conditions(
        &self,
        conditions_id: i64,
        operator_ids: &BTreeSet<OperatorId>,
    ) -> Result<ServerOperatorConditions, AuthorityError> {
        let url = self.url(&format!("conditions/{conditions_id}/accept"));
        debug!(%url, ?operator_ids, "POST");
        let resp = self
            .client
            .post(&url)
            .json(&AcceptBody { operator_ids })
            .send()
            .await
            .map_err(transport)?;
        decode(resp).await
    }
}

fn transport(e: reqwest::Error) -> AuthorityError {
    AuthorityError::Transport(e.to_string())
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AuthorityError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(AuthorityError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|e| AuthorityError::InvalidResponse(e.to_string()))
}
