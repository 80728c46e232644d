//! GraphQL subgraph client.

use async_trait::async_trait;
use std::time::Duration;

use nsroute_core::error::TransportError;
use nsroute_core::request::{OperationRequest, ResolvedResponse};
use nsroute_core::transport::SubgraphTransport;

/// Posts operations to whichever subgraph URL the router selects.
pub struct HttpSubgraphClient {
    http: reqwest::Client,
    request_timeout: Duration,
}

impl Default for HttpSubgraphClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpSubgraphClient {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            http: crate::build_http(request_timeout),
            request_timeout,
        }
    }
}

#[async_trait]
impl SubgraphTransport for HttpSubgraphClient {
    async fn execute(
        &self,
        url: &str,
        op: &OperationRequest,
    ) -> Result<ResolvedResponse, TransportError> {
        let resp = self
            .http
            .post(url)
            .json(op)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        ms: self.request_timeout.as_millis() as u64,
                    }
                } else {
                    TransportError::Http(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(serde_json::from_str::<ResolvedResponse>(&body)?)
    }
}
