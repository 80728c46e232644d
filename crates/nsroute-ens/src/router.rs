//! Resolution Router.
//!
//! `route` captures a [`ChainSnapshot`] first and makes every decision from
//! it: a registered operation runs its local resolver against the captured
//! binding, anything else is forwarded unchanged to the subgraph for the
//! captured chain. Failures come back inside the response, never as `Err`.

use std::sync::Arc;

use serde_json::Value;

use nsroute_core::config::RouterConfig;
use nsroute_core::endpoints::EndpointRegistry;
use nsroute_core::error::{ConfigError, NsError};
use nsroute_core::request::{OperationRequest, ResolvedResponse, ResponseError, Variables};
use nsroute_core::transport::SubgraphTransport;
use nsroute_http::HttpSubgraphClient;

use crate::resolvers::{default_table, Operation, Registered, ResolverTable};
use crate::session::{ChainSnapshot, NetworkSession};

pub struct ResolutionRouter {
    session: Arc<NetworkSession>,
    resolvers: ResolverTable,
    endpoints: EndpointRegistry,
    subgraph: Arc<dyn SubgraphTransport>,
}

impl ResolutionRouter {
    pub fn new(
        session: Arc<NetworkSession>,
        resolvers: ResolverTable,
        endpoints: EndpointRegistry,
        subgraph: Arc<dyn SubgraphTransport>,
    ) -> Self {
        Self {
            session,
            resolvers,
            endpoints,
            subgraph,
        }
    }

    /// Router with the built-in resolvers, public read-only providers and
    /// an HTTP subgraph client. Call `session().initialize()` before routing.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            Arc::new(NetworkSession::from_config(config)?),
            default_table()?,
            config.endpoint_registry()?,
            Arc::new(HttpSubgraphClient::default()),
        ))
    }

    pub fn session(&self) -> &Arc<NetworkSession> {
        &self.session
    }

    pub fn resolvers(&self) -> &ResolverTable {
        &self.resolvers
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    pub async fn route(&self, operation_name: &str, variables: Variables) -> ResolvedResponse {
        self.route_request(OperationRequest::named(operation_name, variables)).await
    }

    pub async fn route_request(&self, request: OperationRequest) -> ResolvedResponse {
        let snapshot = self.session.capture().await;
        if request.operation_name.trim().is_empty() {
            let err = NsError::Unroutable {
                operation: request.operation_name.clone(),
            };
            tracing::warn!(error = %err, "rejecting unnamed operation");
            return ResolvedResponse::failed(&request.operation_name, &err);
        }

        match self.resolvers.lookup(&request.operation_name) {
            Some((op, registered)) => {
                let registered = registered.clone();
                self.resolve_local(op, registered, snapshot, request.variables).await
            }
            None => self.forward(snapshot.chain_id(), &request).await,
        }
    }

    async fn resolve_local(
        &self,
        op: Operation,
        registered: Registered,
        snapshot: ChainSnapshot,
        variables: Variables,
    ) -> ResolvedResponse {
        let chain_id = snapshot.chain_id();
        match (registered.resolver)(snapshot, variables).await {
            Ok(value) => {
                tracing::debug!(operation = %op, chain_id, kind = ?registered.kind, "resolved locally");
                ResolvedResponse::resolved(op.name(), value)
            }
            Err(cause) => {
                tracing::warn!(operation = %op, chain_id, error = %cause, "local resolver failed");
                let wrapped = NsError::Resolution {
                    operation: op.name().to_string(),
                    reason: cause.to_string(),
                };
                let mut error = ResponseError::from_error(op.name(), &wrapped);
                error
                    .extensions
                    .insert("cause".into(), Value::String(cause.code().to_string()));
                ResolvedResponse {
                    errors: vec![error],
                    ..Default::default()
                }
            }
        }
    }

    async fn forward(&self, chain_id: u64, request: &OperationRequest) -> ResolvedResponse {
        let url = self.endpoints.endpoint_for(chain_id);
        tracing::debug!(operation = %request.operation_name, chain_id, url, "forwarding to subgraph");
        match self.subgraph.execute(url, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(operation = %request.operation_name, chain_id, url, error = %e, "subgraph request failed");
                ResolvedResponse::failed(&request.operation_name, &NsError::Transport(e))
            }
        }
    }
}
