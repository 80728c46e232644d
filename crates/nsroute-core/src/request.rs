//! Wire types: JSON-RPC 2.0 for chain reads, GraphQL-shaped operations and
//! the uniform `{ data, errors }` response returned by the router.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NsError;

/// JSON-RPC request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Unwrap the result value or return the node's error.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.result.unwrap_or(Value::Null))
        }
    }
}

/// Operation variables, keyed by variable name.
pub type Variables = Map<String, Value>;

/// A named operation as issued by UI code.
///
/// `query` carries the original GraphQL document when the caller has one; it
/// is forwarded untouched on the remote path and ignored by local resolvers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub operation_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub variables: Variables,
}

impl OperationRequest {
    pub fn named(operation_name: impl Into<String>, variables: Variables) -> Self {
        Self {
            operation_name: operation_name.into(),
            query: None,
            variables,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// One entry of a response's `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
    /// Fields this type does not model (`locations`, vendor keys), kept verbatim.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ResponseError {
    /// The `extensions.code` value, if any.
    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(Value::as_str)
    }

    /// Wrap an error raised while answering `operation`.
    pub fn from_error(operation: &str, err: &NsError) -> Self {
        let mut extensions = Map::new();
        extensions.insert("code".into(), Value::String(err.code().into()));
        Self {
            message: err.to_string(),
            path: Some(vec![Value::String(operation.to_string())]),
            extensions,
            other: Map::new(),
        }
    }
}

/// The uniform response shape: `{ data, errors }`.
///
/// Local resolution yields `{ data: { <operation>: value }, errors: [] }` on
/// success and `{ data: null, errors: [..] }` on failure. Remote responses are
/// passed through as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ResponseError>,
    /// Other top-level keys of a remote body (`extensions`, …), kept verbatim.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ResponseError>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ResponseError>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResolvedResponse {
    /// Successful local resolution of `operation`.
    pub fn resolved(operation: &str, value: Value) -> Self {
        let mut data = Map::new();
        data.insert(operation.to_string(), value);
        Self {
            data: Some(Value::Object(data)),
            errors: vec![],
            other: Map::new(),
        }
    }

    /// Failed resolution: no data, one error.
    pub fn failed(operation: &str, err: &NsError) -> Self {
        Self {
            data: None,
            errors: vec![ResponseError::from_error(operation, err)],
            other: Map::new(),
        }
    }

    /// Returns `true` only when data is present and no error was reported.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.data.is_some()
    }

    /// The value stored under `operation` in `data`, if any.
    pub fn field(&self, operation: &str) -> Option<&Value> {
        self.data.as_ref()?.get(operation)
    }
}
