//! Variable extraction shared by the resolvers.

use alloy_primitives::Address;

use nsroute_core::error::NsError;
use nsroute_core::namehash::split_label_tld;
use nsroute_core::request::Variables;

use crate::contracts::parse_address;

pub(crate) fn string<'a>(vars: &'a Variables, key: &str) -> Result<&'a str, NsError> {
    match vars.get(key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s),
        Some(other) => Err(NsError::InvalidVariables(format!("'{key}' must be a non-empty string, got {other}"))),
        None => Err(NsError::InvalidVariables(format!("missing '{key}'"))),
    }
}

pub(crate) fn address(vars: &Variables, key: &str) -> Result<Address, NsError> {
    parse_address(string(vars, key)?)
}

/// `name` split into label and TLD; bare labels are rejected.
pub(crate) fn label_and_tld(name: &str) -> Result<(&str, &str), NsError> {
    split_label_tld(name).ok_or_else(|| NsError::InvalidVariables(format!("'{name}' has no top-level domain")))
}
