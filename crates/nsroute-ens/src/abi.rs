//! Minimal ABI plumbing for the handful of contract calls nsroute makes.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, B256, U256};

use nsroute_core::error::NsError;
use nsroute_core::namehash::Node;

/// 4-byte function selector: `keccak256(signature)[..4]`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `selector ++ abi_encode(args...)`.
pub fn encode_call(signature: &str, args: Vec<DynSolValue>) -> Vec<u8> {
    let mut calldata = selector(signature).to_vec();
    if !args.is_empty() {
        calldata.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());
    }
    calldata
}

/// Decode call return data as a tuple of `types`.
pub fn decode_returns(types: Vec<DynSolType>, data: &[u8]) -> Result<Vec<DynSolValue>, NsError> {
    if data.is_empty() {
        return Err(NsError::Contract("empty return data".into()));
    }
    let decoded = DynSolType::Tuple(types)
        .abi_decode_params(data)
        .map_err(|e| NsError::Contract(format!("return decode: {e}")))?;
    Ok(match decoded {
        DynSolValue::Tuple(vals) => vals,
        single => vec![single],
    })
}

pub fn node(node: Node) -> DynSolValue {
    DynSolValue::FixedBytes(B256::from(node), 32)
}

pub fn uint(node: Node) -> DynSolValue {
    DynSolValue::Uint(U256::from_be_bytes(node), 256)
}

pub fn address(address: Address) -> DynSolValue {
    DynSolValue::Address(address)
}

pub(crate) fn first(values: Vec<DynSolValue>) -> Result<DynSolValue, NsError> {
    values
        .into_iter()
        .next()
        .ok_or_else(|| NsError::Contract("missing return value".into()))
}

pub(crate) fn as_address(value: DynSolValue) -> Result<Address, NsError> {
    value
        .as_address()
        .ok_or_else(|| NsError::Contract(format!("expected address, got {value:?}")))
}

pub(crate) fn as_string(value: DynSolValue) -> Result<String, NsError> {
    match value {
        DynSolValue::String(s) => Ok(s),
        other => Err(NsError::Contract(format!("expected string, got {other:?}"))),
    }
}

pub(crate) fn as_bool(value: DynSolValue) -> Result<bool, NsError> {
    value
        .as_bool()
        .ok_or_else(|| NsError::Contract(format!("expected bool, got {value:?}")))
}

pub(crate) fn as_uint(value: DynSolValue) -> Result<U256, NsError> {
    value
        .as_uint()
        .map(|(v, _)| v)
        .ok_or_else(|| NsError::Contract(format!("expected uint, got {value:?}")))
}
