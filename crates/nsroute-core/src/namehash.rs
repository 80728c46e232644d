//! ENS name hashing (EIP-137).
//!
//! `namehash("")            = 0x00…00`
//! `namehash(label + "." + rest) = keccak256(namehash(rest) ++ keccak256(label))`

use tiny_keccak::{Hasher, Keccak};

/// 32-byte ENS node.
pub type Node = [u8; 32];

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

/// Hash of a single label.
pub fn labelhash(label: &str) -> Node {
    keccak256(label.as_bytes())
}

/// Node of a dotted name. Expects an already normalised name.
pub fn namehash(name: &str) -> Node {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&labelhash(label));
        node = keccak256(&buf);
    }
    node
}

/// Node of the reverse record for `address` (`<hex>.addr.reverse`).
pub fn reverse_node(address: &str) -> Node {
    let hex = address.strip_prefix("0x").unwrap_or(address).to_lowercase();
    namehash(&format!("{hex}.addr.reverse"))
}

/// Split `name` into its first label and its top-level domain.
///
/// `"alice.doge"` → `Some(("alice", "doge"))`; a bare label has no TLD.
pub fn split_label_tld(name: &str) -> Option<(&str, &str)> {
    let (label, _) = name.split_once('.')?;
    let tld = name.rsplit('.').next()?;
    Some((label, tld))
}

pub fn to_hex(node: &Node) -> String {
    format!("0x{}", hex::encode(node))
}
