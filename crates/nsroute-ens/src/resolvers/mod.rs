//! Query Resolver Set.
//!
//! Operations are a closed enum; the table maps each registered variant to
//! a boxed async function and is frozen once built. Registering the same
//! operation twice, in either group, fails at build time.

mod mutations;
mod queries;
mod vars;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use nsroute_core::error::{ConfigError, NsError};
use nsroute_core::request::Variables;

use crate::session::ChainSnapshot;

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Every operation a local resolver can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    IsEnsReady,
    GetNetwork,
    GetEtherScanAddr,
    GetOwner,
    GetResolver,
    GetAddr,
    GetName,
    GetAvailability,
    GetExpiryDate,
    GetDomain,
    GetTokenInfo,
    SetOwner,
    SetResolver,
    SetAddress,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Self::IsEnsReady,
        Self::GetNetwork,
        Self::GetEtherScanAddr,
        Self::GetOwner,
        Self::GetResolver,
        Self::GetAddr,
        Self::GetName,
        Self::GetAvailability,
        Self::GetExpiryDate,
        Self::GetDomain,
        Self::GetTokenInfo,
        Self::SetOwner,
        Self::SetResolver,
        Self::SetAddress,
    ];

    /// Operation name as sent by UI code.
    pub fn name(self) -> &'static str {
        match self {
            Self::IsEnsReady => "isENSReady",
            Self::GetNetwork => "getNetwork",
            Self::GetEtherScanAddr => "getEtherScanAddr",
            Self::GetOwner => "getOwner",
            Self::GetResolver => "getResolver",
            Self::GetAddr => "getAddr",
            Self::GetName => "getName",
            Self::GetAvailability => "getAvailability",
            Self::GetExpiryDate => "getExpiryDate",
            Self::GetDomain => "getDomain",
            Self::GetTokenInfo => "getTokenInfo",
            Self::SetOwner => "setOwner",
            Self::SetResolver => "setResolver",
            Self::SetAddress => "setAddress",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A local resolver: snapshot and variables in, JSON value out.
pub type ResolverFn =
    Arc<dyn Fn(ChainSnapshot, Variables) -> BoxFuture<'static, Result<Value, NsError>> + Send + Sync>;

/// A resolver together with its group.
#[derive(Clone)]
pub struct Registered {
    pub kind: OperationKind,
    pub resolver: ResolverFn,
}

/// Collects registrations before the table is frozen.
#[derive(Default)]
pub struct ResolverTableBuilder {
    entries: Vec<(Operation, OperationKind, ResolverFn)>,
}

impl ResolverTableBuilder {
    pub fn query<F, Fut>(self, op: Operation, f: F) -> Self
    where
        F: Fn(ChainSnapshot, Variables) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, NsError>> + Send + 'static,
    {
        self.register(op, OperationKind::Query, f)
    }

    pub fn mutation<F, Fut>(self, op: Operation, f: F) -> Self
    where
        F: Fn(ChainSnapshot, Variables) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, NsError>> + Send + 'static,
    {
        self.register(op, OperationKind::Mutation, f)
    }

    fn register<F, Fut>(mut self, op: Operation, kind: OperationKind, f: F) -> Self
    where
        F: Fn(ChainSnapshot, Variables) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, NsError>> + Send + 'static,
    {
        let resolver: ResolverFn = Arc::new(move |snapshot, vars| f(snapshot, vars).boxed());
        self.entries.push((op, kind, resolver));
        self
    }

    /// Freeze the table; an operation registered twice is rejected.
    pub fn build(self) -> Result<ResolverTable, ConfigError> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for (op, kind, resolver) in self.entries {
            if entries.insert(op, Registered { kind, resolver }).is_some() {
                return Err(ConfigError::DuplicateOperation {
                    operation: op.name().to_string(),
                });
            }
        }
        Ok(ResolverTable { entries })
    }
}

/// Immutable operation → resolver table.
#[derive(Clone)]
pub struct ResolverTable {
    entries: HashMap<Operation, Registered>,
}

impl ResolverTable {
    pub fn builder() -> ResolverTableBuilder {
        ResolverTableBuilder::default()
    }

    /// Resolver for `name` from either group.
    pub fn lookup(&self, name: &str) -> Option<(Operation, &Registered)> {
        let op = Operation::from_name(name)?;
        let registered = self.entries.get(&op)?;
        Some((op, registered))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered operation names in `kind`, sorted.
    pub fn names(&self, kind: OperationKind) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, r)| r.kind == kind)
            .map(|(op, _)| op.name())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Table with every built-in query and mutation.
pub fn default_table() -> Result<ResolverTable, ConfigError> {
    ResolverTable::builder()
        .query(Operation::IsEnsReady, queries::is_ens_ready)
        .query(Operation::GetNetwork, queries::get_network)
        .query(Operation::GetEtherScanAddr, queries::get_etherscan_addr)
        .query(Operation::GetOwner, queries::get_owner)
        .query(Operation::GetResolver, queries::get_resolver)
        .query(Operation::GetAddr, queries::get_addr)
        .query(Operation::GetName, queries::get_name)
        .query(Operation::GetAvailability, queries::get_availability)
        .query(Operation::GetExpiryDate, queries::get_expiry_date)
        .query(Operation::GetDomain, queries::get_domain)
        .query(Operation::GetTokenInfo, queries::get_token_info)
        .mutation(Operation::SetOwner, mutations::set_owner)
        .mutation(Operation::SetResolver, mutations::set_resolver)
        .mutation(Operation::SetAddress, mutations::set_address)
        .build()
}
