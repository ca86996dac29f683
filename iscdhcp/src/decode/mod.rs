//! Generic tree → [`ConfigRoot`] decoding.
//!
//! The tree produced by `isc-cfg-core` knows nothing about DHCP; this module
//! assigns the meaning. Decoding runs in two passes over the top-level keys:
//!
//! 1. every key except `subnet` is applied to the global [`OptionSet`];
//! 2. every `subnet` entry is decoded, in document order, into a fresh
//!    [`Subnet`](crate::subnet::Subnet).
//!
//! Both passes share one [`OptionRegistry`], carried by [`DecodeContext`].
//! Custom options declared globally are therefore visible to every subnet,
//! whatever their position in the file. A declaration made inside a subnet
//! block is registered globally too, but only from that point on: subnets
//! decoded earlier do not see it.
//!
//! ## Failure model
//!
//! - Malformed values (bad integers, broken `code` declarations, byte tokens
//!   outside 0-255, unusable subnet headers) abort decoding with a
//!   [`DecodeError`].
//! - Unknown directives, unknown options and unparseable range addresses are
//!   collected as [`DecodeWarning`]s and logged; decoding continues.

use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use isc_cfg_core::{CfgNode, CfgValue};
use serde::Serialize;
use thiserror::Error;

use crate::options::OptionSet;
use crate::registry::{OptionRegistry, RegistryError};
use crate::root::ConfigRoot;

mod options;
mod subnet;

#[cfg(test)]
mod tests;

/// Top-level key holding subnet declarations.
const SUBNET_KEY: &str = "subnet";

/// Errors that abort decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{directive}: '{value}' is not a valid integer")]
    MalformedInteger { directive: String, value: String },
    #[error("{directive}: missing value")]
    MissingValue { directive: String },
    #[error("option {name}: malformed code declaration: {reason}")]
    InvalidOptionDefinition { name: String, reason: String },
    #[error("option {name}: unsupported value type '{spelling}'")]
    UnsupportedOptionType { name: String, spelling: String },
    #[error("option {name}: '{token}' is not a byte value (0-255)")]
    InvalidByteValue { name: String, token: String },
    #[error("subnet {network}: {reason}")]
    InvalidSubnet { network: String, reason: String },
    #[error(transparent)]
    DuplicateOptionCode(#[from] RegistryError),
}

/// Category of a recoverable decode issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Directive outside the modeled vocabulary.
    UnknownDirective,
    /// `option` name that is neither built in nor declared with `code`.
    UnknownOption,
    /// Address that failed to parse and was replaced by `0.0.0.0`.
    LenientAddress,
    /// Custom option declaration replaced an earlier, different one.
    RedefinedOption,
    /// Additional `range` line in a scope that already has a pool.
    ExtraRange,
}

/// Scope a directive was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Global,
    Subnet(Ipv4Addr),
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Subnet(network) => write!(f, "subnet {network}"),
        }
    }
}

/// A recoverable issue found while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeWarning {
    pub kind: WarningKind,
    pub scope: Scope,
    pub message: String,
}

impl Display for DecodeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.message)
    }
}

/// A decoded configuration and the warnings raised while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub root: ConfigRoot,
    pub warnings: Vec<DecodeWarning>,
}

/// State shared by every scope during one decode pass.
#[derive(Debug, Default)]
pub struct DecodeContext {
    pub registry: OptionRegistry,
    pub warnings: Vec<DecodeWarning>,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing registry, e.g. one populated by the caller.
    pub fn with_registry(registry: OptionRegistry) -> Self {
        Self {
            registry,
            warnings: Vec::new(),
        }
    }

    /// Apply one tree entry to `options`.
    pub fn apply_entry(
        &mut self,
        options: &mut OptionSet,
        scope: Scope,
        key: &str,
        value: &CfgValue,
    ) -> Result<(), DecodeError> {
        match value {
            CfgValue::Tokens(words) => {
                for word in words {
                    self.apply_flag(options, scope, word);
                }
                Ok(())
            }
            CfgValue::Node(node) => self.apply_directive(options, scope, key, node),
        }
    }

    pub(crate) fn warn(&mut self, scope: Scope, kind: WarningKind, message: String) {
        tracing::warn!(%scope, ?kind, "{message}");
        self.warnings.push(DecodeWarning {
            kind,
            scope,
            message,
        });
    }

    /// Parse an address, substituting `0.0.0.0` and warning when it is
    /// malformed.
    pub(crate) fn lenient_address(&mut self, scope: Scope, directive: &str, raw: &str) -> Ipv4Addr {
        match raw.parse::<Ipv4Addr>() {
            Ok(addr) => addr,
            Err(_) => {
                self.warn(
                    scope,
                    WarningKind::LenientAddress,
                    format!("{directive}: '{raw}' is not an IPv4 address, using 0.0.0.0"),
                );
                Ipv4Addr::UNSPECIFIED
            }
        }
    }
}

/// Decode a parsed config tree into a fresh [`ConfigRoot`].
pub fn decode(tree: &CfgNode) -> Result<Decoded, DecodeError> {
    decode_with(tree, DecodeContext::new())
}

/// Decode with a caller-supplied context (for example a pre-seeded registry).
pub fn decode_with(tree: &CfgNode, mut ctx: DecodeContext) -> Result<Decoded, DecodeError> {
    let mut root = ConfigRoot::new();

    for (key, value) in tree.iter() {
        if key == SUBNET_KEY {
            continue;
        }
        ctx.apply_entry(&mut root.options, Scope::Global, key, value)?;
    }

    for (key, value) in tree.iter() {
        if key != SUBNET_KEY {
            continue;
        }
        let CfgValue::Node(subnets) = value else {
            continue;
        };
        for word in subnets.values() {
            ctx.warn(
                Scope::Global,
                WarningKind::UnknownDirective,
                format!("subnet {word}: declaration has no netmask or body"),
            );
        }
        for (network, details) in subnets.children() {
            let subnet = subnet::decode_subnet(&mut ctx, network, details)?;
            root.subnets.insert(subnet);
        }
    }

    root.registry = ctx.registry;
    tracing::debug!(
        subnets = root.subnets.len(),
        custom_options = root.registry.len(),
        warnings = ctx.warnings.len(),
        "decoded configuration"
    );
    Ok(Decoded {
        root,
        warnings: ctx.warnings,
    })
}
