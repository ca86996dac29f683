use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use serde::Serialize;

/// Dynamic address pool declared by a `range` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl AddressRange {
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Self {
        Self { start, end }
    }
}

/// One `domain-name-servers` entry: a literal address or a hostname kept as
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HostEntry {
    Address(Ipv4Addr),
    Name(String),
}

impl HostEntry {
    /// Classify a raw token, falling back to a hostname when it is not an
    /// IPv4 address.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Ipv4Addr>() {
            Ok(addr) => HostEntry::Address(addr),
            Err(_) => HostEntry::Name(raw.to_string()),
        }
    }

    /// Address of the entry, if it was written as one.
    pub fn address(&self) -> Option<Ipv4Addr> {
        match self {
            HostEntry::Address(addr) => Some(*addr),
            HostEntry::Name(_) => None,
        }
    }
}

impl Display for HostEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HostEntry::Address(addr) => write!(f, "{addr}"),
            HostEntry::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for HostEntry {
    fn from(raw: &str) -> Self {
        HostEntry::parse(raw)
    }
}

impl From<Ipv4Addr> for HostEntry {
    fn from(addr: Ipv4Addr) -> Self {
        HostEntry::Address(addr)
    }
}

/// DHCP directives for one scope, either global or a single subnet.
///
/// Every field is optional. An unset field is left out of the generated
/// configuration entirely; it never means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_lease_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lease_time: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub authoritative: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_name_servers: Vec<HostEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<AddressRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_mtu: Option<u16>,
    /// Operator-defined options keyed by option code. Every code here must
    /// be registered in the owning root's registry before the root is
    /// serialized. Empty values are not written; prefer
    /// [`OptionSet::set_custom`], which never stores one.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<u8, Vec<u8>>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` when no directive is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Store a custom option value, returning the previous one.
    ///
    /// An empty value has no textual form, so it clears the option instead.
    pub fn set_custom(&mut self, code: u8, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        let value = value.into();
        if value.is_empty() {
            return self.custom.remove(&code);
        }
        self.custom.insert(code, value)
    }

    /// Raw bytes of a custom option.
    pub fn custom(&self, code: u8) -> Option<&[u8]> {
        self.custom.get(&code).map(Vec::as_slice)
    }

    /// Name server addresses, skipping entries kept as hostnames.
    pub fn name_server_addresses(&self) -> Vec<Ipv4Addr> {
        self.domain_name_servers
            .iter()
            .filter_map(HostEntry::address)
            .collect()
    }
}
