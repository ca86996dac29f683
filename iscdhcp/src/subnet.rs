use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::options::OptionSet;

/// A `subnet <network> netmask <mask> { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    pub network: Ipv4Addr,
    pub netmask: Ipv4Addr,
    /// Directives overriding the global scope for clients on this subnet.
    pub options: OptionSet,
}

impl Subnet {
    pub fn new(network: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Self {
            network,
            netmask,
            options: OptionSet::new(),
        }
    }

    /// Table key: the network address as text.
    pub fn key(&self) -> String {
        self.network.to_string()
    }

    /// Prefix length implied by the netmask.
    pub fn prefix_len(&self) -> u32 {
        u32::from(self.netmask).count_ones()
    }
}

/// Subnets keyed by network address text, iterated in lexicographic key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubnetTable {
    subnets: BTreeMap<String, Subnet>,
}

impl SubnetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    /// Insert or replace a subnet under its network key.
    ///
    /// # Panics
    ///
    /// Panics when the subnet's network address is unset (`0.0.0.0`); such a
    /// subnet has no usable key.
    pub fn insert(&mut self, subnet: impl Into<Subnet>) -> Option<Subnet> {
        let subnet = subnet.into();
        assert!(
            !subnet.network.is_unspecified(),
            "subnet network address is unset"
        );
        self.subnets.insert(subnet.key(), subnet)
    }

    pub fn get(&self, key: &str) -> Option<&Subnet> {
        self.subnets.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Subnet> {
        self.subnets.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Subnet> {
        self.subnets.remove(key)
    }

    /// Subnets in ascending string order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = &Subnet> {
        self.subnets.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.subnets.keys().map(String::as_str)
    }
}
