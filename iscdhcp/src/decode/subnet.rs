use std::net::Ipv4Addr;

use isc_cfg_core::CfgNode;

use super::{DecodeContext, DecodeError, Scope};
use crate::subnet::Subnet;

/// Decode `subnet <network> netmask <mask> { ... }` from the node stored
/// under the network key.
pub(super) fn decode_subnet(
    ctx: &mut DecodeContext,
    network_raw: &str,
    details: &CfgNode,
) -> Result<Subnet, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidSubnet {
        network: network_raw.to_string(),
        reason,
    };

    let (keyword, rest) = details
        .unwrap()
        .ok_or_else(|| invalid("expected 'netmask <mask> { ... }'".to_string()))?;
    if keyword != "netmask" {
        return Err(invalid(format!("expected 'netmask', got '{keyword}'")));
    }
    let (mask_raw, body) = match rest.unwrap() {
        Some(only) => only,
        None => {
            // Blocks for the same network merge, so differing masks show up
            // as sibling keys.
            let masks: Vec<&str> = rest.children().map(|(mask, _)| mask).collect();
            return Err(invalid(if masks.is_empty() {
                "expected 'netmask <mask> { ... }'".to_string()
            } else {
                format!("declared with conflicting netmasks: {}", masks.join(", "))
            }));
        }
    };

    let network = network_raw
        .parse::<Ipv4Addr>()
        .map_err(|_| invalid("network is not an IPv4 address".to_string()))?;
    if network.is_unspecified() {
        return Err(invalid("network address is unset".to_string()));
    }
    let netmask = mask_raw
        .parse::<Ipv4Addr>()
        .map_err(|_| invalid(format!("netmask '{mask_raw}' is not an IPv4 address")))?;

    let mut subnet = Subnet::new(network, netmask);
    let scope = Scope::Subnet(network);
    for (key, value) in body.iter() {
        ctx.apply_entry(&mut subnet.options, scope, key, value)?;
    }
    Ok(subnet)
}
