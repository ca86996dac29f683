use std::str::FromStr;

use isc_cfg_core::{CfgNode, CfgValue};

use super::{DecodeContext, DecodeError, Scope, WarningKind};
use crate::options::{AddressRange, HostEntry, OptionSet};
use crate::registry::{OptionDefinition, OptionType, Registration, RegistryError};

/// Leading `range` token that only marks BOOTP eligibility.
const DYNAMIC_BOOTP: &str = "dynamic-bootp";

impl DecodeContext {
    /// Handle a bare single-word statement such as `authoritative;`.
    pub(super) fn apply_flag(&mut self, options: &mut OptionSet, scope: Scope, word: &str) {
        match word {
            "authoritative" => options.authoritative = true,
            _ => self.warn(
                scope,
                WarningKind::UnknownDirective,
                format!("not recognized: {word}"),
            ),
        }
    }

    pub(super) fn apply_directive(
        &mut self,
        options: &mut OptionSet,
        scope: Scope,
        key: &str,
        node: &CfgNode,
    ) -> Result<(), DecodeError> {
        match key {
            "authoritative" => options.authoritative = true,
            "default-lease-time" => options.default_lease_time = Some(number(key, node)?),
            "max-lease-time" => options.max_lease_time = Some(number(key, node)?),
            "log-facility" => options.log_facility = Some(single(key, node)?),
            "filename" => options.filename = Some(single(key, node)?),
            "next-server" => options.next_server = Some(single(key, node)?),
            // Dynamic DNS updates are not modeled.
            "ddns-update-style" => {}
            "range" => options.range = Some(self.decode_range(scope, node)?),
            "option" => self.apply_option_clause(options, scope, node)?,
            _ => self.warn(
                scope,
                WarningKind::UnknownDirective,
                format!("not recognized: {key}"),
            ),
        }
        Ok(())
    }

    /// Decode `range [dynamic-bootp] <start> [<end>]`.
    ///
    /// Every `range` line of a scope lands in the same node. One pool per
    /// scope is modeled: the first is kept and the others are reported.
    fn decode_range(&mut self, scope: Scope, node: &CfgNode) -> Result<AddressRange, DecodeError> {
        let mut pools = Vec::new();
        collect_pools(node, &mut pools)?;
        let mut pools = pools.into_iter();
        let (start, end) = pools.next().ok_or_else(|| missing("range"))?;

        for (extra_start, extra_end) in pools {
            self.warn(
                scope,
                WarningKind::ExtraRange,
                format!("range {extra_start} {extra_end}: dropped, only the first pool is kept"),
            );
        }

        Ok(AddressRange::new(
            self.lenient_address(scope, "range", start),
            self.lenient_address(scope, "range", end),
        ))
    }

    fn apply_option_clause(
        &mut self,
        options: &mut OptionSet,
        scope: Scope,
        node: &CfgNode,
    ) -> Result<(), DecodeError> {
        for word in node.values() {
            self.warn(
                scope,
                WarningKind::UnknownOption,
                format!("option {word}: no value given"),
            );
        }

        for (name, clause) in node.children() {
            match name {
                "domain-name" => options.domain_name = Some(single(name, clause)?),
                "domain-name-servers" => {
                    options.domain_name_servers = list(name, clause)?
                        .iter()
                        .map(|raw| HostEntry::parse(raw))
                        .collect();
                }
                "broadcast-address" => options.broadcast_address = Some(single(name, clause)?),
                "routers" => options.routers = list(name, clause)?.to_vec(),
                "root-path" => options.root_path = Some(single(name, clause)?),
                "interface-mtu" => options.interface_mtu = Some(number(name, clause)?),
                // Classless routes are not modeled.
                "static-routes" => {}
                _ => self.apply_custom_option(options, scope, name, clause)?,
            }
        }
        Ok(())
    }

    /// Handle an option name outside the built-in table.
    ///
    /// A `code` clause registers the name; values are then decoded with the
    /// registered type. Both may live in the same node because the tree
    /// merges `option x code ...;` and `option x 1, 2;`.
    fn apply_custom_option(
        &mut self,
        options: &mut OptionSet,
        scope: Scope,
        name: &str,
        clause: &CfgNode,
    ) -> Result<(), DecodeError> {
        if let Some(("code", declaration)) = clause.unwrap() {
            let definition = parse_definition(name, declaration)?;
            let registration = self
                .registry
                .register(name, definition)
                .map_err(|err| match err {
                    RegistryError::DuplicateCode { .. } => DecodeError::DuplicateOptionCode(err),
                    other => DecodeError::InvalidOptionDefinition {
                        name: name.to_string(),
                        reason: other.to_string(),
                    },
                })?;
            if let Registration::Replaced(previous) = registration {
                self.warn(
                    scope,
                    WarningKind::RedefinedOption,
                    format!(
                        "option {name}: code {} ({}) replaces code {} ({})",
                        definition.code, definition.value_type, previous.code, previous.value_type
                    ),
                );
            }
        }

        let Some(definition) = self.registry.get(name).copied() else {
            self.warn(
                scope,
                WarningKind::UnknownOption,
                format!("not recognized option: {name}"),
            );
            return Ok(());
        };

        let words = clause.values();
        if words.is_empty() {
            return Ok(());
        }
        let value = decode_custom_value(name, definition.value_type, words)?;
        options.custom.insert(definition.code, value);
        Ok(())
    }
}

/// Validate `<code> = <type words...>` from an unrolled declaration.
fn parse_definition(name: &str, declaration: &CfgNode) -> Result<OptionDefinition, DecodeError> {
    let words = declaration.unroll();
    let invalid = |reason: String| DecodeError::InvalidOptionDefinition {
        name: name.to_string(),
        reason,
    };

    if words.len() < 3 {
        return Err(invalid(format!("too short: {}", words.join(" "))));
    }
    if words[1] != "=" {
        return Err(invalid(format!("'=' is expected, got '{}'", words[1])));
    }
    let code = words[0]
        .parse::<u8>()
        .map_err(|_| invalid(format!("'{}' is not an option code (0-255)", words[0])))?;
    let spelling = words[2..].join(" ");
    let value_type =
        OptionType::from_spelling(&spelling).ok_or_else(|| DecodeError::UnsupportedOptionType {
            name: name.to_string(),
            spelling,
        })?;

    Ok(OptionDefinition::new(code, value_type))
}

fn decode_custom_value(
    name: &str,
    value_type: OptionType,
    words: &[String],
) -> Result<Vec<u8>, DecodeError> {
    match value_type {
        OptionType::ByteArray => words
            .iter()
            .map(|word| {
                word.parse::<u8>()
                    .map_err(|_| DecodeError::InvalidByteValue {
                        name: name.to_string(),
                        token: word.clone(),
                    })
            })
            .collect(),
    }
}

/// Gather `(start, end)` pairs from a merged `range` node in tree order.
/// A lone address is a one-address pool.
fn collect_pools<'a>(
    node: &'a CfgNode,
    pools: &mut Vec<(&'a str, &'a str)>,
) -> Result<(), DecodeError> {
    for (key, value) in node.iter() {
        match value {
            CfgValue::Tokens(singles) => {
                pools.extend(singles.iter().map(|addr| (addr.as_str(), addr.as_str())))
            }
            CfgValue::Node(rest) if key == DYNAMIC_BOOTP => collect_pools(rest, pools)?,
            CfgValue::Node(rest) => match rest.values() {
                [] => return Err(missing("range")),
                ends => pools.extend(ends.iter().map(|end| (key, end.as_str()))),
            },
        }
    }
    Ok(())
}

fn missing(directive: &str) -> DecodeError {
    DecodeError::MissingValue {
        directive: directive.to_string(),
    }
}

fn single(directive: &str, node: &CfgNode) -> Result<String, DecodeError> {
    node.values()
        .first()
        .cloned()
        .ok_or_else(|| missing(directive))
}

fn list<'a>(directive: &str, node: &'a CfgNode) -> Result<&'a [String], DecodeError> {
    match node.values() {
        [] => Err(missing(directive)),
        words => Ok(words),
    }
}

fn number<T: FromStr>(directive: &str, node: &CfgNode) -> Result<T, DecodeError> {
    let raw = node.values().first().ok_or_else(|| missing(directive))?;
    raw.parse::<T>().map_err(|_| DecodeError::MalformedInteger {
        directive: directive.to_string(),
        value: raw.clone(),
    })
}
