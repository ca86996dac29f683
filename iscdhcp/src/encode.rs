//! [`ConfigRoot`] → configuration text.
//!
//! Output is canonical: custom option declarations sorted by name, then the
//! global directives in a fixed order, then one block per subnet in key
//! order. Re-parsing the output yields an equal root.

use std::collections::BTreeMap;
use std::io;

use isc_cfg_core::is_bare_word;

use crate::options::OptionSet;
use crate::registry::{OptionRegistry, OptionType};
use crate::root::ConfigRoot;

const SUBNET_INDENT: &str = "\t";

/// Render `root` as configuration text.
///
/// # Panics
///
/// Panics if any option set carries a custom code that the registry does not
/// define.
pub fn render_config(root: &ConfigRoot) -> String {
    let mut out = String::new();
    render_registry(&root.registry, &mut out);

    let index = root.registry.by_code();
    render_options(&root.options, &index, "", &mut out);

    for subnet in root.subnets.iter() {
        out.push_str(&format!(
            "\nsubnet {} netmask {} {{\n",
            subnet.network, subnet.netmask
        ));
        render_options(&subnet.options, &index, SUBNET_INDENT, &mut out);
        out.push_str("}\n");
    }
    out
}

/// Write the rendered configuration to `out`.
pub fn write_config<W: io::Write>(root: &ConfigRoot, out: &mut W) -> io::Result<()> {
    out.write_all(render_config(root).as_bytes())
}

fn render_registry(registry: &OptionRegistry, out: &mut String) {
    for (name, definition) in registry.iter() {
        out.push_str(&format!(
            "option {} code {} = {};\n",
            name, definition.code, definition.value_type
        ));
    }
}

fn render_options(
    options: &OptionSet,
    index: &BTreeMap<u8, (&str, OptionType)>,
    indent: &str,
    out: &mut String,
) {
    let mut line = |text: String| {
        out.push_str(indent);
        out.push_str(&text);
        out.push_str(";\n");
    };

    if let Some(seconds) = options.default_lease_time {
        line(format!("default-lease-time {seconds}"));
    }
    if let Some(seconds) = options.max_lease_time {
        line(format!("max-lease-time {seconds}"));
    }
    if options.authoritative {
        line("authoritative".to_string());
    }
    if let Some(facility) = &options.log_facility {
        line(format!("log-facility {}", word(facility)));
    }
    if let Some(domain) = &options.domain_name {
        line(format!("option domain-name {}", quote(domain)));
    }
    if !options.domain_name_servers.is_empty() {
        line(format!(
            "option domain-name-servers {}",
            join_words(options.domain_name_servers.iter().map(ToString::to_string))
        ));
    }
    if let Some(range) = &options.range {
        line(format!("range {} {}", range.start, range.end));
    }
    if !options.routers.is_empty() {
        line(format!(
            "option routers {}",
            join_words(options.routers.iter().cloned())
        ));
    }
    if let Some(broadcast) = &options.broadcast_address {
        line(format!("option broadcast-address {}", word(broadcast)));
    }
    if let Some(server) = &options.next_server {
        line(format!("next-server {}", word(server)));
    }
    if let Some(filename) = &options.filename {
        line(format!("filename {}", quote(filename)));
    }
    if let Some(path) = &options.root_path {
        line(format!("option root-path {}", quote(path)));
    }
    if let Some(mtu) = options.interface_mtu {
        line(format!("option interface-mtu {mtu}"));
    }

    for (code, value) in &options.custom {
        let Some((name, value_type)) = index.get(code) else {
            panic!("custom option code {code} has no registered definition");
        };
        // An empty value has no textual form in this dialect.
        if value.is_empty() {
            tracing::warn!(
                code = *code,
                option = *name,
                "empty custom option value not written"
            );
            continue;
        }
        line(format!("option {name} {}", encode_custom_value(*value_type, value)));
    }
}

fn encode_custom_value(value_type: OptionType, value: &[u8]) -> String {
    match value_type {
        OptionType::ByteArray => join(value),
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_words(items: impl Iterator<Item = String>) -> String {
    items.map(|item| word(&item)).collect::<Vec<_>>().join(", ")
}

/// Free text as a single token: bare when it lexes as one word, quoted
/// otherwise.
fn word(raw: &str) -> String {
    if is_bare_word(raw) {
        raw.to_string()
    } else {
        quote(raw)
    }
}

fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;

    use super::{quote, render_config, word};
    use crate::options::{AddressRange, OptionSet};
    use crate::registry::{OptionDefinition, OptionType};
    use crate::root::ConfigRoot;
    use crate::subnet::Subnet;

    fn subnet(network: [u8; 4]) -> Subnet {
        Subnet::new(Ipv4Addr::from(network), Ipv4Addr::new(255, 255, 255, 0))
    }

    #[test]
    fn global_directives_follow_fixed_order() {
        let mut root = ConfigRoot::new();
        root.options = OptionSet {
            interface_mtu: Some(1500),
            root_path: Some("/srv/root".to_string()),
            filename: Some("pxelinux.0".to_string()),
            next_server: Some("10.0.0.2".to_string()),
            broadcast_address: Some("10.0.0.255".to_string()),
            routers: vec!["10.0.0.1".to_string(), "10.0.0.254".to_string()],
            range: Some(AddressRange::new(
                Ipv4Addr::new(10, 0, 0, 10),
                Ipv4Addr::new(10, 0, 0, 100),
            )),
            domain_name_servers: vec!["ns1.example.org".into(), "10.0.0.53".into()],
            domain_name: Some("example.org".to_string()),
            log_facility: Some("local7".to_string()),
            authoritative: true,
            max_lease_time: Some(7200),
            default_lease_time: Some(600),
            ..OptionSet::default()
        };

        assert_eq!(
            render_config(&root),
            "default-lease-time 600;\n\
             max-lease-time 7200;\n\
             authoritative;\n\
             log-facility local7;\n\
             option domain-name \"example.org\";\n\
             option domain-name-servers ns1.example.org, 10.0.0.53;\n\
             range 10.0.0.10 10.0.0.100;\n\
             option routers 10.0.0.1, 10.0.0.254;\n\
             option broadcast-address 10.0.0.255;\n\
             next-server 10.0.0.2;\n\
             filename \"pxelinux.0\";\n\
             option root-path \"/srv/root\";\n\
             option interface-mtu 1500;\n"
        );
    }

    #[test]
    fn declarations_come_first_and_customs_sort_by_code() {
        let mut root = ConfigRoot::new();
        root.registry
            .register("zeta", OptionDefinition::new(130, OptionType::ByteArray))
            .expect("zeta");
        root.registry
            .register("alpha", OptionDefinition::new(250, OptionType::ByteArray))
            .expect("alpha");
        root.options.set_custom(250, vec![9]);
        root.options.set_custom(130, vec![1, 2, 3]);

        assert_eq!(
            render_config(&root),
            "option alpha code 250 = array of integer 8;\n\
             option zeta code 130 = array of integer 8;\n\
             option zeta 1, 2, 3;\n\
             option alpha 9;\n"
        );
    }

    #[test]
    fn subnets_render_as_indented_blocks_in_key_order() {
        let mut root = ConfigRoot::new();
        root.options.authoritative = true;
        let mut second = subnet([2, 0, 0, 0]);
        second.options.routers = vec!["2.0.0.1".to_string()];
        root.subnets.insert(second);
        root.subnets.insert(subnet([10, 0, 0, 0]));

        assert_eq!(
            render_config(&root),
            "authoritative;\n\
             \n\
             subnet 10.0.0.0 netmask 255.255.255.0 {\n\
             }\n\
             \n\
             subnet 2.0.0.0 netmask 255.255.255.0 {\n\
             \toption routers 2.0.0.1;\n\
             }\n"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut root = ConfigRoot::new();
        for octet in [7u8, 30, 1, 200] {
            let mut s = subnet([10, octet, 0, 0]);
            s.options.default_lease_time = Some(u32::from(octet));
            root.subnets.insert(s);
        }
        assert_eq!(render_config(&root), render_config(&root.clone()));
    }

    #[test]
    #[should_panic(expected = "custom option code 77 has no registered definition")]
    fn unregistered_custom_code_panics() {
        let mut root = ConfigRoot::new();
        root.options.set_custom(77, vec![1]);
        render_config(&root);
    }

    #[test]
    fn quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }

    #[test]
    fn free_text_is_quoted_only_when_needed() {
        assert_eq!(word("10.0.0.1"), "10.0.0.1");
        assert_eq!(word(""), "\"\"");
        assert_eq!(word("boot host"), "\"boot host\"");

        let mut root = ConfigRoot::new();
        root.options.log_facility = Some(String::new());
        root.options.next_server = Some("boot host".to_string());
        root.options.routers = vec!["10.0.0.1".to_string(), "gw one".to_string()];
        assert_eq!(
            render_config(&root),
            "log-facility \"\";\n\
             option routers 10.0.0.1, \"gw one\";\n\
             next-server \"boot host\";\n"
        );
    }

    #[test]
    fn empty_custom_value_is_skipped() {
        let mut root = ConfigRoot::new();
        root.registry
            .register("opt200", OptionDefinition::new(200, OptionType::ByteArray))
            .expect("register");
        root.options.custom.insert(200, Vec::new());
        assert_eq!(
            render_config(&root),
            "option opt200 code 200 = array of integer 8;\n"
        );
    }
}
