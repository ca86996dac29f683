use std::net::Ipv4Addr;

use isc_cfg_core::parse;
use pretty_assertions::assert_eq;

use super::{decode, decode_with, DecodeContext, DecodeError, Decoded, Scope, WarningKind};
use crate::options::{AddressRange, HostEntry};
use crate::registry::{OptionDefinition, OptionRegistry, OptionType, RegistryError};

fn decode_text(text: &str) -> Result<Decoded, DecodeError> {
    let tree = parse(text).expect("test input parses");
    decode(&tree)
}

fn decoded(text: &str) -> Decoded {
    decode_text(text).expect("decode")
}

fn kinds(decoded: &Decoded) -> Vec<WarningKind> {
    decoded.warnings.iter().map(|w| w.kind).collect()
}

#[test]
fn global_directives_fill_the_global_set() {
    let out = decoded(
        "default-lease-time 600;\n\
         max-lease-time 7200;\n\
         authoritative;\n\
         log-facility local7;\n\
         option domain-name \"example.org\";\n\
         option domain-name-servers ns1.example.org, 10.0.0.53;\n",
    );

    let options = &out.root.options;
    assert_eq!(options.default_lease_time, Some(600));
    assert_eq!(options.max_lease_time, Some(7200));
    assert!(options.authoritative);
    assert_eq!(options.log_facility.as_deref(), Some("local7"));
    assert_eq!(options.domain_name.as_deref(), Some("example.org"));
    assert_eq!(
        options.domain_name_servers,
        vec![
            HostEntry::Name("ns1.example.org".to_string()),
            HostEntry::Address(Ipv4Addr::new(10, 0, 0, 53)),
        ]
    );
    assert!(out.warnings.is_empty());
}

#[test]
fn range_accepts_dynamic_bootp_marker() {
    let out = decoded(
        "subnet 10.5.5.0 netmask 255.255.255.224 {\n\
         range dynamic-bootp 10.5.5.26 10.5.5.30;\n\
         }\n",
    );
    let subnet = out.root.subnets.get("10.5.5.0").expect("subnet");
    assert_eq!(
        subnet.options.range,
        Some(AddressRange::new(
            Ipv4Addr::new(10, 5, 5, 26),
            Ipv4Addr::new(10, 5, 5, 30)
        ))
    );
}

#[test]
fn single_address_range_starts_and_ends_at_it() {
    let out = decoded("range 10.0.0.5;\n");
    let addr = Ipv4Addr::new(10, 0, 0, 5);
    assert_eq!(out.root.options.range, Some(AddressRange::new(addr, addr)));
}

#[test]
fn malformed_range_address_becomes_unspecified_with_warning() {
    let out = decoded("range 10.0.0.5 not-an-address;\n");
    assert_eq!(
        out.root.options.range,
        Some(AddressRange::new(
            Ipv4Addr::new(10, 0, 0, 5),
            Ipv4Addr::UNSPECIFIED
        ))
    );
    assert_eq!(kinds(&out), vec![WarningKind::LenientAddress]);
    assert_eq!(out.warnings[0].scope, Scope::Global);
}

#[test]
fn second_range_in_a_scope_is_dropped_with_warning() {
    let out = decoded(
        "subnet 10.0.0.0 netmask 255.255.255.0 {\n\
         \trange 10.0.0.10 10.0.0.20;\n\
         \trange dynamic-bootp 10.0.0.40 10.0.0.50;\n\
         \trange 10.0.0.60;\n\
         }\n",
    );
    let subnet = out.root.subnets.get("10.0.0.0").expect("subnet");
    assert_eq!(
        subnet.options.range,
        Some(AddressRange::new(
            Ipv4Addr::new(10, 0, 0, 10),
            Ipv4Addr::new(10, 0, 0, 20)
        ))
    );
    assert_eq!(kinds(&out), vec![WarningKind::ExtraRange; 2]);
    assert!(out.warnings[0].message.contains("10.0.0.40 10.0.0.50"));
    assert!(out.warnings[1].message.contains("10.0.0.60 10.0.0.60"));
}

#[test]
fn ranges_sharing_a_start_keep_the_first_end() {
    let out = decoded("range 10.0.0.1 10.0.0.5;\nrange 10.0.0.1 10.0.0.9;\n");
    assert_eq!(
        out.root.options.range,
        Some(AddressRange::new(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 5)
        ))
    );
    assert_eq!(kinds(&out), vec![WarningKind::ExtraRange]);
}

#[test]
fn range_with_too_many_addresses_is_an_error() {
    let err = decode_text("range 10.0.0.1 10.0.0.2 10.0.0.3;\n").expect_err("must fail");
    assert!(matches!(err, DecodeError::MissingValue { directive } if directive == "range"));
}

#[test]
fn custom_option_declared_then_used() {
    let out = decoded(
        "option opt200 code 200 = array of integer 8;\n\
         option opt200 1, 2;\n",
    );
    assert_eq!(
        out.root.registry.get("opt200"),
        Some(&OptionDefinition::new(200, OptionType::ByteArray))
    );
    assert_eq!(out.root.options.custom(200), Some(&[1, 2][..]));
    assert!(out.warnings.is_empty());
}

#[test]
fn custom_option_with_single_byte() {
    let out = decoded(
        "option opt200 code 200 = array of integer 8;\n\
         option opt200 7;\n",
    );
    assert_eq!(out.root.options.custom(200), Some(&[7][..]));
}

#[test]
fn declaration_without_equals_is_an_error() {
    let err = decode_text("option broken code 250 array of integer 8;\n").expect_err("must fail");
    match err {
        DecodeError::InvalidOptionDefinition { name, reason } => {
            assert_eq!(name, "broken");
            assert!(reason.contains("'='"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn declaration_with_reserved_code_is_an_error() {
    let err = decode_text("option pad code 0 = array of integer 8;\n").expect_err("must fail");
    assert!(matches!(err, DecodeError::InvalidOptionDefinition { .. }));
}

#[test]
fn declaration_with_end_code_is_an_error() {
    let err = decode_text("option end code 255 = array of integer 8;\n").expect_err("must fail");
    match err {
        DecodeError::InvalidOptionDefinition { name, reason } => {
            assert_eq!(name, "end");
            assert!(reason.contains("reserved"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn declaration_with_multi_word_name_is_an_error() {
    let err = decode_text("option \"two words\" code 200 = array of integer 8;\n")
        .expect_err("must fail");
    match err {
        DecodeError::InvalidOptionDefinition { name, reason } => {
            assert_eq!(name, "two words");
            assert!(reason.contains("not a single word"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn declaration_with_unknown_type_is_an_error() {
    let err = decode_text("option x code 201 = string;\n").expect_err("must fail");
    match err {
        DecodeError::UnsupportedOptionType { name, spelling } => {
            assert_eq!(name, "x");
            assert_eq!(spelling, "string");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undeclared_option_is_only_a_warning() {
    let out = decoded("option mystery 1, 2;\ndefault-lease-time 60;\n");
    assert_eq!(kinds(&out), vec![WarningKind::UnknownOption]);
    assert!(out.root.options.custom.is_empty());
    assert_eq!(out.root.options.default_lease_time, Some(60));
}

#[test]
fn unknown_directives_are_tolerated() {
    let out = decoded(
        "ddns-update-style none;\n\
         one-lease-per-client true;\n\
         host printer { fixed-address 10.0.0.9; }\n\
         authoritative;\n",
    );
    assert!(out.root.options.authoritative);
    assert_eq!(
        kinds(&out),
        vec![WarningKind::UnknownDirective, WarningKind::UnknownDirective]
    );
}

#[test]
fn non_numeric_lease_time_is_an_error() {
    let err = decode_text("max-lease-time forever;\n").expect_err("must fail");
    match err {
        DecodeError::MalformedInteger { directive, value } => {
            assert_eq!(directive, "max-lease-time");
            assert_eq!(value, "forever");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn byte_value_out_of_range_is_an_error() {
    let err = decode_text(
        "option opt200 code 200 = array of integer 8;\n\
         option opt200 1, 256;\n",
    )
    .expect_err("must fail");
    match err {
        DecodeError::InvalidByteValue { name, token } => {
            assert_eq!(name, "opt200");
            assert_eq!(token, "256");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reusing_a_code_under_another_name_is_an_error() {
    let err = decode_text(
        "option first code 200 = array of integer 8;\n\
         option second code 200 = array of integer 8;\n",
    )
    .expect_err("must fail");
    assert!(matches!(
        err,
        DecodeError::DuplicateOptionCode(RegistryError::DuplicateCode { code: 200, .. })
    ));
}

#[test]
fn redefining_a_seeded_option_replaces_it_with_warning() {
    let mut registry = OptionRegistry::new();
    registry
        .register("site", OptionDefinition::new(150, OptionType::ByteArray))
        .expect("seed");
    let tree = parse("option site code 151 = array of integer 8;\noption site 3;\n").expect("parse");

    let out = decode_with(&tree, DecodeContext::with_registry(registry)).expect("decode");
    assert_eq!(out.root.registry.get("site").map(|d| d.code), Some(151));
    assert_eq!(out.root.options.custom(151), Some(&[3][..]));
    assert_eq!(kinds(&out), vec![WarningKind::RedefinedOption]);
}

#[test]
fn global_declarations_apply_to_every_subnet() {
    let out = decoded(
        "subnet 10.0.0.0 netmask 255.255.255.0 {\n\
         option site-id 1;\n\
         }\n\
         option site-id code 224 = array of integer 8;\n",
    );
    let subnet = out.root.subnets.get("10.0.0.0").expect("subnet");
    assert_eq!(subnet.options.custom(224), Some(&[1][..]));
    assert!(out.warnings.is_empty());
}

#[test]
fn subnet_declarations_only_reach_later_subnets() {
    let out = decoded(
        "subnet 10.1.0.0 netmask 255.255.255.0 {\n\
         option site-id 9;\n\
         }\n\
         subnet 10.0.0.0 netmask 255.255.255.0 {\n\
         option site-id code 224 = array of integer 8;\n\
         option site-id 7, 8;\n\
         }\n",
    );

    let early = out.root.subnets.get("10.1.0.0").expect("early subnet");
    assert!(early.options.custom.is_empty());
    let late = out.root.subnets.get("10.0.0.0").expect("late subnet");
    assert_eq!(late.options.custom(224), Some(&[7, 8][..]));

    // Registered globally even though declared inside a subnet.
    assert!(out.root.registry.get("site-id").is_some());
    assert_eq!(kinds(&out), vec![WarningKind::UnknownOption]);
    assert_eq!(
        out.warnings[0].scope,
        Scope::Subnet(Ipv4Addr::new(10, 1, 0, 0))
    );
}

#[test]
fn subnet_options_stay_in_their_subnet() {
    let out = decoded(
        "default-lease-time 600;\n\
         subnet 192.168.1.0 netmask 255.255.255.0 {\n\
         option routers 192.168.1.1, 192.168.1.2;\n\
         next-server 192.168.1.10;\n\
         filename \"pxelinux.0\";\n\
         option root-path \"/srv/nfs/root\";\n\
         option interface-mtu 9000;\n\
         option broadcast-address 192.168.1.255;\n\
         }\n",
    );

    assert!(out.root.options.routers.is_empty());
    let subnet = out.root.subnets.get("192.168.1.0").expect("subnet");
    assert_eq!(subnet.netmask, Ipv4Addr::new(255, 255, 255, 0));
    assert_eq!(subnet.options.default_lease_time, None);
    assert_eq!(subnet.options.routers, vec!["192.168.1.1", "192.168.1.2"]);
    assert_eq!(subnet.options.next_server.as_deref(), Some("192.168.1.10"));
    assert_eq!(subnet.options.filename.as_deref(), Some("pxelinux.0"));
    assert_eq!(subnet.options.root_path.as_deref(), Some("/srv/nfs/root"));
    assert_eq!(subnet.options.interface_mtu, Some(9000));
    assert_eq!(
        subnet.options.broadcast_address.as_deref(),
        Some("192.168.1.255")
    );
}

#[test]
fn subnet_without_netmask_keyword_is_an_error() {
    let err = decode_text("subnet 10.0.0.0 mask 255.0.0.0 { }\n").expect_err("must fail");
    assert!(matches!(err, DecodeError::InvalidSubnet { .. }));
}

#[test]
fn subnet_declared_with_two_masks_names_both() {
    let err = decode_text(
        "subnet 10.0.0.0 netmask 255.255.255.0 { authoritative; }\n\
         subnet 10.0.0.0 netmask 255.255.0.0 { authoritative; }\n",
    )
    .expect_err("must fail");
    match err {
        DecodeError::InvalidSubnet { network, reason } => {
            assert_eq!(network, "10.0.0.0");
            assert_eq!(
                reason,
                "declared with conflicting netmasks: 255.255.255.0, 255.255.0.0"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn subnet_with_unparseable_network_is_an_error() {
    let err =
        decode_text("subnet lan netmask 255.255.255.0 { authoritative; }\n").expect_err("must fail");
    match err {
        DecodeError::InvalidSubnet { network, .. } => assert_eq!(network, "lan"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn subnet_with_unspecified_network_is_an_error() {
    let err = decode_text("subnet 0.0.0.0 netmask 0.0.0.0 { }\n").expect_err("must fail");
    assert!(matches!(err, DecodeError::InvalidSubnet { .. }));
}

#[test]
fn empty_input_decodes_to_empty_root() {
    let out = decoded("# nothing here\n");
    assert_eq!(out.root, crate::root::ConfigRoot::new());
    assert!(out.warnings.is_empty());
}
