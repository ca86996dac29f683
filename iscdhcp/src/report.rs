use colored::Colorize;

use crate::decode::{DecodeWarning, WarningKind};
use crate::options::OptionSet;
use crate::root::ConfigRoot;

/// Render decode warnings for terminal output, one per line.
pub fn render_warnings(warnings: &[DecodeWarning]) -> String {
    let mut out = Vec::new();
    for warning in warnings {
        let prefix = match warning.kind {
            WarningKind::UnknownDirective => "UNKNOWN",
            WarningKind::UnknownOption => "OPTION",
            WarningKind::LenientAddress => "ADDRESS",
            WarningKind::RedefinedOption => "REDEFINED",
            WarningKind::ExtraRange => "RANGE",
        };
        let line = format!("{prefix} scope={} {}", warning.scope, warning.message);
        let colored = match warning.kind {
            WarningKind::LenientAddress | WarningKind::RedefinedOption => line.red().to_string(),
            WarningKind::UnknownDirective | WarningKind::UnknownOption | WarningKind::ExtraRange => {
                line.yellow().to_string()
            }
        };
        out.push(colored);
    }
    out.join("\n")
}

/// Render per-scope counts for terminal output.
pub fn render_summary(root: &ConfigRoot, warnings: &[DecodeWarning]) -> String {
    let mut out = Vec::new();
    out.push("custom_options".to_string());
    if root.registry.is_empty() {
        out.push("- none".to_string());
    }
    for (name, definition) in root.registry.iter() {
        out.push(format!(
            "- {name}: code={} type={}",
            definition.code, definition.value_type
        ));
    }

    out.push(String::new());
    out.push("scopes".to_string());
    out.push(format!("- global: {}", describe(&root.options)));
    for subnet in root.subnets.iter() {
        out.push(format!(
            "- subnet {}/{}: {}",
            subnet.network,
            subnet.prefix_len(),
            describe(&subnet.options)
        ));
    }

    out.push(String::new());
    out.push(
        format!(
            "subnets={} custom_options={} warnings={}",
            root.subnets.len(),
            root.registry.len(),
            warnings.len()
        )
        .cyan()
        .to_string(),
    );
    out.join("\n")
}

fn describe(options: &OptionSet) -> String {
    let mut parts = Vec::new();
    if let Some(range) = &options.range {
        parts.push(format!("range={}-{}", range.start, range.end));
    }
    if !options.routers.is_empty() {
        parts.push(format!("routers={}", options.routers.len()));
    }
    if !options.domain_name_servers.is_empty() {
        parts.push(format!("dns={}", options.domain_name_servers.len()));
    }
    if let Some(seconds) = options.default_lease_time {
        parts.push(format!("lease={seconds}s"));
    }
    if !options.custom.is_empty() {
        parts.push(format!("custom={}", options.custom.len()));
    }
    if options.authoritative {
        parts.push("authoritative".to_string());
    }
    if parts.is_empty() {
        "empty".to_string()
    } else {
        parts.join(" ")
    }
}
