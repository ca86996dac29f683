use crate::tree::CfgNode;

/// Format a tree as pretty-printed JSON.
pub fn format_json(node: &CfgNode) -> String {
    serde_json::to_string_pretty(node).unwrap_or_else(|_| "{}".to_string())
}
