use crate::tree::{CfgNode, CfgValue};

/// Render a tree as an indented outline, descending at most `max_depth` levels.
///
/// Nodes print their key; leaf tokens print as `= a, b` under their owner.
pub fn format_tree(node: &CfgNode, max_depth: usize) -> String {
    let mut out = String::new();
    render_node(node, 0, max_depth, &mut out);
    out
}

fn render_node(node: &CfgNode, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (key, value) in node.iter() {
        match value {
            CfgValue::Tokens(tokens) => {
                out.push_str(&format!("{}= {}\n", indent, tokens.join(", ")));
            }
            CfgValue::Node(child) => {
                out.push_str(&format!("{}{}\n", indent, key));
                if depth < max_depth {
                    render_node(child, depth + 1, max_depth, out);
                }
            }
        }
    }
}
