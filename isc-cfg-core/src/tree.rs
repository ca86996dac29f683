use std::fmt::{self, Display, Formatter};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which a node stores its leaf tokens.
pub const VALUE_KEY: &str = "_value";

/// Value stored under a node key: either leaf tokens or a nested node.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CfgValue {
    /// Positional leaf tokens, always stored under [`VALUE_KEY`].
    Tokens(Vec<String>),
    /// Nested node.
    Node(CfgNode),
}

/// A generic ISC config tree node.
///
/// Every statement word becomes a nested key, so `range 10.0.0.10 10.0.0.100;`
/// is stored as `range -> 10.0.0.10 -> _value: [10.0.0.100]`. Statements that
/// share a prefix share nodes. Entries keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CfgNode {
    entries: Vec<(String, CfgValue)>,
}

impl CfgNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` when the node has neither children nor tokens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of direct entries, including the leaf token entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate direct entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CfgValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterate direct child nodes, skipping the leaf token entry.
    pub fn children(&self) -> impl Iterator<Item = (&str, &CfgNode)> {
        self.entries.iter().filter_map(|(key, value)| match value {
            CfgValue::Node(node) => Some((key.as_str(), node)),
            CfgValue::Tokens(_) => None,
        })
    }

    /// Return the entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&CfgValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Return the child node stored under `key`.
    pub fn child(&self, key: &str) -> Option<&CfgNode> {
        match self.get(key)? {
            CfgValue::Node(node) => Some(node),
            CfgValue::Tokens(_) => None,
        }
    }

    /// Leaf tokens of this node, empty when there are none.
    pub fn values(&self) -> &[String] {
        match self.get(VALUE_KEY) {
            Some(CfgValue::Tokens(tokens)) => tokens,
            _ => &[],
        }
    }

    /// Peel one positional token off the node.
    ///
    /// Succeeds only when the node has exactly one child node; returns that
    /// child's key together with the child. Leaf tokens on `self` are ignored.
    pub fn unwrap(&self) -> Option<(&str, &CfgNode)> {
        let mut children = self.children();
        let first = children.next()?;
        if children.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Flatten the node into one ordered token list.
    ///
    /// Child keys are emitted before the child's own tokens, so
    /// `200 -> = -> array -> _value: [8]` unrolls to `["200", "=", "array", "8"]`.
    pub fn unroll(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.unroll_into(&mut out);
        out
    }

    fn unroll_into(&self, out: &mut Vec<String>) {
        for (key, value) in &self.entries {
            match value {
                CfgValue::Tokens(tokens) => out.extend(tokens.iter().cloned()),
                CfgValue::Node(node) => {
                    out.push(key.clone());
                    node.unroll_into(out);
                }
            }
        }
    }

    /// Append leaf tokens to this node.
    pub fn push_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into);
        if let Some((_, CfgValue::Tokens(tokens))) =
            self.entries.iter_mut().find(|(k, _)| k == VALUE_KEY)
        {
            tokens.extend(values);
            return;
        }
        self.entries
            .push((VALUE_KEY.to_string(), CfgValue::Tokens(values.collect())));
    }

    /// Get or create a mutable child node by key.
    pub fn ensure_child_mut(&mut self, key: &str) -> &mut CfgNode {
        let pos = match self
            .entries
            .iter()
            .position(|(k, v)| k == key && matches!(v, CfgValue::Node(_)))
        {
            Some(pos) => pos,
            None => {
                self.entries
                    .push((key.to_string(), CfgValue::Node(CfgNode::new())));
                self.entries.len() - 1
            }
        };
        match &mut self.entries[pos].1 {
            CfgValue::Node(node) => node,
            CfgValue::Tokens(_) => unreachable!("position filtered on node entries"),
        }
    }

    /// Walk `path`, creating nodes as needed, and return the terminal node.
    pub fn ensure_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> &mut CfgNode {
        let mut current = self;
        for segment in path {
            current = current.ensure_child_mut(segment.as_ref());
        }
        current
    }

    /// Merge every entry of `other` into `self`, recursively joining nodes
    /// that share a key.
    pub fn merge(&mut self, other: CfgNode) {
        for (key, value) in other.entries {
            match value {
                CfgValue::Tokens(tokens) => self.push_values(tokens),
                CfgValue::Node(node) => self.ensure_child_mut(&key).merge(node),
            }
        }
    }

    /// Walk a nested key path and return the node at its end.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&CfgNode> {
        let mut current = self;
        for segment in path {
            current = current.child(segment.as_ref())?;
        }
        Some(current)
    }
}

impl Serialize for CfgNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Display for CfgNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            match value {
                CfgValue::Tokens(tokens) => write!(f, "{}=[{}]", key, tokens.join(", "))?,
                CfgValue::Node(node) => write!(f, "{}:{}", key, node)?,
            }
        }
        write!(f, "}}")
    }
}
