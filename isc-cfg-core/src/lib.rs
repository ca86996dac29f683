//! Lexer and generic nested-tree parser for the ISC DHCP configuration dialect.
//!
//! The tree carries no DHCP semantics: every statement word becomes a nested
//! key and the final value words become leaf tokens. Higher-level crates walk
//! it with [`CfgNode::unwrap`], [`CfgNode::values`] and [`CfgNode::unroll`].

pub mod format;
pub mod lexer;
pub mod parser;
pub mod tree;

pub use format::{format_json, format_tree};
pub use lexer::is_bare_word;
pub use parser::{parse, parse_file, parse_reader, ParseError};
pub use tree::{CfgNode, CfgValue, VALUE_KEY};
