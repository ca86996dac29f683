//! Typed model, transcoder and supervisor for ISC DHCP server configuration.
//!
//! The library turns `dhcpd.conf`-style text into a [`ConfigRoot`] that can
//! be inspected and edited as plain Rust values, then written back out in a
//! canonical form. A small supervisor drives a locally installed `dhcpd`
//! around that model.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`root`]: [`ConfigRoot`], the unit of load and save
//! - [`options`]: the directive set shared by global and subnet scope
//! - [`subnet`]: subnet declarations keyed by network address
//! - [`registry`]: operator-defined options (`option <name> code <n> = ...;`)
//!
//! ## Transcoding
//!
//! - [`decode`]: generic statement tree → model, with warnings for anything
//!   outside the modeled vocabulary
//! - [`encode`]: model → canonical configuration text
//! - [`config_file`]: whole-file load and save
//!
//! ## Supervision
//!
//! - [`daemon`]: reload, save, status, start, stop and restart
//! - [`process`]: process lookup through procfs
//! - [`settings`]: TOML supervisor settings with embedded defaults
//!
//! ## Reporting
//!
//! - [`report`]: terminal rendering of warnings and summaries
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use iscdhcp::config_file::{load_config, save_config};
//!
//! let mut loaded = load_config(Path::new("/etc/dhcp/dhcpd.conf"))?;
//! for warning in &loaded.warnings {
//!     eprintln!("{warning}");
//! }
//! loaded.root.options.authoritative = true;
//! save_config(&loaded.root, Path::new("/etc/dhcp/dhcpd-dynamic.conf"))?;
//! # Ok::<(), iscdhcp::config_file::ConfigError>(())
//! ```
//!
//! # Built on isc-cfg-core
//!
//! Tokenizing and statement nesting live in `isc-cfg-core`, which knows
//! nothing about DHCP. All DHCP meaning is assigned in this crate.

pub mod config_file;
pub mod daemon;
pub mod decode;
pub mod encode;
pub mod options;
pub mod process;
pub mod registry;
pub mod report;
pub mod root;
pub mod settings;
pub mod subnet;

pub use config_file::{load_config, parse_config, save_config, ConfigError};
pub use decode::{DecodeError, DecodeWarning, Decoded};
pub use root::ConfigRoot;
