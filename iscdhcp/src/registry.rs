use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use isc_cfg_core::is_bare_word;
use serde::Serialize;
use thiserror::Error;

/// Option names with a dedicated field in [`crate::options::OptionSet`].
/// These never refer to a custom definition.
pub const BUILTIN_OPTIONS: [&str; 7] = [
    "domain-name",
    "domain-name-servers",
    "broadcast-address",
    "routers",
    "root-path",
    "interface-mtu",
    "static-routes",
];

/// Value encodings supported for operator-defined options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionType {
    /// `array of integer 8`: comma-separated decimal bytes.
    ByteArray,
}

impl OptionType {
    pub const ALL: [OptionType; 1] = [OptionType::ByteArray];

    /// Spelling used in `option <name> code <n> = <type>;` declarations.
    pub fn spelling(self) -> &'static str {
        match self {
            OptionType::ByteArray => "array of integer 8",
        }
    }

    /// Resolve a declaration spelling with words already joined by single
    /// spaces.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.spelling() == spelling)
    }
}

impl Display for OptionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Code and value type declared for one custom option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionDefinition {
    pub code: u8,
    pub value_type: OptionType,
}

impl OptionDefinition {
    pub fn new(code: u8, value_type: OptionType) -> Self {
        Self { code, value_type }
    }
}

/// Outcome of [`OptionRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name was new.
    Added,
    /// The name already carried the same definition.
    Unchanged,
    /// The name carried a different definition, which was replaced.
    Replaced(OptionDefinition),
}

/// Errors returned when registering custom options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("option code {code} for '{name}' is reserved")]
    ReservedCode { code: u8, name: String },
    #[error("option name '{name}' is built in")]
    BuiltinName { name: String },
    #[error("option name '{name}' is not a single word")]
    InvalidName { name: String },
    #[error("option code {code} for '{name}' is already registered as '{existing}'")]
    DuplicateCode {
        code: u8,
        name: String,
        existing: String,
    },
}

/// Custom option definitions keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionRegistry {
    definitions: BTreeMap<String, OptionDefinition>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&OptionDefinition> {
        self.definitions.get(name)
    }

    /// Definitions in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionDefinition)> {
        self.definitions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Register `name`, refusing a code that another name already holds.
    ///
    /// Codes 0 (pad) and 255 (end), built-in option names, and names that
    /// would not read back as one word are refused as well.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: OptionDefinition,
    ) -> Result<Registration, RegistryError> {
        let name = name.into();
        if definition.code == 0 || definition.code == u8::MAX {
            return Err(RegistryError::ReservedCode {
                code: definition.code,
                name,
            });
        }
        if BUILTIN_OPTIONS.contains(&name.as_str()) {
            return Err(RegistryError::BuiltinName { name });
        }
        if !is_bare_word(&name) {
            return Err(RegistryError::InvalidName { name });
        }
        if let Some((existing, _)) = self
            .definitions
            .iter()
            .find(|(other, def)| def.code == definition.code && **other != name)
        {
            return Err(RegistryError::DuplicateCode {
                code: definition.code,
                name,
                existing: existing.clone(),
            });
        }

        Ok(match self.definitions.insert(name, definition) {
            None => Registration::Added,
            Some(previous) if previous == definition => Registration::Unchanged,
            Some(previous) => Registration::Replaced(previous),
        })
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionDefinition> {
        self.definitions.remove(name)
    }

    /// Reverse index from option code to declared name and value type.
    pub fn by_code(&self) -> BTreeMap<u8, (&str, OptionType)> {
        self.definitions
            .iter()
            .map(|(name, def)| (def.code, (name.as_str(), def.value_type)))
            .collect()
    }
}
