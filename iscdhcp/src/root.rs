use std::fmt::{self, Display, Formatter};
use std::io;

use serde::Serialize;

use crate::encode;
use crate::options::OptionSet;
use crate::registry::OptionRegistry;
use crate::subnet::SubnetTable;

/// The complete in-memory server configuration and the unit of load/save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigRoot {
    /// Custom option definitions, shared by every scope.
    pub registry: OptionRegistry,
    /// Global directives.
    pub options: OptionSet,
    pub subnets: SubnetTable,
}

impl ConfigRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the canonical configuration text.
    pub fn to_config_string(&self) -> String {
        encode::render_config(self)
    }

    /// Write the canonical configuration text to `out`.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        encode::write_config(self, out)
    }
}

impl Display for ConfigRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_config_string())
    }
}
