//! Data source implementations

pub mod data_source_category;
pub mod data_source_computer;

pub use data_source_category::CategoryDataSource;
pub use data_source_computer::ComputerDataSource;

use serde::Deserialize;
use tfplug::types::{decode, AttributePath, Config, Diagnostic};

/// How a data source finds its object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(i64),
    Name(String),
}

#[derive(Debug, Default, Deserialize)]
struct LookupConfig {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
}

impl Lookup {
    /// A positive `id` wins over `name`, a non-empty `name` is used otherwise
    pub fn from_config(kind: &str, config: &Config) -> Result<Self, Diagnostic> {
        let lookup: LookupConfig = decode(config).map_err(|e| {
            Diagnostic::error(
                "Invalid configuration",
                format!("Failed to decode {} lookup: {}", kind, e),
            )
        })?;

        let id = lookup.id.filter(|id| *id > 0);
        let name = lookup.name.filter(|name| !name.is_empty());

        match (id, name) {
            (Some(id), _) => Ok(Lookup::Id(id)),
            (None, Some(name)) => Ok(Lookup::Name(name)),
            (None, None) => Err(Diagnostic::error(
                "Missing lookup",
                format!("One of id or name must be set to look up a {}", kind),
            )
            .with_attribute(AttributePath::new("id"))),
        }
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "with ID '{}'", id),
            Lookup::Name(name) => write!(f, "'{}'", name),
        }
    }
}
