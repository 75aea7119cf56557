//! Terraform state models and their mapping to and from API wire types
//!
//! Every model is the serde shape of its resource's state. Wire → model
//! conversions are `TryFrom` because Jamf Pro API identifiers arrive as
//! decimal strings; model → wire conversions are infallible.

pub mod api_role;
pub mod building;
pub mod category;
pub mod computer;
pub mod computer_group;
pub mod department;
pub mod smart_computer_group;

pub use api_role::ApiRoleModel;
pub use building::BuildingModel;
pub use category::CategoryModel;
pub use computer::ComputerModel;
pub use computer_group::{ComputerGroupModel, GroupMemberModel};
pub use department::DepartmentModel;
pub use smart_computer_group::{CriterionModel, SmartComputerGroupModel};

use std::num::ParseIntError;

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("invalid {kind} {field} {value:?}: {source}")]
    InvalidIdentifier {
        kind: &'static str,
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{kind} response is missing {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

/// Parses an identifier the API returned as a decimal string
pub fn parse_identifier(
    kind: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> Result<i64, MappingError> {
    let value = value.ok_or(MappingError::MissingField { kind, field })?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|source| MappingError::InvalidIdentifier {
            kind,
            field,
            value: value.to_string(),
            source,
        })
}

/// Empty strings from the API become null in state
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Unset desired text is not compared, empty desired text matches an
/// absent observation
pub(crate) fn text_matches(desired: &Option<String>, observed: &Option<String>) -> bool {
    match desired.as_deref() {
        None => true,
        Some("") => observed.as_deref().unwrap_or("").is_empty(),
        Some(value) => observed.as_deref() == Some(value),
    }
}
