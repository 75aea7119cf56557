use serde::{Deserialize, Serialize};
use tfplug::reconcile::{collections_equivalent, optional_matches, CollectionOrder, Reconcilable};

use super::{parse_identifier, MappingError};
use crate::api::api_roles::ApiRole;

pub const KIND: &str = "API role";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRoleModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub privileges: Vec<String>,
}

impl TryFrom<&ApiRole> for ApiRoleModel {
    type Error = MappingError;

    fn try_from(role: &ApiRole) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(parse_identifier(KIND, "id", role.id.as_deref())?),
            name: role.display_name.clone(),
            privileges: role.privileges.clone(),
        })
    }
}

impl From<&ApiRoleModel> for ApiRole {
    fn from(model: &ApiRoleModel) -> Self {
        ApiRole {
            id: None,
            display_name: model.name.clone(),
            privileges: model.privileges.clone(),
        }
    }
}

impl Reconcilable for ApiRoleModel {
    fn is_equivalent(&self, observed: &Self, order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id)
            && self.name == observed.name
            && collections_equivalent(&self.privileges, &observed.privileges, order)
    }
}
