use serde::{Deserialize, Serialize};
use tfplug::reconcile::{optional_matches, CollectionOrder, Reconcilable};

use super::{parse_identifier, MappingError};
use crate::api::departments::Department;

pub const KIND: &str = "department";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

impl TryFrom<&Department> for DepartmentModel {
    type Error = MappingError;

    fn try_from(department: &Department) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(parse_identifier(KIND, "id", department.id.as_deref())?),
            name: department.name.clone(),
        })
    }
}

impl From<&DepartmentModel> for Department {
    fn from(model: &DepartmentModel) -> Self {
        Department {
            id: None,
            name: model.name.clone(),
        }
    }
}

impl Reconcilable for DepartmentModel {
    fn is_equivalent(&self, observed: &Self, _order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id) && self.name == observed.name
    }
}
