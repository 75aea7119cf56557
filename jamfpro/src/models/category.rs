use serde::{Deserialize, Serialize};
use tfplug::reconcile::{optional_matches, CollectionOrder, Reconcilable};

use super::{parse_identifier, MappingError};
use crate::api::categories::Category;

pub const KIND: &str = "category";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub priority: Option<i64>,
}

impl TryFrom<&Category> for CategoryModel {
    type Error = MappingError;

    fn try_from(category: &Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(parse_identifier(KIND, "id", category.id.as_deref())?),
            name: category.name.clone(),
            priority: Some(category.priority),
        })
    }
}

impl From<&CategoryModel> for Category {
    fn from(model: &CategoryModel) -> Self {
        Category {
            id: None,
            name: model.name.clone(),
            priority: model.priority.unwrap_or_default(),
        }
    }
}

impl Reconcilable for CategoryModel {
    fn is_equivalent(&self, observed: &Self, _order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id)
            && self.name == observed.name
            && optional_matches(&self.priority, &observed.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_priority() {
        let wire = Category {
            id: Some("4".to_string()),
            name: "Printers".to_string(),
            priority: 9,
        };
        let model = CategoryModel::try_from(&wire).unwrap();

        assert_eq!(model.priority, Some(9));
        assert_eq!(Category::from(&model).priority, 9);
        assert_eq!(Category::from(&model).id, None);
    }

    #[test]
    fn priority_mismatch_is_not_equivalent() {
        let observed = CategoryModel {
            id: Some(4),
            name: "Printers".to_string(),
            priority: Some(9),
        };
        let desired = CategoryModel {
            priority: Some(3),
            ..observed.clone()
        };

        assert!(!desired.is_equivalent(&observed, CollectionOrder::default()));
    }
}
