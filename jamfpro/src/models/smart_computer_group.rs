use serde::{Deserialize, Serialize};
use tfplug::reconcile::{
    collections_equivalent, optional_matches, CollectionMember, CollectionOrder, Reconcilable,
};

use super::MappingError;
use crate::api::computer_groups::{ComputerGroup, ComputerGroupRequest, GroupCriterion};

pub const KIND: &str = "smart computer group";

pub const DEFAULT_AND_OR: &str = "and";
pub const DEFAULT_SEARCH_TYPE: &str = "is";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartComputerGroupModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub criteria: Vec<CriterionModel>,
}

/// One smart group criterion. Unset fields take the API defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionModel {
    pub name: String,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub and_or: Option<String>,
    #[serde(default)]
    pub search_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub opening_paren: Option<bool>,
    #[serde(default)]
    pub closing_paren: Option<bool>,
}

impl From<&CriterionModel> for GroupCriterion {
    fn from(model: &CriterionModel) -> Self {
        GroupCriterion {
            name: model.name.clone(),
            priority: model.priority.unwrap_or_default(),
            and_or: model
                .and_or
                .clone()
                .unwrap_or_else(|| DEFAULT_AND_OR.to_string()),
            search_type: model
                .search_type
                .clone()
                .unwrap_or_else(|| DEFAULT_SEARCH_TYPE.to_string()),
            value: model.value.clone().unwrap_or_default(),
            opening_paren: model.opening_paren.unwrap_or_default(),
            closing_paren: model.closing_paren.unwrap_or_default(),
        }
    }
}

impl From<&GroupCriterion> for CriterionModel {
    fn from(criterion: &GroupCriterion) -> Self {
        Self {
            name: criterion.name.clone(),
            priority: Some(criterion.priority),
            and_or: Some(criterion.and_or.clone()),
            search_type: Some(criterion.search_type.clone()),
            value: Some(criterion.value.clone()),
            opening_paren: Some(criterion.opening_paren),
            closing_paren: Some(criterion.closing_paren),
        }
    }
}

/// Criteria are identified by their full value, defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CriterionKey {
    name: String,
    priority: i64,
    and_or: String,
    search_type: String,
    value: String,
    opening_paren: bool,
    closing_paren: bool,
}

impl CollectionMember for CriterionModel {
    type Key = CriterionKey;

    fn identity_key(&self) -> CriterionKey {
        let wire = GroupCriterion::from(self);
        CriterionKey {
            name: wire.name,
            priority: wire.priority,
            and_or: wire.and_or,
            search_type: wire.search_type,
            value: wire.value,
            opening_paren: wire.opening_paren,
            closing_paren: wire.closing_paren,
        }
    }
}

impl TryFrom<&ComputerGroup> for SmartComputerGroupModel {
    type Error = MappingError;

    fn try_from(group: &ComputerGroup) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(group.id),
            name: group.name.clone(),
            criteria: group.criteria.iter().map(CriterionModel::from).collect(),
        })
    }
}

impl From<&SmartComputerGroupModel> for ComputerGroupRequest {
    fn from(model: &SmartComputerGroupModel) -> Self {
        ComputerGroupRequest {
            name: model.name.clone(),
            is_smart: true,
            criteria: model.criteria.iter().map(GroupCriterion::from).collect(),
            computers: Vec::new(),
        }
    }
}

impl Reconcilable for SmartComputerGroupModel {
    fn is_equivalent(&self, observed: &Self, order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id)
            && self.name == observed.name
            && collections_equivalent(&self.criteria, &observed.criteria, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str, value: &str) -> CriterionModel {
        CriterionModel {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn unset_criterion_fields_take_api_defaults() {
        let wire = GroupCriterion::from(&criterion("Model", "MacBook Pro"));

        assert_eq!(wire.and_or, "and");
        assert_eq!(wire.search_type, "is");
        assert_eq!(wire.priority, 0);
        assert!(!wire.opening_paren);
    }

    #[test]
    fn defaults_compare_equal_to_observed_values() {
        let desired = SmartComputerGroupModel {
            id: None,
            name: "Laptops".to_string(),
            criteria: vec![criterion("Model", "MacBook Pro")],
        };
        let observed = ComputerGroup {
            id: 11,
            name: "Laptops".to_string(),
            is_smart: true,
            criteria: vec![GroupCriterion {
                name: "Model".to_string(),
                priority: 0,
                and_or: "and".to_string(),
                search_type: "is".to_string(),
                value: "MacBook Pro".to_string(),
                opening_paren: false,
                closing_paren: false,
            }],
            computers: vec![],
        };
        let observed = SmartComputerGroupModel::try_from(&observed).unwrap();

        assert!(desired.is_equivalent(&observed, CollectionOrder::Unordered));
        assert_eq!(observed.criteria[0].search_type.as_deref(), Some("is"));
    }

    #[test]
    fn changed_criterion_value_is_not_equivalent() {
        let desired = SmartComputerGroupModel {
            id: Some(11),
            name: "Laptops".to_string(),
            criteria: vec![criterion("Model", "MacBook Pro")],
        };
        let observed = SmartComputerGroupModel {
            criteria: vec![criterion("Model", "MacBook Air")],
            ..desired.clone()
        };

        assert!(!desired.is_equivalent(&observed, CollectionOrder::Unordered));
    }

    #[test]
    fn criteria_order_follows_policy() {
        let a = criterion("Model", "MacBook Pro");
        let b = criterion("Building", "HQ");
        let desired = SmartComputerGroupModel {
            id: Some(11),
            name: "Laptops".to_string(),
            criteria: vec![a.clone(), b.clone()],
        };
        let observed = SmartComputerGroupModel {
            criteria: vec![b, a],
            ..desired.clone()
        };

        assert!(desired.is_equivalent(&observed, CollectionOrder::Unordered));
        assert!(!desired.is_equivalent(&observed, CollectionOrder::Ordered));
    }
}
