use serde::{Deserialize, Serialize};
use tfplug::reconcile::{
    collections_equivalent, optional_matches, CollectionMember, CollectionOrder, Reconcilable,
};

use super::{non_empty, MappingError};
use crate::api::computer_groups::{ComputerGroup, ComputerGroupRequest, GroupComputer};

pub const KIND: &str = "computer group";

/// Static group membership
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputerGroupModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub computers: Vec<GroupMemberModel>,
}

/// A member computer; only the ID is significant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMemberModel {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

impl CollectionMember for GroupMemberModel {
    type Key = i64;

    fn identity_key(&self) -> i64 {
        self.id
    }
}

impl From<&GroupComputer> for GroupMemberModel {
    fn from(computer: &GroupComputer) -> Self {
        Self {
            id: computer.id,
            name: non_empty(computer.name.as_deref()),
            serial_number: non_empty(computer.serial_number.as_deref()),
        }
    }
}

impl TryFrom<&ComputerGroup> for ComputerGroupModel {
    type Error = MappingError;

    fn try_from(group: &ComputerGroup) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(group.id),
            name: group.name.clone(),
            computers: group.computers.iter().map(GroupMemberModel::from).collect(),
        })
    }
}

impl From<&ComputerGroupModel> for ComputerGroupRequest {
    fn from(model: &ComputerGroupModel) -> Self {
        ComputerGroupRequest {
            name: model.name.clone(),
            is_smart: false,
            criteria: Vec::new(),
            computers: model.computers.iter().map(|member| member.id).collect(),
        }
    }
}

impl Reconcilable for ComputerGroupModel {
    fn is_equivalent(&self, observed: &Self, order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id)
            && self.name == observed.name
            && collections_equivalent(&self.computers, &observed.computers, order)
    }
}
