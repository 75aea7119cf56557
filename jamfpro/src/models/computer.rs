use serde::{Deserialize, Serialize};
use tfplug::reconcile::{optional_matches, CollectionOrder, Reconcilable};

use super::{non_empty, text_matches, MappingError};
use crate::api::computers::{ComputerGeneral, ComputerRequest};

pub const KIND: &str = "computer";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputerModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub udid: Option<String>,
}

impl TryFrom<&ComputerGeneral> for ComputerModel {
    type Error = MappingError;

    fn try_from(general: &ComputerGeneral) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(general.id),
            name: general.name.clone(),
            serial_number: non_empty(general.serial_number.as_deref()),
            udid: non_empty(general.udid.as_deref()),
        })
    }
}

impl From<&ComputerModel> for ComputerRequest {
    fn from(model: &ComputerModel) -> Self {
        ComputerRequest {
            name: model.name.clone(),
            serial_number: model.serial_number.clone(),
            udid: model.udid.clone(),
        }
    }
}

impl Reconcilable for ComputerModel {
    fn is_equivalent(&self, observed: &Self, _order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id)
            && self.name == observed.name
            && text_matches(&self.serial_number, &observed.serial_number)
            && text_matches(&self.udid, &observed.udid)
    }
}
