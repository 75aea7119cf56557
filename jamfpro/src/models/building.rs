use serde::{Deserialize, Serialize};
use tfplug::reconcile::{optional_matches, CollectionOrder, Reconcilable};

use super::{non_empty, parse_identifier, text_matches, MappingError};
use crate::api::buildings::Building;

pub const KIND: &str = "building";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingModel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub street_address1: Option<String>,
    #[serde(default)]
    pub street_address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub zip_postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl TryFrom<&Building> for BuildingModel {
    type Error = MappingError;

    fn try_from(building: &Building) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(parse_identifier(KIND, "id", building.id.as_deref())?),
            name: building.name.clone(),
            street_address1: non_empty(building.street_address1.as_deref()),
            street_address2: non_empty(building.street_address2.as_deref()),
            city: non_empty(building.city.as_deref()),
            state_province: non_empty(building.state_province.as_deref()),
            zip_postal_code: non_empty(building.zip_postal_code.as_deref()),
            country: non_empty(building.country.as_deref()),
        })
    }
}

/// Unset address fields are written as empty strings, which clears them
impl From<&BuildingModel> for Building {
    fn from(model: &BuildingModel) -> Self {
        let text = |value: &Option<String>| Some(value.clone().unwrap_or_default());
        Building {
            id: None,
            name: model.name.clone(),
            street_address1: text(&model.street_address1),
            street_address2: text(&model.street_address2),
            city: text(&model.city),
            state_province: text(&model.state_province),
            zip_postal_code: text(&model.zip_postal_code),
            country: text(&model.country),
        }
    }
}

/// Address fields are optional without being computed, so an unset field
/// must read back empty
fn address_matches(desired: &Option<String>, observed: &Option<String>) -> bool {
    text_matches(&Some(desired.clone().unwrap_or_default()), observed)
}

impl Reconcilable for BuildingModel {
    fn is_equivalent(&self, observed: &Self, _order: CollectionOrder) -> bool {
        optional_matches(&self.id, &observed.id)
            && self.name == observed.name
            && address_matches(&self.street_address1, &observed.street_address1)
            && address_matches(&self.street_address2, &observed.street_address2)
            && address_matches(&self.city, &observed.city)
            && address_matches(&self.state_province, &observed.state_province)
            && address_matches(&self.zip_postal_code, &observed.zip_postal_code)
            && address_matches(&self.country, &observed.country)
    }
}
