//! Building API implementation

use serde::{Deserialize, Serialize};

use super::common::CreatedResource;
use super::{ApiError, Client};

pub const BUILDINGS_PATH: &str = "/api/v1/buildings";

/// Building as returned and accepted by /api/v1/buildings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

pub struct BuildingsApi<'a> {
    client: &'a Client,
}

impl<'a> BuildingsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/buildings/{id}
    pub async fn get(&self, id: i64) -> Result<Building, ApiError> {
        self.client
            .get(&format!("{}/{}", BUILDINGS_PATH, id))
            .await
    }

    /// POST /api/v1/buildings
    pub async fn create(&self, building: &Building) -> Result<CreatedResource, ApiError> {
        self.client.post(BUILDINGS_PATH, building).await
    }

    /// PUT /api/v1/buildings/{id}
    pub async fn update(&self, id: i64, building: &Building) -> Result<Building, ApiError> {
        self.client
            .put(&format!("{}/{}", BUILDINGS_PATH, id), building)
            .await
    }

    /// DELETE /api/v1/buildings/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", BUILDINGS_PATH, id))
            .await
    }
}
