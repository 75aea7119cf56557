//! API role implementation
//!
//! API roles bundle privileges that API clients are granted.

use serde::{Deserialize, Serialize};

use super::common::CreatedResource;
use super::{ApiError, Client};

pub const API_ROLES_PATH: &str = "/api/v1/api-roles";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRole {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub privileges: Vec<String>,
}

pub struct ApiRolesApi<'a> {
    client: &'a Client,
}

impl<'a> ApiRolesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/api-roles/{id}
    pub async fn get(&self, id: i64) -> Result<ApiRole, ApiError> {
        self.client
            .get(&format!("{}/{}", API_ROLES_PATH, id))
            .await
    }

    /// POST /api/v1/api-roles
    pub async fn create(&self, role: &ApiRole) -> Result<ApiRole, ApiError> {
        self.client.post(API_ROLES_PATH, role).await
    }

    /// PUT /api/v1/api-roles/{id}
    pub async fn update(&self, id: i64, role: &ApiRole) -> Result<ApiRole, ApiError> {
        self.client
            .put(&format!("{}/{}", API_ROLES_PATH, id), role)
            .await
    }

    /// DELETE /api/v1/api-roles/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", API_ROLES_PATH, id))
            .await
    }
}

impl From<ApiRole> for CreatedResource {
    fn from(role: ApiRole) -> Self {
        CreatedResource {
            id: role.id.unwrap_or_default(),
            href: None,
        }
    }
}
