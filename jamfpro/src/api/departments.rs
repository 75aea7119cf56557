//! Department API implementation

use serde::{Deserialize, Serialize};

use super::common::CreatedResource;
use super::{ApiError, Client};

pub const DEPARTMENTS_PATH: &str = "/api/v1/departments";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub name: String,
}

pub struct DepartmentsApi<'a> {
    client: &'a Client,
}

impl<'a> DepartmentsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/departments/{id}
    pub async fn get(&self, id: i64) -> Result<Department, ApiError> {
        self.client
            .get(&format!("{}/{}", DEPARTMENTS_PATH, id))
            .await
    }

    /// POST /api/v1/departments
    pub async fn create(&self, department: &Department) -> Result<CreatedResource, ApiError> {
        self.client.post(DEPARTMENTS_PATH, department).await
    }

    /// PUT /api/v1/departments/{id}
    pub async fn update(&self, id: i64, department: &Department) -> Result<Department, ApiError> {
        self.client
            .put(&format!("{}/{}", DEPARTMENTS_PATH, id), department)
            .await
    }

    /// DELETE /api/v1/departments/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", DEPARTMENTS_PATH, id))
            .await
    }
}
