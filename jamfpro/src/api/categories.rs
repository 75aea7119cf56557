//! Category API implementation

use serde::{Deserialize, Serialize};

use super::common::{CreatedResource, SearchResults};
use super::{ApiError, Client};

pub const CATEGORIES_PATH: &str = "/api/v1/categories";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub priority: i64,
}

pub struct CategoriesApi<'a> {
    client: &'a Client,
}

impl<'a> CategoriesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/categories/{id}
    pub async fn get(&self, id: i64) -> Result<Category, ApiError> {
        self.client
            .get(&format!("{}/{}", CATEGORIES_PATH, id))
            .await
    }

    /// GET /api/v1/categories?filter=name=="{name}"
    /// Returns None when no category has this exact name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError> {
        let filter = format!("name==\"{}\"", name.replace('"', "\\\""));
        let results: SearchResults<Category> = self
            .client
            .get_with_query(
                CATEGORIES_PATH,
                &[("page", "0"), ("page-size", "100"), ("filter", filter.as_str())],
            )
            .await?;

        Ok(results.results.into_iter().find(|c| c.name == name))
    }

    /// POST /api/v1/categories
    pub async fn create(&self, category: &Category) -> Result<CreatedResource, ApiError> {
        self.client.post(CATEGORIES_PATH, category).await
    }

    /// PUT /api/v1/categories/{id}
    pub async fn update(&self, id: i64, category: &Category) -> Result<Category, ApiError> {
        self.client
            .put(&format!("{}/{}", CATEGORIES_PATH, id), category)
            .await
    }

    /// DELETE /api/v1/categories/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", CATEGORIES_PATH, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, mock_oauth_token};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn find_category_by_name() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let m = server
            .mock("GET", "/api/v1/categories")
            .match_query(Matcher::UrlEncoded(
                "filter".into(),
                "name==\"Printers\"".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"totalCount":1,"results":[{"id":"4","name":"Printers","priority":9}]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let category = client.categories().find_by_name("Printers").await.unwrap();

        assert_eq!(
            category,
            Some(Category {
                id: Some("4".to_string()),
                name: "Printers".to_string(),
                priority: 9,
            })
        );
        m.assert_async().await;
    }

    #[tokio::test]
    async fn find_category_by_name_without_match() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _m = server
            .mock("GET", "/api/v1/categories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"totalCount":0,"results":[]}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let category = client.categories().find_by_name("Missing").await.unwrap();

        assert!(category.is_none());
    }
}
