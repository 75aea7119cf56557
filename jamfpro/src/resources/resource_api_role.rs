//! API role resource implementation

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::api_roles::ApiRole;
use crate::api::Client;
use crate::error::Result;
use crate::models::api_role::{self, ApiRoleModel};
use crate::models::parse_identifier;

pub type ApiRoleResource = EntityResource<ApiRoleEntity>;

#[derive(Default)]
pub struct ApiRoleEntity;

#[async_trait]
impl JamfEntity for ApiRoleEntity {
    type Model = ApiRoleModel;

    const TYPE_NAME: &'static str = "jamfpro_api_role";
    const KIND: &'static str = api_role::KIND;

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages an API role in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .attribute(
                AttributeBuilder::new(
                    "privileges",
                    AttributeType::Set(Box::new(AttributeType::String)),
                )
                .description("The privileges granted to the API role")
                .required()
                .build(),
            )
            .build()
    }

    fn set_id(model: &mut ApiRoleModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &ApiRoleModel) -> Result<i64> {
        let created = client.api_roles().create(&ApiRole::from(model)).await?;
        Ok(parse_identifier(Self::KIND, "id", created.id.as_deref())?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<ApiRoleModel> {
        let role = client.api_roles().get(id).await?;
        Ok(ApiRoleModel::try_from(&role)?)
    }

    async fn update(&self, client: &Client, id: i64, model: &ApiRoleModel) -> Result<()> {
        client.api_roles().update(id, &ApiRole::from(model)).await?;
        Ok(())
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.api_roles().delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, mock_oauth_token};
    use crate::resources::test_support::configured;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tfplug::context::Context;
    use tfplug::resource::{CreateResourceRequest, Resource, ValidateResourceConfigRequest};
    use tfplug::types::DiagnosticsExt;

    #[tokio::test]
    async fn create_accepts_privileges_in_any_order() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _create = server
            .mock("POST", "/api/v1/api-roles")
            .match_body(Matcher::PartialJson(json!({"displayName": "Inventory reader"})))
            .with_status(200)
            .with_body(
                r#"{"id":"5","displayName":"Inventory reader",
                    "privileges":["Read Computers","Read Buildings"]}"#,
            )
            .create_async()
            .await;
        let _read = server
            .mock("GET", "/api/v1/api-roles/5")
            .with_status(200)
            .with_body(
                r#"{"id":"5","displayName":"Inventory reader",
                    "privileges":["Read Buildings","Read Computers"]}"#,
            )
            .create_async()
            .await;

        let resource = configured::<ApiRoleEntity>(create_test_client(&server.url()));
        let planned = json!({
            "id": null,
            "name": "Inventory reader",
            "privileges": ["Read Computers", "Read Buildings"]
        });
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_api_role".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                },
            )
            .await;

        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.new_state["id"], json!(5));
        assert_eq!(response.new_state["name"], json!("Inventory reader"));
    }

    #[tokio::test]
    async fn validate_requires_privileges() {
        let resource = ApiRoleResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_api_role".to_string(),
                    config: json!({"name": "Inventory reader"}),
                },
            )
            .await;

        assert!(response.diagnostics.has_errors());
        assert_eq!(
            response.diagnostics[0].attribute.as_ref().map(|p| p.to_string()),
            Some("privileges".to_string())
        );
    }
}
