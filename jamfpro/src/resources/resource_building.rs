//! Building resource implementation

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::buildings::Building;
use crate::api::Client;
use crate::error::Result;
use crate::models::building::{self, BuildingModel};
use crate::models::parse_identifier;

pub type BuildingResource = EntityResource<BuildingEntity>;

#[derive(Default)]
pub struct BuildingEntity;

fn address_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .optional()
        .build()
}

#[async_trait]
impl JamfEntity for BuildingEntity {
    type Model = BuildingModel;

    const TYPE_NAME: &'static str = "jamfpro_building";
    const KIND: &'static str = building::KIND;

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a building in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .attribute(address_attribute(
                "street_address1",
                "The first line of the street address",
            ))
            .attribute(address_attribute(
                "street_address2",
                "The second line of the street address",
            ))
            .attribute(address_attribute("city", "The city"))
            .attribute(address_attribute("state_province", "The state or province"))
            .attribute(address_attribute("zip_postal_code", "The ZIP or postal code"))
            .attribute(address_attribute("country", "The country"))
            .build()
    }

    fn set_id(model: &mut BuildingModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &BuildingModel) -> Result<i64> {
        let created = client.buildings().create(&Building::from(model)).await?;
        Ok(parse_identifier(Self::KIND, "id", Some(&created.id))?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<BuildingModel> {
        let building = client.buildings().get(id).await?;
        Ok(BuildingModel::try_from(&building)?)
    }

    async fn update(&self, client: &Client, id: i64, model: &BuildingModel) -> Result<()> {
        client.buildings().update(id, &Building::from(model)).await?;
        Ok(())
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.buildings().delete(id).await?)
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
    use tfplug::resource::{
        CreateResourceRequest, DeleteResourceRequest, ImportResourceStateRequest,
        ReadResourceRequest, Resource, ResourceSchemaRequest, UpdateResourceRequest,
    };
    use tfplug::types::DiagnosticsExt;

    fn planned() -> serde_json::Value {
        json!({
            "id": null,
            "name": "Apple Park",
            "street_address1": "1 Apple Park Way",
            "street_address2": null,
            "city": "Cupertino",
            "state_province": null,
            "zip_postal_code": null,
            "country": null
        })
    }

    #[tokio::test]
    async fn schema_marks_id_computed_and_name_required() {
        let resource = BuildingResource::new();
        let schema = resource
            .schema(Context::new(), ResourceSchemaRequest)
            .await
            .schema;

        assert!(schema.attribute("id").unwrap().computed);
        assert!(schema.attribute("name").unwrap().required);
        assert!(schema.attribute("city").unwrap().optional);
        assert_eq!(resource.type_name(), "jamfpro_building");
    }

    #[tokio::test]
    async fn create_waits_until_building_is_visible() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let create = server
            .mock("POST", "/api/v1/buildings")
            .match_body(Matcher::PartialJson(json!({
                "name": "Apple Park",
                "city": "Cupertino"
            })))
            .with_status(201)
            .with_body(r#"{"id":"3","href":"/api/v1/buildings/3"}"#)
            .expect(1)
            .create_async()
            .await;
        let missing = server
            .mock("GET", "/api/v1/buildings/3")
            .with_status(404)
            .with_body(r#"{"httpStatus":404}"#)
            .expect(1)
            .create_async()
            .await;

        let _visible = server
            .mock("GET", "/api/v1/buildings/3")
            .with_status(200)
            .with_body(
                r#"{"id":"3","name":"Apple Park","streetAddress1":"1 Apple Park Way",
                    "streetAddress2":"","city":"Cupertino","stateProvince":"",
                    "zipPostalCode":"","country":""}"#,
            )
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    planned_state: planned(),
                    config: planned(),
                },
            )
            .await;

        create.assert_async().await;
        missing.assert_async().await;
        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.new_state["id"], json!(3));
        assert_eq!(response.new_state["city"], json!("Cupertino"));
        assert_eq!(response.new_state["street_address2"], json!(null));
    }

    #[tokio::test]
    async fn create_reports_timeout_but_keeps_id() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _create = server
            .mock("POST", "/api/v1/buildings")
            .with_status(201)
            .with_body(r#"{"id":"4","href":"/api/v1/buildings/4"}"#)
            .create_async()
            .await;
        let _stale = server
            .mock("GET", "/api/v1/buildings/4")
            .with_status(200)
            .with_body(r#"{"id":"4","name":"Old name"}"#)
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    planned_state: planned(),
                    config: planned(),
                },
            )
            .await;

        assert!(response.diagnostics.has_errors());
        assert_eq!(response.diagnostics[0].summary, "Failed to create building");
        assert_eq!(response.new_state["id"], json!(4));
    }

    #[tokio::test]
    async fn create_failure_is_a_diagnostic() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _create = server
            .mock("POST", "/api/v1/buildings")
            .with_status(400)
            .with_body(r#"{"errors":[{"description":"name already in use"}]}"#)
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    planned_state: planned(),
                    config: planned(),
                },
            )
            .await;

        assert!(response.diagnostics.has_errors());
        assert!(response.diagnostics[0].detail.contains("API error"));
    }

    #[tokio::test]
    async fn read_removes_deleted_building_from_state() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _missing = server
            .mock("GET", "/api/v1/buildings/9")
            .with_status(404)
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    current_state: json!({"id": 9, "name": "Gone"}),
                },
            )
            .await;

        assert!(response.new_state.is_none());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn read_after_import_fills_state() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _found = server
            .mock("GET", "/api/v1/buildings/3")
            .with_status(200)
            .with_body(r#"{"id":"3","name":"Apple Park","city":"Cupertino"}"#)
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let imported = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "jamfpro_building".to_string(),
                    id: "3".to_string(),
                },
            )
            .await;
        let state = imported.imported_resources[0].state.clone();

        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    current_state: state,
                },
            )
            .await;

        let state = response.new_state.unwrap();
        assert_eq!(state["name"], json!("Apple Park"));
        assert_eq!(state["city"], json!("Cupertino"));
    }

    #[tokio::test]
    async fn import_rejects_non_numeric_id() {
        let resource = BuildingResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "jamfpro_building".to_string(),
                    id: "apple-park".to_string(),
                },
            )
            .await;

        assert!(response.imported_resources.is_empty());
        assert!(response.diagnostics[0]
            .detail
            .contains("Jamf Pro building ID must be an integer"));
    }

    #[tokio::test]
    async fn update_puts_and_reconciles() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let update = server
            .mock("PUT", "/api/v1/buildings/3")
            .match_body(Matcher::PartialJson(json!({"name": "Apple Park"})))
            .with_status(200)
            .with_body(r#"{"id":"3","name":"Apple Park","city":"Cupertino"}"#)
            .expect(1)
            .create_async()
            .await;
        let _read = server
            .mock("GET", "/api/v1/buildings/3")
            .with_status(200)
            .with_body(r#"{"id":"3","name":"Apple Park","streetAddress1":"1 Apple Park Way","city":"Cupertino"}"#)
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    prior_state: json!({"id": 3, "name": "HQ"}),
                    planned_state: planned(),
                    config: planned(),
                },
            )
            .await;

        update.assert_async().await;
        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.new_state["id"], json!(3));
    }

    #[tokio::test]
    async fn update_clears_removed_city() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let update = server
            .mock("PUT", "/api/v1/buildings/3")
            .match_body(Matcher::PartialJson(json!({"name": "Apple Park", "city": ""})))
            .with_status(200)
            .with_body(r#"{"id":"3","name":"Apple Park","city":""}"#)
            .expect(1)
            .create_async()
            .await;
        let stale = server
            .mock("GET", "/api/v1/buildings/3")
            .with_status(200)
            .with_body(r#"{"id":"3","name":"Apple Park","city":"Austin"}"#)
            .expect(1)
            .create_async()
            .await;
        let _cleared = server
            .mock("GET", "/api/v1/buildings/3")
            .with_status(200)
            .with_body(r#"{"id":"3","name":"Apple Park","city":""}"#)
            .create_async()
            .await;

        let planned = json!({"id": 3, "name": "Apple Park", "city": null});
        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    prior_state: json!({"id": 3, "name": "Apple Park", "city": "Austin"}),
                    planned_state: planned.clone(),
                    config: planned,
                },
            )
            .await;

        update.assert_async().await;
        stale.assert_async().await;
        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.new_state["city"], json!(null));
    }

    #[tokio::test]
    async fn delete_treats_404_as_deleted() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _gone = server
            .mock("DELETE", "/api/v1/buildings/3")
            .with_status(404)
            .create_async()
            .await;

        let resource = configured::<BuildingEntity>(create_test_client(&server.url()));
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    prior_state: json!({"id": 3, "name": "Apple Park"}),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_resource_reports_error() {
        let resource = BuildingResource::new();
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_building".to_string(),
                    planned_state: planned(),
                    config: planned(),
                },
            )
            .await;

        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
    }
}
