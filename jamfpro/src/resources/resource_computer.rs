//! Computer resource implementation
//!
//! Computer records are normally created by enrollment. The resource exists
//! mostly so the computer data source and static groups have something to
//! point at.

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::computers::ComputerRequest;
use crate::api::Client;
use crate::error::Result;
use crate::models::computer::{self, ComputerModel};

pub type ComputerResource = EntityResource<ComputerEntity>;

#[derive(Default)]
pub struct ComputerEntity;

#[async_trait]
impl JamfEntity for ComputerEntity {
    type Model = ComputerModel;

    const TYPE_NAME: &'static str = "jamfpro_computer";
    const KIND: &'static str = computer::KIND;

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a computer record in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .attribute(
                AttributeBuilder::new("serial_number", AttributeType::String)
                    .description("The serial number of the computer")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("udid", AttributeType::String)
                    .description("The hardware UDID of the computer")
                    .optional()
                    .computed()
                    .build(),
            )
            .build()
    }

    fn set_id(model: &mut ComputerModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &ComputerModel) -> Result<i64> {
        Ok(client
            .computers()
            .create(&ComputerRequest::from(model))
            .await?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<ComputerModel> {
        let general = client.computers().get(id).await?;
        Ok(ComputerModel::try_from(&general)?)
    }

    async fn update(&self, client: &Client, id: i64, model: &ComputerModel) -> Result<()> {
        Ok(client
            .computers()
            .update(id, &ComputerRequest::from(model))
            .await?)
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.computers().delete(id).await?)
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
    use tfplug::resource::{CreateResourceRequest, Resource};
    use tfplug::types::DiagnosticsExt;

    #[tokio::test]
    async fn create_posts_xml_and_fills_computed_fields() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let create = server
            .mock("POST", "/JSSResource/computers/id/0")
            .match_header("content-type", Matcher::Regex("xml".to_string()))
            .match_body(Matcher::Regex("<name>mac-01</name>".to_string()))
            .with_status(201)
            .with_body("<computer><id>21</id></computer>")
            .create_async()
            .await;
        let _read = server
            .mock("GET", "/JSSResource/computers/id/21")
            .with_status(200)
            .with_body(
                r#"{"computer":{"general":{"id":21,"name":"mac-01",
                    "serial_number":"C02ABC","udid":"5A1E-77"}}}"#,
            )
            .create_async()
            .await;

        let resource = configured::<ComputerEntity>(create_test_client(&server.url()));
        let planned = json!({"id": null, "name": "mac-01", "serial_number": null, "udid": null});
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_computer".to_string(),
                    planned_state: planned.clone(),
                    config: planned,
                },
            )
            .await;

        create.assert_async().await;
        assert!(!response.diagnostics.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(
            response.new_state,
            json!({"id": 21, "name": "mac-01", "serial_number": "C02ABC", "udid": "5A1E-77"})
        );
    }
}
