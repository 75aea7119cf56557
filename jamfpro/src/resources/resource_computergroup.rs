//! Static computer group resource implementation

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::computer_groups::ComputerGroupRequest;
use crate::api::Client;
use crate::error::Result;
use crate::models::computer_group::{self, ComputerGroupModel};

pub type ComputerGroupResource = EntityResource<ComputerGroupEntity>;

#[derive(Default)]
pub struct ComputerGroupEntity;

#[async_trait]
impl JamfEntity for ComputerGroupEntity {
    type Model = ComputerGroupModel;

    const TYPE_NAME: &'static str = "jamfpro_computergroup";
    const KIND: &'static str = computer_group::KIND;

    fn schema(&self) -> Schema {
        let member = vec![
            AttributeBuilder::new("id", AttributeType::Int64)
                .description("ID of the computer")
                .required()
                .build(),
            AttributeBuilder::new("name", AttributeType::String)
                .description("Name of the computer")
                .optional()
                .computed()
                .build(),
            AttributeBuilder::new("serial_number", AttributeType::String)
                .description("Serial number of the computer")
                .optional()
                .computed()
                .build(),
        ];

        SchemaBuilder::new()
            .version(0)
            .description("Manages a static computer group in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .attribute(
                AttributeBuilder::new("computers", AttributeType::SetNested(member))
                    .description("Computers that are members of the static group")
                    .required()
                    .build(),
            )
            .build()
    }

    fn set_id(model: &mut ComputerGroupModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &ComputerGroupModel) -> Result<i64> {
        Ok(client
            .computer_groups()
            .create(&ComputerGroupRequest::from(model))
            .await?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<ComputerGroupModel> {
        let group = client.computer_groups().get(id).await?;
        Ok(ComputerGroupModel::try_from(&group)?)
    }

    async fn update(&self, client: &Client, id: i64, model: &ComputerGroupModel) -> Result<()> {
        Ok(client
            .computer_groups()
            .update(id, &ComputerGroupRequest::from(model))
            .await?)
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.computer_groups().delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tfplug::context::Context;
    use tfplug::resource::{Resource, ValidateResourceConfigRequest};
    use tfplug::types::DiagnosticsExt;

    #[tokio::test]
    async fn validate_requires_member_ids() {
        let resource = ComputerGroupResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_computergroup".to_string(),
                    config: json!({
                        "name": "Loaners",
                        "computers": [{"id": 3}, {"name": "mac-8"}]
                    }),
                },
            )
            .await;

        assert!(response.diagnostics.has_errors());
        assert_eq!(
            response.diagnostics[0].attribute.as_ref().map(|p| p.to_string()),
            Some("computers[1].id".to_string())
        );
    }
}
