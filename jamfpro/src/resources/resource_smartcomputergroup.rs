//! Smart computer group resource implementation

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder, Validator};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::computer_groups::ComputerGroupRequest;
use crate::api::Client;
use crate::error::Result;
use crate::models::smart_computer_group::{self, SmartComputerGroupModel};

pub type SmartComputerGroupResource = EntityResource<SmartComputerGroupEntity>;

#[derive(Default)]
pub struct SmartComputerGroupEntity;

fn criterion_attributes() -> Vec<tfplug::schema::Attribute> {
    vec![
        AttributeBuilder::new("name", AttributeType::String)
            .description("The name of the criterion to check against")
            .required()
            .build(),
        AttributeBuilder::new("priority", AttributeType::Int64)
            .description("Position of this criterion in the order of criteria")
            .optional()
            .computed()
            .validator(Validator::AtLeast(0))
            .build(),
        AttributeBuilder::new("and_or", AttributeType::String)
            .description("Whether this criterion is AND or ORed with the previous one")
            .optional()
            .computed()
            .validator(Validator::OneOf(vec!["and", "or"]))
            .build(),
        AttributeBuilder::new("search_type", AttributeType::String)
            .description("Operator relating the name and value fields")
            .optional()
            .computed()
            .validator(Validator::OneOf(vec!["is", "is not", "has", "does not have"]))
            .build(),
        AttributeBuilder::new("value", AttributeType::String)
            .description("The value the name criterion is checked against")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("opening_paren", AttributeType::Bool)
            .description("Whether this criterion opens a parenthesis")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("closing_paren", AttributeType::Bool)
            .description("Whether this criterion closes a parenthesis")
            .optional()
            .computed()
            .build(),
    ]
}

#[async_trait]
impl JamfEntity for SmartComputerGroupEntity {
    type Model = SmartComputerGroupModel;

    const TYPE_NAME: &'static str = "jamfpro_smartcomputergroup";
    const KIND: &'static str = smart_computer_group::KIND;

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a smart computer group in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .attribute(
                AttributeBuilder::new("criteria", AttributeType::SetNested(criterion_attributes()))
                    .description("Criteria by which members of the smart group are selected")
                    .required()
                    .build(),
            )
            .build()
    }

    fn set_id(model: &mut SmartComputerGroupModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &SmartComputerGroupModel) -> Result<i64> {
        Ok(client
            .computer_groups()
            .create(&ComputerGroupRequest::from(model))
            .await?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<SmartComputerGroupModel> {
        let group = client.computer_groups().get(id).await?;
        Ok(SmartComputerGroupModel::try_from(&group)?)
    }

    async fn update(
        &self,
        client: &Client,
        id: i64,
        model: &SmartComputerGroupModel,
    ) -> Result<()> {
        Ok(client
            .computer_groups()
            .update(id, &ComputerGroupRequest::from(model))
            .await?)
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.computer_groups().delete(id).await?)
    }
}
