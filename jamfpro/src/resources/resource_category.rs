//! Category resource implementation

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::categories::Category;
use crate::api::Client;
use crate::error::Result;
use crate::models::category::{self, CategoryModel};
use crate::models::parse_identifier;

pub type CategoryResource = EntityResource<CategoryEntity>;

#[derive(Default)]
pub struct CategoryEntity;

#[async_trait]
impl JamfEntity for CategoryEntity {
    type Model = CategoryModel;

    const TYPE_NAME: &'static str = "jamfpro_category";
    const KIND: &'static str = category::KIND;

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a category in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .attribute(
                AttributeBuilder::new("priority", AttributeType::Int64)
                    .description("The category priority, sent as 0 when unset")
                    .optional()
                    .computed()
                    .build(),
            )
            .build()
    }

    fn set_id(model: &mut CategoryModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &CategoryModel) -> Result<i64> {
        let created = client.categories().create(&Category::from(model)).await?;
        Ok(parse_identifier(Self::KIND, "id", Some(&created.id))?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<CategoryModel> {
        let category = client.categories().get(id).await?;
        Ok(CategoryModel::try_from(&category)?)
    }

    async fn update(&self, client: &Client, id: i64, model: &CategoryModel) -> Result<()> {
        client.categories().update(id, &Category::from(model)).await?;
        Ok(())
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.categories().delete(id).await?)
    }
}
