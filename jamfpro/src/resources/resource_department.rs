//! Department resource implementation

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};

use super::entity::{EntityResource, JamfEntity};
use super::{id_attribute, name_attribute};
use crate::api::departments::Department;
use crate::api::Client;
use crate::error::Result;
use crate::models::department::{self, DepartmentModel};
use crate::models::parse_identifier;

pub type DepartmentResource = EntityResource<DepartmentEntity>;

#[derive(Default)]
pub struct DepartmentEntity;

#[async_trait]
impl JamfEntity for DepartmentEntity {
    type Model = DepartmentModel;

    const TYPE_NAME: &'static str = "jamfpro_department";
    const KIND: &'static str = department::KIND;

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a department in Jamf Pro")
            .attribute(id_attribute(Self::KIND))
            .attribute(name_attribute(Self::KIND))
            .build()
    }

    fn set_id(model: &mut DepartmentModel, id: i64) {
        model.id = Some(id);
    }

    async fn create(&self, client: &Client, model: &DepartmentModel) -> Result<i64> {
        let created = client
            .departments()
            .create(&Department::from(model))
            .await?;
        Ok(parse_identifier(Self::KIND, "id", Some(&created.id))?)
    }

    async fn read(&self, client: &Client, id: i64) -> Result<DepartmentModel> {
        let department = client.departments().get(id).await?;
        Ok(DepartmentModel::try_from(&department)?)
    }

    async fn update(&self, client: &Client, id: i64, model: &DepartmentModel) -> Result<()> {
        client
            .departments()
            .update(id, &Department::from(model))
            .await?;
        Ok(())
    }

    async fn delete(&self, client: &Client, id: i64) -> Result<()> {
        Ok(client.departments().delete(id).await?)
    }
}
