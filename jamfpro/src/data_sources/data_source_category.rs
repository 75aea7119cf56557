//! Category data source implementation

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::provider::provider_data;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{encode, Diagnostic};

use super::Lookup;
use crate::error::Error;
use crate::models::category::{self, CategoryModel};

#[derive(Default)]
pub struct CategoryDataSource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl CategoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Looks up a category in Jamf Pro by ID or name")
            .attribute(
                AttributeBuilder::new("id", AttributeType::Int64)
                    .description("ID of the category")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Name of the category")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("priority", AttributeType::Int64)
                    .description("Priority of the category")
                    .computed()
                    .build(),
            )
            .build()
    }
}

#[async_trait]
impl DataSource for CategoryDataSource {
    fn type_name(&self) -> &str {
        "jamfpro_category"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        let mut diagnostics = Self::schema_static().validate_config(&request.config);
        if let Err(diag) = Lookup::from_config(category::KIND, &request.config) {
            diagnostics.push(diag);
        }
        ValidateDataSourceConfigResponse { diagnostics }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return ReadDataSourceResponse::failed(Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            ));
        };

        let lookup = match Lookup::from_config(category::KIND, &request.config) {
            Ok(lookup) => lookup,
            Err(diag) => return ReadDataSourceResponse::failed(diag),
        };

        tracing::debug!("Reading category {}", lookup);
        let categories = provider_data.client.categories();
        let found = match &lookup {
            Lookup::Id(id) => categories.get(*id).await.map(Some),
            Lookup::Name(name) => categories.find_by_name(name).await,
        };

        let model = match found {
            Ok(Some(category)) => CategoryModel::try_from(&category).map_err(Error::from),
            Ok(None) => {
                return ReadDataSourceResponse::failed(Diagnostic::error(
                    "Category not found",
                    format!("No category {} exists", lookup),
                ))
            }
            Err(e) => Err(Error::from(e)),
        };

        match model {
            Ok(model) => match encode(&model) {
                Ok(state) => ReadDataSourceResponse::found(state),
                Err(e) => ReadDataSourceResponse::failed(Diagnostic::error(
                    "Failed to encode state",
                    e.to_string(),
                )),
            },
            Err(e) => ReadDataSourceResponse::failed(Diagnostic::error(
                "Client Error",
                format!("Unable to get category {}, got error: {}", lookup, e),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for CategoryDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let diagnostics = match provider_data::<crate::JamfProProviderData>(request.provider_data.as_ref())
        {
            Ok(data) => {
                self.provider_data = Some(data);
                vec![]
            }
            Err(e) => vec![Diagnostic::error("Invalid provider data", e.to_string())],
        };

        ConfigureDataSourceResponse { diagnostics }
    }
}
