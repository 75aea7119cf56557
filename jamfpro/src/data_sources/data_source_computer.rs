//! Computer data source implementation

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
use crate::models::computer::{self, ComputerModel};

#[derive(Default)]
pub struct ComputerDataSource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl ComputerDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Looks up a computer in Jamf Pro by ID or name")
            .attribute(
                AttributeBuilder::new("id", AttributeType::Int64)
                    .description("ID of the computer")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("Name of the computer")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("serial_number", AttributeType::String)
                    .description("Serial number of the computer")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("udid", AttributeType::String)
                    .description("Hardware UDID of the computer")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn lookup(
        &self,
        provider_data: &crate::JamfProProviderData,
        lookup: &Lookup,
    ) -> crate::error::Result<ComputerModel> {
        let computers = provider_data.client.computers();
        let general = match lookup {
            Lookup::Id(id) => computers.get(*id).await?,
            Lookup::Name(name) => computers.get_by_name(name).await?,
        };
        Ok(ComputerModel::try_from(&general)?)
    }
}

#[async_trait]
impl DataSource for ComputerDataSource {
    fn type_name(&self) -> &str {
        "jamfpro_computer"
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
        if let Err(diag) = Lookup::from_config(computer::KIND, &request.config) {
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

        let lookup = match Lookup::from_config(computer::KIND, &request.config) {
            Ok(lookup) => lookup,
            Err(diag) => return ReadDataSourceResponse::failed(diag),
        };

        tracing::debug!("Reading computer {}", lookup);
        match self.lookup(provider_data, &lookup).await {
            Ok(model) => match encode(&model) {
                Ok(state) => ReadDataSourceResponse::found(state),
                Err(e) => ReadDataSourceResponse::failed(Diagnostic::error(
                    "Failed to encode state",
                    e.to_string(),
                )),
            },
            Err(Error::Api(e)) if e.is_not_found() => ReadDataSourceResponse::failed(
                Diagnostic::error("Computer not found", format!("No computer {} exists", lookup)),
            ),
            Err(e) => ReadDataSourceResponse::failed(Diagnostic::error(
                "Client Error",
                format!("Unable to get computer {}, got error: {}", lookup, e),
            )),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for ComputerDataSource {
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
