//! Terraform provider for Jamf Pro
//!
//! Every write is followed by a bounded poll that waits until Jamf Pro
//! serves back what was written, so later reads in the same apply see
//! consistent data.

pub mod api;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod models;
pub mod provider_data;
pub mod resources;

pub use error::Error;
pub use provider_data::JamfProProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory, ValidateProviderConfigRequest,
    ValidateProviderConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder, Validator};
use tfplug::types::{decode, Config, Diagnostic};

use config::{ProviderConfig, ResolvedConfig};
use data_sources::{CategoryDataSource, ComputerDataSource};
use resources::{
    ApiRoleResource, BuildingResource, CategoryResource, ComputerGroupResource, ComputerResource,
    DepartmentResource, SmartComputerGroupResource,
};

#[derive(Default)]
pub struct JamfProProvider {
    provider_data: Option<JamfProProviderData>,
}

impl JamfProProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider data from the last successful configure
    pub fn provider_data(&self) -> Option<&JamfProProviderData> {
        self.provider_data.as_ref()
    }

    fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages objects in a Jamf Pro instance")
            .attribute(
                AttributeBuilder::new("instance_url", AttributeType::String)
                    .description("Jamf Pro instance URL (env: JAMF_INSTANCE_URL)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_id", AttributeType::String)
                    .description("OAuth client ID (env: JAMF_CLIENT_ID)")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_secret", AttributeType::String)
                    .description("OAuth client secret (env: JAMF_CLIENT_SECRET)")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("username", AttributeType::String)
                    .description("Username for basic authentication (env: JAMF_USERNAME)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("password", AttributeType::String)
                    .description("Password for basic authentication (env: JAMF_PASSWORD)")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("propagation_timeout", AttributeType::Int64)
                    .description(
                        "Seconds to wait for a write to become visible (env: JAMF_PROPAGATION_TIMEOUT)",
                    )
                    .optional()
                    .validator(Validator::AtLeast(1))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("ordered_collections", AttributeType::Bool)
                    .description(
                        "Compare collections in order instead of as sets (env: JAMF_ORDERED_COLLECTIONS)",
                    )
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("session_cache", AttributeType::String)
                    .description(
                        "File caching the access token between runs, empty to disable (env: JAMF_SESSION_CACHE)",
                    )
                    .optional()
                    .build(),
            )
            .build()
    }

    fn decode_config(config: &Config) -> Result<ProviderConfig, Diagnostic> {
        if config.is_null() {
            return Ok(ProviderConfig::default());
        }
        decode(config).map_err(|e| {
            Diagnostic::error(
                "Invalid provider configuration",
                format!("Failed to decode provider configuration: {}", e),
            )
        })
    }

    fn build_provider_data(resolved: ResolvedConfig) -> Result<JamfProProviderData, Error> {
        let client_config = api::ClientConfig::new(resolved.instance_url, resolved.credentials)
            .with_session_cache(resolved.session_cache);
        let client = api::Client::new(client_config)?;

        let write_policy = provider_data::write_policy(resolved.propagation_timeout)?;

        Ok(JamfProProviderData::new(client)
            .with_write_policy(write_policy)
            .with_collection_order(resolved.collection_order))
    }
}

#[async_trait]
impl Provider for JamfProProvider {
    fn type_name(&self) -> &str {
        "jamfpro"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        let diagnostics = if request.config.is_null() {
            vec![]
        } else {
            Self::schema_static().validate_config(&request.config)
        };
        ValidateProviderConfigResponse { diagnostics }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        tfplug::logging::init();
        tracing::debug!(
            "Configuring provider for Terraform {}",
            request.terraform_version
        );

        let mut diagnostics = vec![];

        let provider_config = match Self::decode_config(&request.config) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
        };

        let provider_data = provider_config
            .resolve()
            .map_err(Error::from)
            .and_then(Self::build_provider_data);

        match provider_data {
            Ok(data) => {
                tracing::info!("Configured Jamf Pro provider for {}", data.client.base_url());
                self.provider_data = Some(data.clone());
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: Some(Arc::new(data)),
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to configure provider",
                    e.to_string(),
                ));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
        resources.insert(
            "jamfpro_building".to_string(),
            Box::new(|| Box::new(BuildingResource::new())),
        );
        resources.insert(
            "jamfpro_category".to_string(),
            Box::new(|| Box::new(CategoryResource::new())),
        );
        resources.insert(
            "jamfpro_department".to_string(),
            Box::new(|| Box::new(DepartmentResource::new())),
        );
        resources.insert(
            "jamfpro_computer".to_string(),
            Box::new(|| Box::new(ComputerResource::new())),
        );
        resources.insert(
            "jamfpro_api_role".to_string(),
            Box::new(|| Box::new(ApiRoleResource::new())),
        );
        resources.insert(
            "jamfpro_computergroup".to_string(),
            Box::new(|| Box::new(ComputerGroupResource::new())),
        );
        resources.insert(
            "jamfpro_smartcomputergroup".to_string(),
            Box::new(|| Box::new(SmartComputerGroupResource::new())),
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();
        data_sources.insert(
            "jamfpro_category".to_string(),
            Box::new(|| Box::new(CategoryDataSource::new())),
        );
        data_sources.insert(
            "jamfpro_computer".to_string(),
            Box::new(|| Box::new(ComputerDataSource::new())),
        );
        data_sources
    }
}
