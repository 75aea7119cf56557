//! Shared lifecycle of every Jamf Pro resource
//!
//! A resource kind only describes how to talk to its endpoint
//! ([`JamfEntity`]). [`EntityResource`] turns that into the Terraform
//! lifecycle: every write is followed by a reconcile poll so that the state
//! handed back to Terraform is one the API has actually made visible.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_int_id;
use tfplug::provider::provider_data;
use tfplug::reconcile::{reconcile, AnyObserved, ModelEquivalence, Reconcilable, ReconcileOutcome};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, UpdateResourceRequest,
    UpdateResourceResponse, ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::Schema;
use tfplug::types::{decode, encode, AttributePath, Diagnostic, State};

use crate::api::Client;
use crate::error::Result;
use crate::JamfProProviderData;

/// One Jamf Pro object kind and its endpoint calls
#[async_trait]
pub trait JamfEntity: Default + Send + Sync + 'static {
    type Model: Reconcilable
        + Serialize
        + DeserializeOwned
        + Default
        + Clone
        + Send
        + Sync
        + 'static;

    /// Terraform resource type name
    const TYPE_NAME: &'static str;
    /// Human readable kind used in diagnostics
    const KIND: &'static str;

    fn schema(&self) -> Schema;

    fn set_id(model: &mut Self::Model, id: i64);

    /// Creates the object and returns its ID
    async fn create(&self, client: &Client, model: &Self::Model) -> Result<i64>;

    async fn read(&self, client: &Client, id: i64) -> Result<Self::Model>;

    async fn update(&self, client: &Client, id: i64, model: &Self::Model) -> Result<()>;

    async fn delete(&self, client: &Client, id: i64) -> Result<()>;
}

/// Terraform resource backed by a [`JamfEntity`]
#[derive(Default)]
pub struct EntityResource<E: JamfEntity> {
    entity: E,
    provider_data: Option<JamfProProviderData>,
}

impl<E: JamfEntity> EntityResource<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource that is already configured
    pub fn with_provider_data(provider_data: JamfProProviderData) -> Self {
        Self {
            entity: E::default(),
            provider_data: Some(provider_data),
        }
    }

    fn not_configured() -> Diagnostic {
        Diagnostic::error(
            "Provider not configured",
            "Provider data was not properly configured",
        )
    }

    fn state_id(state: &State) -> Option<i64> {
        state.get("id").and_then(|id| id.as_i64())
    }

    fn missing_id() -> Diagnostic {
        Diagnostic::error(
            "Missing ID",
            format!("The {} state does not carry a numeric id", E::KIND),
        )
        .with_attribute(AttributePath::new("id"))
    }

    /// Single read mapped onto the poller's fetch contract
    async fn fetch(
        &self,
        client: &Client,
        id: i64,
    ) -> std::result::Result<Option<E::Model>, tfplug::ReconcileError> {
        match self.entity.read(client, id).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into_fetch_error()),
        }
    }

    /// Waits until the object reads back as `desired`
    async fn converge(
        &self,
        ctx: &Context,
        data: &JamfProProviderData,
        desired: &E::Model,
        id: i64,
    ) -> ReconcileOutcome<E::Model> {
        let equivalence = ModelEquivalence::new(data.collection_order);
        let client = &data.client;
        reconcile(
            ctx,
            desired,
            move || self.fetch(client, id),
            &equivalence,
            &data.write_policy,
        )
        .await
    }

    /// State and diagnostics after a write
    ///
    /// Anything but convergence is an error. The returned state still carries
    /// the ID so Terraform keeps tracking the object.
    fn finish_write(
        operation: &str,
        id: i64,
        desired: E::Model,
        outcome: ReconcileOutcome<E::Model>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> State {
        let detail = match &outcome {
            ReconcileOutcome::Converged(_) => None,
            ReconcileOutcome::NotFound => Some(format!(
                "{} {} was {}d but could not be read back before the propagation timeout",
                E::KIND,
                id,
                operation
            )),
            ReconcileOutcome::TimedOut(_) => Some(format!(
                "{} {} was {}d but did not reach the planned state before the propagation timeout",
                E::KIND,
                id,
                operation
            )),
            ReconcileOutcome::Failed(e) => Some(format!(
                "{} {} was {}d but reading it back failed: {}",
                E::KIND,
                id,
                operation,
                e
            )),
        };

        let model = match outcome {
            ReconcileOutcome::Converged(observed) => observed,
            ReconcileOutcome::TimedOut(Some(observed)) => observed,
            _ => desired,
        };

        if let Some(detail) = detail {
            tracing::warn!("{}", detail);
            diagnostics.push(Diagnostic::error(
                format!("Failed to {} {}", operation, E::KIND),
                detail,
            ));
        }

        Self::encode_state(&model, diagnostics)
    }

    fn encode_state(model: &E::Model, diagnostics: &mut Vec<Diagnostic>) -> State {
        match encode(model) {
            Ok(state) => state,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to encode state",
                    format!("{} state could not be encoded: {}", E::KIND, e),
                ));
                State::Null
            }
        }
    }
}

#[async_trait]
impl<E: JamfEntity> Resource for EntityResource<E> {
    fn type_name(&self) -> &str {
        E::TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: self.entity.schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: self.entity.schema().validate_config(&request.config),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let Some(data) = &self.provider_data else {
            diagnostics.push(Self::not_configured());
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        };

        let mut planned: E::Model = match decode(&request.planned_state) {
            Ok(model) => model,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Invalid plan",
                    format!("Failed to decode planned {}: {}", E::KIND, e),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        tracing::trace!("Creating {}", E::KIND);
        let id = match self.entity.create(&data.client, &planned).await {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Failed to create {}", E::KIND),
                    format!("API error: {}", e),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };
        tracing::debug!("Created {} {}, waiting for it to propagate", E::KIND, id);

        E::set_id(&mut planned, id);
        let outcome = self.converge(&ctx, data, &planned, id).await;
        let new_state = Self::finish_write("create", id, planned, outcome, &mut diagnostics);

        CreateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let Some(data) = &self.provider_data else {
            diagnostics.push(Self::not_configured());
            return ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics,
            };
        };

        let Some(id) = Self::state_id(&request.current_state) else {
            diagnostics.push(Self::missing_id());
            return ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics,
            };
        };

        let client = &data.client;
        let outcome = reconcile(
            &ctx,
            &E::Model::default(),
            move || self.fetch(client, id),
            &AnyObserved,
            &data.read_policy,
        )
        .await;

        match outcome {
            ReconcileOutcome::Converged(observed) => ReadResourceResponse {
                new_state: Some(Self::encode_state(&observed, &mut diagnostics)),
                diagnostics,
            },
            ReconcileOutcome::NotFound => {
                tracing::debug!("{} {} no longer exists, removing from state", E::KIND, id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
            ReconcileOutcome::TimedOut(_) => {
                diagnostics.push(Diagnostic::error(
                    format!("Failed to read {}", E::KIND),
                    format!("{} {} could not be read before the poll budget ran out", E::KIND, id),
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                }
            }
            ReconcileOutcome::Failed(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Failed to read {}", E::KIND),
                    format!("{} {}: {}", E::KIND, id, e),
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                }
            }
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let Some(data) = &self.provider_data else {
            diagnostics.push(Self::not_configured());
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        };

        let Some(id) = Self::state_id(&request.prior_state) else {
            diagnostics.push(Self::missing_id());
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        };

        let mut planned: E::Model = match decode(&request.planned_state) {
            Ok(model) => model,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Invalid plan",
                    format!("Failed to decode planned {}: {}", E::KIND, e),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics,
                };
            }
        };
        E::set_id(&mut planned, id);

        tracing::trace!("Updating {} {}", E::KIND, id);
        if let Err(e) = self.entity.update(&data.client, id, &planned).await {
            diagnostics.push(Diagnostic::error(
                format!("Failed to update {}", E::KIND),
                format!("API error: {}", e),
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            };
        }

        let outcome = self.converge(&ctx, data, &planned, id).await;
        let new_state = Self::finish_write("update", id, planned, outcome, &mut diagnostics);

        UpdateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let Some(data) = &self.provider_data else {
            diagnostics.push(Self::not_configured());
            return DeleteResourceResponse { diagnostics };
        };

        let Some(id) = Self::state_id(&request.prior_state) else {
            // Nothing was ever created
            return DeleteResourceResponse { diagnostics };
        };

        match self.entity.delete(&data.client, id).await {
            Ok(()) => tracing::debug!("Deleted {} {}", E::KIND, id),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} {} was already deleted", E::KIND, id)
            }
            Err(e) => diagnostics.push(Diagnostic::error(
                format!("Failed to delete {}", E::KIND),
                format!("API error: {}", e),
            )),
        }

        DeleteResourceResponse { diagnostics }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        let kind = format!("Jamf Pro {}", E::KIND);
        import_state_passthrough_int_id(&ctx, &kind, &request, &mut response);
        response
    }
}

#[async_trait]
impl<E: JamfEntity> ResourceWithConfigure for EntityResource<E> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let diagnostics = match provider_data::<JamfProProviderData>(request.provider_data.as_ref())
        {
            Ok(data) => {
                self.provider_data = Some(data);
                vec![]
            }
            Err(e) => vec![Diagnostic::error("Invalid provider data", e.to_string())],
        };

        ConfigureResourceResponse { diagnostics }
    }
}
