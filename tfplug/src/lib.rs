//! tfplug - Terraform provider framework for Rust
//!
//! Provider, resource and data source traits, schema and diagnostics types,
//! and the reconcile machinery used to wait out eventual consistency of
//! remote APIs.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;
pub mod logging;
pub mod reconcile;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_int_id;
pub use logging::LogLevel;
pub use provider::{DataSourceFactory, Provider, ResourceFactory};
pub use reconcile::{reconcile, PollPolicy, ReconcileError, ReconcileOutcome};
pub use resource::{Resource, ResourceWithConfigure};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder, Validator};
pub use types::{AttributePath, Diagnostic, DiagnosticSeverity, DiagnosticsExt};
