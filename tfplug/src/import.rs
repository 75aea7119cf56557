//! Import helpers for simplifying resource import implementations

use crate::context::Context;
use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic};
use serde_json::{Map, Value};

/// Parses the import ID as an integer and sets it on the `id` attribute
///
/// `kind` is the human readable name of the object being imported and is
/// only used in the error message.
///
/// Example: ID "42" -> state.id = 42
pub fn import_state_passthrough_int_id(
    _ctx: &Context,
    kind: &str,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let id = match request.id.trim().parse::<i64>() {
        Ok(id) => id,
        Err(e) => {
            response.diagnostics.push(
                Diagnostic::error(
                    "Invalid import ID",
                    format!(
                        "{} ID must be an integer, got {:?}: {}",
                        kind, request.id, e
                    ),
                )
                .with_attribute(AttributePath::new("id")),
            );
            return;
        }
    };

    let mut state = Map::new();
    state.insert("id".to_string(), Value::from(id));

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state: Value::Object(state),
    });
}
