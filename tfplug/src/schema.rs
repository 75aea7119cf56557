//! Schema types and builders for tfplug
//!
//! This module provides the schema system for defining provider, resource and
//! data source schemas, and validates configuration objects against them.

use crate::types::{AttributePath, Diagnostic};
use serde_json::Value;

/// AttributeType defines the subset of Terraform's type system used by
/// providers built on tfplug
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Int64,
    Bool,
    /// Unordered collection of primitive values
    Set(Box<AttributeType>),
    /// Unordered collection of objects with the given attributes
    SetNested(Vec<Attribute>),
}

impl AttributeType {
    fn type_name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Int64 => "number",
            AttributeType::Bool => "bool",
            AttributeType::Set(_) => "set",
            AttributeType::SetNested(_) => "set of objects",
        }
    }
}

/// Validators applied to configured (non-null) values
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// String value must be one of the listed values
    OneOf(Vec<&'static str>),
    /// Integer value must be greater than or equal to the bound
    AtLeast(i64),
}

impl Validator {
    fn validate(&self, value: &Value, path: &AttributePath) -> Option<Diagnostic> {
        match self {
            Validator::OneOf(allowed) => {
                let s = value.as_str()?;
                if allowed.contains(&s) {
                    return None;
                }
                Some(
                    Diagnostic::error(
                        "Invalid attribute value",
                        format!(
                            "Attribute {} value must be one of: {:?}, got: {:?}",
                            path, allowed, s
                        ),
                    )
                    .with_attribute(path.clone()),
                )
            }
            Validator::AtLeast(min) => {
                let n = value.as_i64()?;
                if n >= *min {
                    return None;
                }
                Some(
                    Diagnostic::error(
                        "Invalid attribute value",
                        format!("Attribute {} value must be at least {}, got: {}", path, min, n),
                    )
                    .with_attribute(path.clone()),
                )
            }
        }
    }
}

/// Schema is returned by providers/resources/data sources
/// Version is used for state migration
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub version: i64,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Validates a configuration object against this schema
    pub fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = vec![];

        match config {
            Value::Object(_) => {
                validate_attributes(&self.attributes, config, &AttributePath::root(), &mut diagnostics)
            }
            Value::Null => diagnostics.push(Diagnostic::error(
                "Missing configuration",
                "No configuration values were provided",
            )),
            _ => diagnostics.push(Diagnostic::error(
                "Invalid configuration",
                "Configuration must be an object",
            )),
        }

        diagnostics
    }
}

fn validate_attributes(
    attributes: &[Attribute],
    object: &Value,
    parent: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for attr in attributes {
        let path = parent.clone().attribute(&attr.name);
        match object.get(&attr.name) {
            None | Some(Value::Null) => {
                if attr.required {
                    diagnostics.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!("The argument \"{}\" is required", path),
                        )
                        .with_attribute(path),
                    );
                }
            }
            Some(value) => {
                if !attr.required && !attr.optional {
                    diagnostics.push(
                        Diagnostic::error(
                            "Invalid configuration",
                            format!("Attribute {} is computed and cannot be set", path),
                        )
                        .with_attribute(path),
                    );
                    continue;
                }
                validate_value(attr, &attr.r#type, value, &path, diagnostics);
            }
        }
    }
}

fn validate_value(
    attr: &Attribute,
    attr_type: &AttributeType,
    value: &Value,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let matches = match attr_type {
        AttributeType::String => value.is_string(),
        AttributeType::Int64 => value.is_i64(),
        AttributeType::Bool => value.is_boolean(),
        AttributeType::Set(_) | AttributeType::SetNested(_) => value.is_array(),
    };

    if !matches {
        diagnostics.push(
            Diagnostic::error(
                "Incorrect attribute value type",
                format!("Attribute {} must be a {}", path, attr_type.type_name()),
            )
            .with_attribute(path.clone()),
        );
        return;
    }

    match (attr_type, value) {
        (AttributeType::Set(element), Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                validate_value(attr, element, item, &path.clone().index(idx), diagnostics);
            }
        }
        (AttributeType::SetNested(nested), Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                let element_path = path.clone().index(idx);
                if !item.is_object() {
                    diagnostics.push(
                        Diagnostic::error(
                            "Incorrect attribute value type",
                            format!("Element {} must be an object", element_path),
                        )
                        .with_attribute(element_path),
                    );
                    continue;
                }
                validate_attributes(nested, item, &element_path, diagnostics);
            }
        }
        _ => {
            diagnostics.extend(
                attr.validators
                    .iter()
                    .filter_map(|validator| validator.validate(value, path)),
            );
        }
    }
}

/// Attribute represents a single configuration attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub validators: Vec<Validator>,
}

/// AttributeBuilder provides fluent API for building attributes
/// ALWAYS use this instead of constructing Attribute directly
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    /// Create a new attribute builder
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                validators: Vec::new(),
            },
        }
    }

    /// Set description
    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    /// Mark as computed
    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive (hidden)
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    /// Add validator
    pub fn validator(mut self, validator: Validator) -> Self {
        self.attribute.validators.push(validator);
        self
    }

    /// Finalize the attribute
    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                description: String::new(),
                attributes: Vec::new(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.attributes.push(attr);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = desc.to_string();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
