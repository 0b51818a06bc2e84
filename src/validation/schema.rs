//! JSON Schema validation
//!
//! Validates JSON model content against a compiled JSON Schema and turns every
//! violation into a [`ValidationError`].
//!
//! A sub-schema may carry a `message` map next to its keywords. When a keyword
//! of that sub-schema is violated, the matching entry becomes the error
//! description:
//!
//! ```json
//! { "type": "string", "message": { "type": "Mismatch value type - {{name}}({{id}})" } }
//! ```
//!
//! `{{name}}` and `{{id}}` are read from the validated document, next to the
//! violating value.

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Draft, Validator};
use serde_json::Value;
use tracing::debug;

use super::{SyntacticError, ValidationError, distinct};

/// Schema for extensions of model types without a dedicated one
pub const MODEL_EXTENSIONS_SCHEMA: &str = include_str!("../../schemas/model-extensions-schema.json");
/// Schema for process extensions
pub const PROCESS_EXTENSIONS_SCHEMA: &str =
    include_str!("../../schemas/process-extensions-schema.json");
/// Schema for connector content
pub const CONNECTOR_SCHEMA: &str = include_str!("../../schemas/connector-schema.json");

const MESSAGE_KEY: &str = "message";
const PLACEHOLDERS: [(&str, &str); 2] = [("{{name}}", "name"), ("{{id}}", "id")];

/// Error while loading a schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("Failed to load {name} schema: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to compile {name} schema: {reason}")]
    Compile { name: String, reason: String },
}

/// A compiled JSON Schema together with its definition
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    definition: Value,
    validator: Validator,
}

impl Schema {
    /// Compile a schema definition
    pub fn new(name: impl Into<String>, definition: Value) -> Result<Self, SchemaLoadError> {
        let name = name.into();
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(&definition)
            .map_err(|e| SchemaLoadError::Compile {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name,
            definition,
            validator,
        })
    }

    /// Parse and compile a schema from JSON text
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self, SchemaLoadError> {
        let name = name.into();
        let definition = serde_json::from_str(content).map_err(|source| SchemaLoadError::Parse {
            name: name.clone(),
            source,
        })?;
        Self::new(name, definition)
    }

    /// Generic model extensions schema
    pub fn model_extensions() -> Result<Self, SchemaLoadError> {
        Self::parse("model-extensions", MODEL_EXTENSIONS_SCHEMA)
    }

    /// Process extensions schema
    pub fn process_extensions() -> Result<Self, SchemaLoadError> {
        Self::parse("process-extensions", PROCESS_EXTENSIONS_SCHEMA)
    }

    /// Connector content schema
    pub fn connector() -> Result<Self, SchemaLoadError> {
        Self::parse("connector", CONNECTOR_SCHEMA)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// Message template declared for `keyword` by the sub-schema at `location`
    fn message_template(&self, location: &str, keyword: &str) -> Option<&str> {
        self.definition
            .pointer(location)?
            .get(MESSAGE_KEY)?
            .get(keyword)?
            .as_str()
    }
}

/// A node of the violation tree reported by the schema engine
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Leaf(LeafViolation),
    /// Violations grouped under a combinator such as `anyOf`
    Branch(Vec<Violation>),
}

/// A single violated keyword
#[derive(Debug, Clone, PartialEq)]
pub struct LeafViolation {
    pub keyword: String,
    /// JSON pointer of the violating value in the document
    pub pointer: String,
    /// JSON pointer of the violated sub-schema
    pub schema_location: String,
    pub message: String,
}

impl Violation {
    /// Leaves in depth-first order
    pub fn into_leaves(self) -> Vec<LeafViolation> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(violation) = pending.pop() {
            match violation {
                Violation::Leaf(leaf) => leaves.push(leaf),
                Violation::Branch(children) => pending.extend(children.into_iter().rev()),
            }
        }
        leaves
    }
}

/// Validates JSON content against a [`Schema`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate content bytes
    ///
    /// Absent or empty content is optional content that was not supplied and
    /// yields no errors. Content that is not JSON is a syntactic failure.
    pub fn validate(
        &self,
        content: Option<&[u8]>,
        schema: &Schema,
    ) -> Result<Vec<ValidationError>, SyntacticError> {
        let content = match content {
            Some(content) if !content.is_empty() => content,
            _ => {
                debug!(schema = schema.name(), "No json content to validate");
                return Ok(Vec::new());
            }
        };

        debug!(schema = schema.name(), "Validating json content against schema");
        let document: Value = serde_json::from_slice(content).map_err(|e| {
            debug!(schema = schema.name(), error = %e, "Json content is not parsable");
            SyntacticError::with_cause(format!("Invalid json content for schema {}", schema.name()), e)
        })?;

        Ok(self.validate_value(&document, schema))
    }

    /// Validate an already parsed document
    pub fn validate_value(&self, document: &Value, schema: &Schema) -> Vec<ValidationError> {
        let errors = schema
            .validator
            .iter_errors(document)
            .map(|error| to_violation(&error))
            .flat_map(Violation::into_leaves)
            .map(|leaf| to_validation_error(leaf, schema, document))
            .collect();
        let errors = distinct(errors);

        if !errors.is_empty() {
            debug!(
                schema = schema.name(),
                count = errors.len(),
                "Schema validation errors found"
            );
        }

        errors
    }
}

fn to_violation(error: &jsonschema::ValidationError<'_>) -> Violation {
    match error.kind() {
        ValidationErrorKind::AnyOf { context } | ValidationErrorKind::OneOfNotValid { context }
            if !context.is_empty() =>
        {
            Violation::Branch(context.iter().flatten().map(to_violation).collect())
        }
        ValidationErrorKind::AdditionalProperties { unexpected } if unexpected.len() > 1 => {
            let pointer = error.instance_path().as_str().to_string();
            let schema_location = parent_location(error.schema_path().as_str(), "additionalProperties");
            Violation::Branch(
                unexpected
                    .iter()
                    .map(|key| {
                        Violation::Leaf(LeafViolation {
                            keyword: "additionalProperties".to_string(),
                            pointer: pointer.clone(),
                            schema_location: schema_location.clone(),
                            message: format!("extraneous key [{}] is not permitted", key),
                        })
                    })
                    .collect(),
            )
        }
        kind => {
            let keyword = keyword_of(kind);
            Violation::Leaf(LeafViolation {
                keyword: keyword.to_string(),
                pointer: error.instance_path().as_str().to_string(),
                schema_location: parent_location(error.schema_path().as_str(), keyword),
                message: default_message(error),
            })
        }
    }
}

fn to_validation_error(leaf: LeafViolation, schema: &Schema, document: &Value) -> ValidationError {
    let description = match schema.message_template(&leaf.schema_location, &leaf.keyword) {
        Some(template) => resolve_template(template, &leaf.pointer, document),
        None => format!("#{}: {}", leaf.pointer, leaf.message),
    };
    ValidationError::new(leaf.message, description)
        .with_validator_set_name(format!("#{}", leaf.schema_location))
}

/// Location of the sub-schema owning the keyword at `keyword_location`
fn parent_location(keyword_location: &str, keyword: &str) -> String {
    let segments: Vec<&str> = keyword_location.split('/').collect();
    let end = segments
        .iter()
        .rposition(|segment| *segment == keyword)
        .unwrap_or(segments.len().saturating_sub(1))
        .max(1);
    segments[..end].join("/")
}

/// Replace `{{name}}` and `{{id}}` with the values found next to `pointer`
pub fn resolve_template(template: &str, pointer: &str, document: &Value) -> String {
    let mut message = template.to_string();
    let mut resolved = [false; PLACEHOLDERS.len()];

    while let Some(index) = PLACEHOLDERS
        .iter()
        .enumerate()
        .position(|(i, (placeholder, _))| !resolved[i] && message.contains(placeholder))
    {
        let (placeholder, field) = PLACEHOLDERS[index];
        let value = sibling_value(document, pointer, field);
        message = message.replace(placeholder, &value);
        resolved[index] = true;
    }

    message
}

/// Value of `field` in the object holding the value at `pointer`
///
/// Missing values resolve to an empty string.
fn sibling_value(document: &Value, pointer: &str, field: &str) -> String {
    let mut segments: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect();
    match segments.last_mut() {
        Some(last) => *last = field.to_string(),
        None => segments.push(field.to_string()),
    }

    let mut current = Some(document);
    for segment in &segments {
        current = match current {
            Some(Value::Object(map)) => map.get(segment),
            Some(Value::Array(items)) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
    }

    match current {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn keyword_of(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf { .. } => "anyOf",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Contains => "contains",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::FalseSchema => "falseSchema",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::OneOfMultipleValid { .. }
        | ValidationErrorKind::OneOfNotValid { .. } => "oneOf",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::PropertyNames { .. } => "propertyNames",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::UniqueItems => "uniqueItems",
        _ => "unknown",
    }
}

/// Default message of a violation
fn default_message(error: &jsonschema::ValidationError<'_>) -> String {
    let instance: &Value = error.instance();
    match error.kind() {
        ValidationErrorKind::Pattern { pattern } => {
            format!("string [{}] does not match pattern {}", text_of(instance), pattern)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("expected maxLength: {}, actual: {}", limit, char_count(instance))
        }
        ValidationErrorKind::MinLength { limit } => {
            format!("expected minLength: {}, actual: {}", limit, char_count(instance))
        }
        ValidationErrorKind::Required { property } => {
            format!("required key [{}] not found", text_of(property))
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("extraneous key [{}] is not permitted", unexpected.join(", "))
        }
        ValidationErrorKind::Type { kind } => {
            let expected = match kind {
                TypeKind::Single(json_type) => json_type.to_string(),
                TypeKind::Multiple(types) => types
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" or "),
            };
            format!("expected type: {}, found: {}", expected, json_type_of(instance))
        }
        ValidationErrorKind::Enum { .. } => format!("{} is not a valid enum value", text_of(instance)),
        ValidationErrorKind::Constant { expected_value } => {
            format!("{} does not match the constant {}", instance, expected_value)
        }
        ValidationErrorKind::Minimum { limit } => {
            format!("{} is not greater or equal to {}", instance, limit)
        }
        ValidationErrorKind::Maximum { limit } => {
            format!("{} is not less or equal to {}", instance, limit)
        }
        ValidationErrorKind::Format { format } => {
            format!("[{}] is not a valid {}", text_of(instance), format)
        }
        _ => error.to_string(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn char_count(value: &Value) -> usize {
    value.as_str().map(|s| s.chars().count()).unwrap_or_default()
}

fn json_type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod schema_tests {
    use super::*;
    use crate::validation::name::DNS_LABEL_PATTERN;
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_bundled_schemas_compile() {
        assert!(Schema::model_extensions().is_ok());
        assert!(Schema::process_extensions().is_ok());
        assert!(Schema::connector().is_ok());
    }

    #[test]
    fn test_invalid_schema_fails_to_load() {
        assert!(matches!(
            Schema::parse("broken", "{ not json"),
            Err(SchemaLoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_absent_content_yields_no_errors() {
        let schema = Schema::connector().unwrap();
        assert!(SchemaValidator::new().validate(None, &schema).unwrap().is_empty());
        assert!(SchemaValidator::new().validate(Some(b""), &schema).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_syntactic() {
        let schema = Schema::connector().unwrap();
        let result = SchemaValidator::new().validate(Some(b"{\"name\": "), &schema);
        assert!(result.is_err());
    }

    #[test]
    fn test_pattern_violation_default_message() {
        let schema = Schema::connector().unwrap();
        let content = bytes(json!({ "name": "NameWithUppercase" }));
        let errors = SchemaValidator::new().validate(Some(&content), &schema).unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].problem(),
            format!("string [NameWithUppercase] does not match pattern {}", DNS_LABEL_PATTERN)
        );
        assert_eq!(errors[0].validator_set_name(), Some("#/properties/name"));
        assert!(errors[0].description().starts_with("#/name: "));
    }

    #[test]
    fn test_length_violations_default_messages() {
        let schema = Schema::connector().unwrap();

        let long = bytes(json!({ "name": "a".repeat(27) }));
        let errors = SchemaValidator::new().validate(Some(&long), &schema).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].problem(), "expected maxLength: 26, actual: 27");

        let empty = bytes(json!({ "name": "" }));
        let errors = SchemaValidator::new().validate(Some(&empty), &schema).unwrap();
        assert!(errors.iter().any(|e| e.problem() == "expected minLength: 1, actual: 0"));
    }

    #[test]
    fn test_template_resolves_name_and_id() {
        let schema = Schema::process_extensions().unwrap();
        let content = bytes(json!({
            "id": "process-p1",
            "name": "p1",
            "extensions": {
                "properties": {
                    "c297ec88-0ecf-4841-9b0f-2ae814957c68": {
                        "id": "c297ec88-0ecf-4841-9b0f-2ae814957c68",
                        "name": "stringVariable",
                        "type": "string",
                        "value": 1
                    }
                },
                "mappings": {}
            }
        }));

        let errors = SchemaValidator::new().validate(Some(&content), &schema).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].description(),
            "Mismatch value type - stringVariable(c297ec88-0ecf-4841-9b0f-2ae814957c68)"
        );
        assert_eq!(errors[0].problem(), "expected type: string, found: integer");
    }

    #[test]
    fn test_missing_placeholder_values_resolve_to_empty() {
        let document = json!({ "a": { "b": { "value": 1 } } });
        assert_eq!(
            resolve_template("Bad - {{name}}({{id}})", "/a/b/value", &document),
            "Bad - ()"
        );
    }

    #[test]
    fn test_placeholders_resolve_from_arrays_and_root() {
        let document = json!({ "name": "root", "items": [{ "id": 7, "value": true }] });
        assert_eq!(resolve_template("{{id}}", "/items/0/value", &document), "7");
        assert_eq!(resolve_template("{{name}}", "/value", &document), "root");
        assert_eq!(resolve_template("{{name}}", "", &document), "root");
    }

    #[test]
    fn test_placeholders_in_resolved_values_are_expanded() {
        let document = json!({ "x": { "name": "{{id}}", "id": "i", "value": 1 } });
        assert_eq!(resolve_template("{{name}}", "/x/value", &document), "i");
    }

    #[test]
    fn test_self_referencing_value_does_not_loop() {
        let document = json!({ "x": { "name": "{{name}}", "value": 1 } });
        assert_eq!(resolve_template("{{name}}", "/x/value", &document), "{{name}}");
    }

    #[test]
    fn test_any_of_violations_are_flattened() {
        let schema = Schema::new(
            "combined",
            json!({
                "type": "object",
                "properties": {
                    "v": { "anyOf": [ { "type": "string" }, { "type": "integer", "minimum": 10 } ] }
                }
            }),
        )
        .unwrap();

        let errors = SchemaValidator::new().validate_value(&json!({ "v": 3 }), &schema);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.problem() == "expected type: string, found: integer"));
        assert!(errors.iter().any(|e| e.problem() == "3 is not greater or equal to 10"));
    }

    #[test]
    fn test_additional_properties_report_one_error_per_key() {
        let schema = Schema::new(
            "closed",
            json!({ "type": "object", "properties": {}, "additionalProperties": false }),
        )
        .unwrap();
        let errors = SchemaValidator::new().validate_value(&json!({ "a": 1, "b": 2 }), &schema);
        let problems: Vec<&str> = errors.iter().map(|e| e.problem()).collect();
        assert_eq!(problems.len(), 2);
        assert!(problems.contains(&"extraneous key [a] is not permitted"));
        assert!(problems.contains(&"extraneous key [b] is not permitted"));
    }

    #[test]
    fn test_violations_from_distinct_locations_are_kept() {
        let schema = Schema::new(
            "dup",
            json!({
                "anyOf": [
                    { "required": ["id"] },
                    { "required": ["id"] }
                ]
            }),
        )
        .unwrap();
        let errors = SchemaValidator::new().validate_value(&json!({}), &schema);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.problem() == "required key [id] not found"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let schema = Schema::connector().unwrap();
        let content = bytes(json!({ "name": "Bad_Name", "actions": { "a": { "inputs": [{}] } } }));
        let first = SchemaValidator::new().validate(Some(&content), &schema).unwrap();
        let second = SchemaValidator::new().validate(Some(&content), &schema).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_parent_location_of_keyword() {
        assert_eq!(parent_location("/properties/name/pattern", "pattern"), "/properties/name");
        assert_eq!(parent_location("/required", "required"), "");
        assert_eq!(parent_location("/properties/required/type", "type"), "/properties/required");
    }
}
