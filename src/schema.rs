//! JSON schema generation for tool inputs.

use rmcp::model::JsonObject;
use rmcp::schemars::{self, JsonSchema, generate::SchemaSettings};
use std::sync::Arc;

/// Generate an inline JSON schema for an MCP tool input.
///
/// Subschemas are inlined so enum parameters such as the query strategy show
/// up as plain `enum` lists instead of `$ref` entries.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let schema = settings.into_generator().into_root_schema_for::<T>();
    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        Ok(other) => panic!("Schema serialization produced non-object value: {other}"),
        Err(e) => panic!("Failed to serialize schema: {e}"),
    }
}
