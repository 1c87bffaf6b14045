//! Type-safe schema generation for OpenAI structured outputs.
//!
//! Uses the `schemars` crate to generate JSON schemas from Rust types, then
//! rewrites them into the subset accepted by strict `json_schema` mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use openai_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Invoice {
//!     number: String,
//!     total_cents: u32,
//!     paid: Option<bool>,
//! }
//!
//! let schema = Invoice::openai_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `format` values strict mode understands; everything else is dropped.
const SUPPORTED_FORMATS: &[&str] = &[
    "date-time", "time", "date", "duration", "email", "hostname", "ipv4", "ipv6", "uuid",
];

/// Trait for types that can be used as OpenAI structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate an OpenAI-compatible JSON schema for this type.
    ///
    /// Strict mode requires:
    /// 1. `additionalProperties: false` on all object schemas
    /// 2. ALL properties listed in `required`, even nullable ones
    /// 3. Fully inlined schemas (no `$ref` references)
    /// 4. No `allOf` (schemars wraps documented references in a one-element `allOf`)
    /// 5. Only a small set of string `format`s (schemars emits `uint8` and friends)
    fn openai_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        fix_object_schemas(&mut value);
        inline_refs(&mut value);
        collapse_single_all_of(&mut value);
        strip_unsupported_formats(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    /// Get the schema name for this type.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Add `additionalProperties: false` and list every property as required.
fn fix_object_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                if let Some(Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<Value> =
                        props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(all_keys));
                }
            }

            for (_, v) in map.iter_mut() {
                fix_object_schemas(v);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(fix_object_schemas),
        _ => {}
    }
}

/// Replace every `#/definitions/X` reference with the definition itself.
fn inline_refs(value: &mut Value) {
    let definitions = match value {
        Value::Object(map) => map.get("definitions").cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

/// Merge a one-element `allOf` into the schema that holds it.
fn collapse_single_all_of(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let single = match map.get("allOf") {
                Some(Value::Array(items)) if items.len() == 1 => items[0].as_object().cloned(),
                _ => None,
            };
            if let Some(inner) = single {
                map.remove("allOf");
                for (key, v) in inner {
                    // Keep the outer description; it is the field-level one
                    map.entry(key).or_insert(v);
                }
            }

            for (_, v) in map.iter_mut() {
                collapse_single_all_of(v);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(collapse_single_all_of),
        _ => {}
    }
}

fn strip_unsupported_formats(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let unsupported = matches!(
                map.get("format"),
                Some(Value::String(format)) if !SUPPORTED_FORMATS.contains(&format.as_str())
            );
            if unsupported {
                map.remove("format");
            }

            for (_, v) in map.iter_mut() {
                strip_unsupported_formats(v);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(strip_unsupported_formats),
        _ => {}
    }
}
