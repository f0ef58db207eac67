//! Record schemas and the JSON codec pair that enforces them.
//!
//! Schemas are looked up by subject (`<topic>-value`) through a [`SchemaSource`]
//! and memoized in a [`SchemaCache`] shared by all threads using the codec.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_derive::{Deserialize, Serialize};

use crate::value::Value;

pub mod cache;
pub mod json_schema_codec;

pub use cache::SchemaCache;
pub use json_schema_codec::{SchemaJsonDeserializer, SchemaJsonSerializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    String,
    Any,
}

impl FieldKind {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Any, _) => true,
            (FieldKind::Bool, Value::Bool(_)) => true,
            (FieldKind::Int, Value::Int(_)) => true,
            (FieldKind::Float, Value::Float(_) | Value::Int(_)) => true,
            (FieldKind::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::String => write!(f, "string"),
            FieldKind::Any => write!(f, "any"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, required: true }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, required: false }
    }
}

/// Shape a record must have. Fields not listed are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Check `value` against the schema, describing the first violation found.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        let map = value
            .as_map()
            .ok_or_else(|| format!("expected a map, got {}", value.kind()))?;

        for field in &self.fields {
            match map.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(format!("missing required field '{}'", field.name));
                }
                None | Some(Value::Null) => {}
                Some(v) if !field.kind.accepts(v) => {
                    return Err(format!(
                        "field '{}' expects {}, got {}",
                        field.name,
                        field.kind,
                        v.kind()
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Where schemas come from, e.g. a registry client or a local catalog.
pub trait SchemaSource: Send + Sync {
    fn fetch(&self, subject: &str) -> Result<RecordSchema, String>;
}

/// In-memory catalog of schemas keyed by subject.
#[derive(Default)]
pub struct StaticSchemaSource {
    schemas: RwLock<HashMap<String, RecordSchema>>,
}

impl StaticSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, subject: impl Into<String>, schema: RecordSchema) {
        self.schemas.write().insert(subject.into(), schema);
    }

    pub fn into_shared(self) -> Arc<dyn SchemaSource> {
        Arc::new(self)
    }
}

impl SchemaSource for StaticSchemaSource {
    fn fetch(&self, subject: &str) -> Result<RecordSchema, String> {
        self.schemas
            .read()
            .get(subject)
            .cloned()
            .ok_or_else(|| format!("subject '{}' not found", subject))
    }
}
