use super::filter;
use crate::domain::error::NlqError;
use crate::domain::model::{ExecutionContext, ExecutionResult};
use crate::domain::query::{Field, Literal, Operation};
use crate::domain::schema::{ObjectType, Schema, TypeRef};
use crate::domain::traits::{QueryEngine, SchemaProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

const TYPENAME: &str = "__typename";

/// Schema plus the JSON data that answers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: Schema,
    pub data: Value,
}

/// Read-only query engine over an in-memory JSON document.
///
/// The data root is an object keyed by the query type's fields. Nested objects
/// and lists are plain JSON; list fields accept filter arguments (see
/// `filter::select`).
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    schema: Arc<Schema>,
    data: Arc<Value>,
    sdl: Arc<str>,
}

impl MemoryEngine {
    pub fn new(schema: Schema, data: Value) -> Result<Self, NlqError> {
        schema.check()?;
        if !data.is_object() {
            return Err(NlqError::Schema("dataset root must be a JSON object".to_string()));
        }
        let sdl = schema.to_sdl();
        Ok(Self {
            schema: Arc::new(schema),
            data: Arc::new(data),
            sdl: Arc::from(sdl),
        })
    }

    pub fn from_dataset(dataset: Dataset) -> Result<Self, NlqError> {
        Self::new(dataset.schema, dataset.data)
    }

    pub fn load(path: &Path) -> Result<Self, NlqError> {
        let content = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        Self::from_dataset(dataset)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn sdl(&self) -> &str {
        &self.sdl
    }

    /// Check an operation against the schema, collecting every problem in
    /// document order.
    pub fn validate(&self, operation: &Operation) -> Vec<String> {
        let mut errors = Vec::new();
        match self.schema.query_root() {
            Some(root) => self.validate_selection(root, &operation.selection_set, &mut errors),
            None => errors.push("Schema does not define a query type.".to_string()),
        }
        errors
    }

    fn validate_selection(&self, parent: &ObjectType, fields: &[Field], errors: &mut Vec<String>) {
        for field in fields {
            if field.name == TYPENAME {
                if let Some((arg, _)) = field.arguments.first() {
                    errors.push(format!(
                        "Unknown argument \"{}\" on field \"{}.{}\".",
                        arg, parent.name, TYPENAME
                    ));
                }
                if !field.selection_set.is_empty() {
                    errors.push(format!(
                        "Field \"{}\" must not have a selection since type \"String!\" has no subfields.",
                        TYPENAME
                    ));
                }
                continue;
            }

            let Some(def) = parent.field(&field.name) else {
                errors.push(format!(
                    "Cannot query field \"{}\" on type \"{}\".",
                    field.name, parent.name
                ));
                continue;
            };

            for (name, value) in &field.arguments {
                match def.arg(name) {
                    None => errors.push(format!(
                        "Unknown argument \"{}\" on field \"{}.{}\".",
                        name, parent.name, field.name
                    )),
                    Some(arg) if !self.literal_fits(&arg.ty, value) => errors.push(format!(
                        "Argument \"{}\" on field \"{}.{}\" has invalid value: expected type \"{}\", found {}.",
                        name,
                        parent.name,
                        field.name,
                        arg.ty,
                        value.kind_name()
                    )),
                    Some(_) => {}
                }
            }
            for arg in &def.args {
                if arg.ty.is_non_null() && field.argument(&arg.name).is_none() {
                    errors.push(format!(
                        "Field \"{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                        field.name, arg.name, arg.ty
                    ));
                }
            }

            match self.schema.object(def.ty.base()) {
                Some(_) if field.selection_set.is_empty() => errors.push(format!(
                    "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                    field.name, def.ty
                )),
                Some(child) => self.validate_selection(child, &field.selection_set, errors),
                None if !field.selection_set.is_empty() => errors.push(format!(
                    "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                    field.name, def.ty
                )),
                None => {}
            }
        }
    }

    fn literal_fits(&self, ty: &TypeRef, literal: &Literal) -> bool {
        match (ty, literal) {
            (TypeRef::NonNull(_), Literal::Null) => false,
            (TypeRef::NonNull(inner), l) => self.literal_fits(inner, l),
            (_, Literal::Null) => true,
            (TypeRef::List(inner), Literal::List(items)) => {
                items.iter().all(|item| self.literal_fits(inner, item))
            }
            // A single value is accepted where a list is expected.
            (TypeRef::List(inner), l) => self.literal_fits(inner, l),
            (TypeRef::Named(name), l) => match (name.as_str(), l) {
                ("Int", Literal::Int(_)) => true,
                ("Float", Literal::Int(_) | Literal::Float(_)) => true,
                ("String", Literal::String(_)) => true,
                ("Boolean", Literal::Boolean(_)) => true,
                ("ID", Literal::String(_) | Literal::Int(_)) => true,
                (custom, Literal::String(_)) => self.schema.scalars.iter().any(|s| s == custom),
                _ => false,
            },
        }
    }

    fn resolve_object(&self, ty: &ObjectType, source: &Value, fields: &[Field]) -> Value {
        let mut out = Map::new();
        for field in fields {
            let key = field.response_key().to_string();
            if field.name == TYPENAME {
                out.insert(key, Value::String(ty.name.clone()));
                continue;
            }
            let Some(def) = ty.field(&field.name) else {
                continue;
            };
            let raw = source.get(def.data_key()).unwrap_or(&Value::Null);
            out.insert(key, self.resolve_field(&def.ty, raw, field));
        }
        Value::Object(out)
    }

    fn resolve_field(&self, ty: &TypeRef, raw: &Value, field: &Field) -> Value {
        let item_type = self.schema.object(ty.base());

        if ty.is_list() {
            let Value::Array(items) = raw else {
                return Value::Null;
            };
            let selected = filter::select(items, &field.arguments, item_type);
            return Value::Array(
                selected
                    .into_iter()
                    .map(|item| self.resolve_item(item_type, item, field))
                    .collect(),
            );
        }

        // A singular field backed by a list is a lookup: first match wins.
        let item = match raw {
            Value::Array(items) => filter::select(items, &field.arguments, item_type)
                .into_iter()
                .next()
                .unwrap_or(&Value::Null),
            other => other,
        };
        self.resolve_item(item_type, item, field)
    }

    fn resolve_item(&self, item_type: Option<&ObjectType>, item: &Value, field: &Field) -> Value {
        match item_type {
            Some(_) if item.is_null() => Value::Null,
            Some(object) => self.resolve_object(object, item, &field.selection_set),
            None => item.clone(),
        }
    }
}

#[async_trait]
impl SchemaProvider for MemoryEngine {
    async fn schema_text(&self) -> Result<String, NlqError> {
        Ok(self.sdl.to_string())
    }
}

#[async_trait]
impl QueryEngine for MemoryEngine {
    async fn execute(&self, operation: &Operation, context: &ExecutionContext) -> ExecutionResult {
        if !operation.kind.is_read_only() {
            let message = if context.allow_mutations {
                // No mutation or subscription root exists.
                format!("Schema is not configured to execute {} operation.", operation.kind)
            } else {
                format!(
                    "Operation \"{}\" is not permitted in a read-only context.",
                    operation.kind
                )
            };
            return ExecutionResult::errors(vec![message]);
        }

        let errors = self.validate(operation);
        if !errors.is_empty() {
            return ExecutionResult::errors(errors);
        }

        match self.schema.query_root() {
            Some(root) => {
                ExecutionResult::data(self.resolve_object(root, &self.data, &operation.selection_set))
            }
            None => ExecutionResult::errors(vec!["Schema does not define a query type.".to_string()]),
        }
    }
}
