use crate::domain::error::NlqError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write;

const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Declarative description of the queryable types.
///
/// Only object types and scalars exist; there are no input objects, interfaces
/// or unions, and the schema has no mutation root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default = "default_query_type")]
    pub query_type: String,
    /// Custom scalars, accepted as string literals.
    #[serde(default)]
    pub scalars: Vec<String>,
    pub types: Vec<ObjectType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<ArgumentDef>,
    /// Data key to read instead of `name`.
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
}

/// Type reference in SDL notation, e.g. `[CrimeLog!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn parse(text: &str) -> Result<Self, NlqError> {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix('!') {
            let inner = Self::parse(inner)?;
            if matches!(inner, TypeRef::NonNull(_)) {
                return Err(NlqError::Schema(format!("invalid type reference \"{}\"", text)));
            }
            return Ok(TypeRef::NonNull(Box::new(inner)));
        }
        if let Some(inner) = text.strip_prefix('[') {
            let inner = inner
                .strip_suffix(']')
                .ok_or_else(|| NlqError::Schema(format!("invalid type reference \"{}\"", text)))?;
            return Ok(TypeRef::List(Box::new(Self::parse(inner)?)));
        }
        let valid = !text.is_empty()
            && text
                .chars()
                .all(|c| c == '_' || c.is_ascii_alphanumeric())
            && !text.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(NlqError::Schema(format!("invalid type reference \"{}\"", text)));
        }
        Ok(TypeRef::Named(text.to_string()))
    }

    /// Innermost named type.
    pub fn base(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base(),
        }
    }

    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), TypeRef::List(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = NlqError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

fn default_query_type() -> String {
    "Query".to_string()
}

impl ObjectType {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FieldDef {
    pub fn arg(&self, name: &str) -> Option<&ArgumentDef> {
        self.args.iter().find(|a| a.name == name)
    }

    pub fn data_key(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }
}

impl Schema {
    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn query_root(&self) -> Option<&ObjectType> {
        self.object(&self.query_type)
    }

    pub fn is_scalar(&self, name: &str) -> bool {
        BUILTIN_SCALARS.contains(&name) || self.scalars.iter().any(|s| s == name)
    }

    /// Check that the query root exists and every referenced type is declared.
    pub fn check(&self) -> Result<(), NlqError> {
        if self.query_root().is_none() {
            return Err(NlqError::Schema(format!(
                "query type \"{}\" is not defined",
                self.query_type
            )));
        }
        for object in &self.types {
            if object.fields.is_empty() {
                return Err(NlqError::Schema(format!(
                    "type \"{}\" must define at least one field",
                    object.name
                )));
            }
            for field in &object.fields {
                self.check_type_ref(&field.ty, &object.name, &field.name)?;
                for arg in &field.args {
                    if !self.is_scalar(arg.ty.base()) {
                        return Err(NlqError::Schema(format!(
                            "argument \"{}\" on \"{}.{}\" must be a scalar",
                            arg.name, object.name, field.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_type_ref(&self, ty: &TypeRef, owner: &str, field: &str) -> Result<(), NlqError> {
        let base = ty.base();
        if self.is_scalar(base) || self.object(base).is_some() {
            Ok(())
        } else {
            Err(NlqError::Schema(format!(
                "unknown type \"{}\" on \"{}.{}\"",
                base, owner, field
            )))
        }
    }

    /// Render the schema as SDL text for the model.
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        for scalar in &self.scalars {
            writeln!(out, "scalar {}\n", scalar).ok();
        }
        if self.query_type != "Query" {
            writeln!(out, "schema {{\n  query: {}\n}}\n", self.query_type).ok();
        }
        for object in &self.types {
            if let Some(desc) = &object.description {
                writeln!(out, "\"{}\"", escape_description(desc)).ok();
            }
            writeln!(out, "type {} {{", object.name).ok();
            for field in &object.fields {
                if let Some(desc) = &field.description {
                    writeln!(out, "  \"{}\"", escape_description(desc)).ok();
                }
                write!(out, "  {}", field.name).ok();
                if !field.args.is_empty() {
                    let args: Vec<String> = field
                        .args
                        .iter()
                        .map(|a| match &a.description {
                            Some(desc) => {
                                format!("\"{}\" {}: {}", escape_description(desc), a.name, a.ty)
                            }
                            None => format!("{}: {}", a.name, a.ty),
                        })
                        .collect();
                    write!(out, "({})", args.join(", ")).ok();
                }
                writeln!(out, ": {}", field.ty).ok();
            }
            writeln!(out, "}}\n").ok();
        }
        out.trim_end().to_string()
    }
}

fn escape_description(desc: &str) -> String {
    desc.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', " ")
}
