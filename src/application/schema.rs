//! TOML schema files
//!
//! ```toml
//! [[field]]
//! name = "port"
//! kind = "int"
//! env = "APP_PORT"
//! default = "8080"
//!
//! [[field]]
//! name = "database"
//! kind = "record"
//!
//!   [[field.fields]]
//!   name = "dsn"
//!   kind = "string"
//!   env = "DB_DSN"
//!   required = true
//! ```

use serde::Deserialize;

use crate::application::ApplicationResult;
use crate::domain::{DomainError, FieldKind, FieldSpec};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    #[serde(default)]
    field: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    name: String,
    kind: String,
    env: Option<String>,
    default: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    fields: Vec<RawField>,
}

/// Parse a TOML schema into field descriptors.
pub fn parse_schema(content: &str) -> ApplicationResult<Vec<FieldSpec>> {
    let raw: RawSchema = toml::from_str(content).map_err(|e| DomainError::InvalidSchema {
        message: e.to_string(),
    })?;
    Ok(convert(raw.field, "")?)
}

fn convert(fields: Vec<RawField>, prefix: &str) -> Result<Vec<FieldSpec>, DomainError> {
    fields
        .into_iter()
        .map(|raw| {
            let path = if prefix.is_empty() {
                raw.name.clone()
            } else {
                format!("{prefix}.{}", raw.name)
            };
            let invalid = |message: String| DomainError::InvalidSchema {
                message: format!("field {path}: {message}"),
            };

            let kind = if raw.kind == "record" {
                if raw.env.is_some() {
                    return Err(invalid("records take no env key".into()));
                }
                FieldKind::Record(convert(raw.fields, &path)?)
            } else {
                if !raw.fields.is_empty() {
                    return Err(invalid(format!("{} fields cannot have children", raw.kind)));
                }
                parse_kind(&raw.kind)
                    .ok_or_else(|| invalid(format!("unknown kind {:?}", raw.kind)))?
            };

            Ok(FieldSpec {
                name: raw.name,
                kind,
                key: raw.env,
                default: raw.default,
                required: raw.required,
            })
        })
        .collect()
}

/// `string`, `int`, `uint`, `bool`, `float` or `list<T>`.
fn parse_kind(kind: &str) -> Option<FieldKind> {
    let kind = kind.trim();
    if let Some(inner) = kind.strip_prefix("list<").and_then(|k| k.strip_suffix('>')) {
        return parse_kind(inner).map(FieldKind::list);
    }
    match kind {
        "string" => Some(FieldKind::String),
        "int" => Some(FieldKind::Int),
        "uint" => Some(FieldKind::Uint),
        "bool" => Some(FieldKind::Bool),
        "float" => Some(FieldKind::Float),
        _ => None,
    }
}
