//! Config binding service
//!
//! Resolves field descriptors against an env source and coerces the
//! resulting strings into typed values.

use tracing::{debug, instrument, trace, warn};

use crate::domain::{BoundConfig, DomainError, DomainResult, FieldKind, FieldSpec, Value};
use crate::infrastructure::traits::EnvSource;

/// How a required field that also carries a default is treated when its
/// source key is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequiredDefault {
    /// The default satisfies the requirement; a warning is logged.
    #[default]
    Satisfies,
    /// The field must come from the source; the default is ignored.
    Rejects,
}

/// Binds a schema against an [`EnvSource`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBinder {
    policy: RequiredDefault,
}

impl ConfigBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RequiredDefault) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RequiredDefault {
        self.policy
    }

    /// Bind every field of `schema`, depth first in declaration order.
    ///
    /// Stops at the first error; no partially bound config is returned.
    #[instrument(level = "debug", skip_all, fields(fields = schema.len()))]
    pub fn bind(&self, schema: &[FieldSpec], source: &dyn EnvSource) -> DomainResult<BoundConfig> {
        let config = self.bind_fields(schema, source, "")?;
        debug!("bound {} top-level fields", config.len());
        Ok(config)
    }

    fn bind_fields(
        &self,
        fields: &[FieldSpec],
        source: &dyn EnvSource,
        prefix: &str,
    ) -> DomainResult<BoundConfig> {
        let mut config = BoundConfig::new();
        for field in fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let value = match &field.kind {
                FieldKind::Record(children) => {
                    Value::Record(self.bind_fields(children, source, &path)?)
                }
                _ => self.bind_scalar(field, source, &path)?,
            };
            config.insert(field.name.clone(), value);
        }
        Ok(config)
    }

    fn bind_scalar(
        &self,
        field: &FieldSpec,
        source: &dyn EnvSource,
        path: &str,
    ) -> DomainResult<Value> {
        let Some(key) = field.source_key() else {
            trace!("{path}: no source key, left at zero value");
            return Ok(field.kind.zero_value());
        };

        match self.resolve(field, key, source, path)? {
            Some(raw) => coerce(&field.kind, &raw, path),
            None => Ok(field.kind.zero_value()),
        }
    }

    /// Source value, else default, else `None`; enforces `required`.
    fn resolve(
        &self,
        field: &FieldSpec,
        key: &str,
        source: &dyn EnvSource,
        path: &str,
    ) -> DomainResult<Option<String>> {
        if let Some(value) = source.get(key).filter(|v| !v.is_empty()) {
            trace!("{path}: {key} from source");
            return Ok(Some(value));
        }

        let missing = || DomainError::MissingRequired {
            key: key.to_string(),
            field: path.to_string(),
        };

        match (field.default_literal(), field.required) {
            (Some(default), true) => match self.policy {
                RequiredDefault::Satisfies => {
                    warn!("required env var {key} not set, using default value: {default}");
                    Ok(Some(default.to_string()))
                }
                RequiredDefault::Rejects => Err(missing()),
            },
            (Some(default), false) => {
                trace!("{path}: {key} from default");
                Ok(Some(default.to_string()))
            }
            (None, true) => Err(missing()),
            (None, false) => Ok(None),
        }
    }
}

/// Coerce a non-empty raw string into `kind`.
pub fn coerce(kind: &FieldKind, raw: &str, field: &str) -> DomainResult<Value> {
    match kind {
        FieldKind::List(element) => {
            if !matches!(**element, FieldKind::String | FieldKind::Int | FieldKind::Float) {
                return Err(unsupported(kind, field));
            }
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| coerce_scalar(element, part, field))
                .collect::<DomainResult<Vec<_>>>()
                .map(Value::List)
        }
        FieldKind::Record(_) => Err(unsupported(kind, field)),
        scalar => coerce_scalar(scalar, raw, field),
    }
}

fn coerce_scalar(kind: &FieldKind, raw: &str, field: &str) -> DomainResult<Value> {
    let mismatch = || DomainError::TypeMismatch {
        field: field.to_string(),
        kind: kind.to_string(),
        value: raw.to_string(),
    };

    match kind {
        FieldKind::String => Ok(Value::Str(raw.to_string())),
        FieldKind::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| mismatch()),
        FieldKind::Uint => raw.parse::<u64>().map(Value::Uint).map_err(|_| mismatch()),
        FieldKind::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(mismatch),
        FieldKind::Float => raw.parse::<f64>().map(Value::Float).map_err(|_| mismatch()),
        FieldKind::List(_) | FieldKind::Record(_) => Err(unsupported(kind, field)),
    }
}

fn unsupported(kind: &FieldKind, field: &str) -> DomainError {
    DomainError::UnsupportedType {
        field: field.to_string(),
        kind: kind.to_string(),
    }
}

/// Canonical boolean literals.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
