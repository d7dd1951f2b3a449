//! Field descriptors and bound configuration values

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Declared kind of a configuration field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Int,
    Uint,
    Bool,
    Float,
    /// Comma separated list; only string, int and float elements bind.
    List(Box<FieldKind>),
    /// Nested record, bound recursively from the same source.
    Record(Vec<FieldSpec>),
}

impl FieldKind {
    pub fn list(element: FieldKind) -> Self {
        FieldKind::List(Box::new(element))
    }

    /// Value a field holds when nothing was resolved for it.
    pub fn zero_value(&self) -> Value {
        match self {
            FieldKind::String => Value::Str(String::new()),
            FieldKind::Int => Value::Int(0),
            FieldKind::Uint => Value::Uint(0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::List(_) => Value::List(Vec::new()),
            FieldKind::Record(fields) => Value::Record(BoundConfig::zeroed(fields)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Uint => write!(f, "uint"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::List(element) => write!(f, "list<{element}>"),
            FieldKind::Record(_) => write!(f, "record"),
        }
    }
}

/// Descriptor for a single configuration field.
///
/// Built with the constructor for its kind and refined with the
/// chaining methods:
///
/// ```
/// use envcmd::domain::FieldSpec;
///
/// let port = FieldSpec::int("port").env("APP_PORT").default_value("8080");
/// assert_eq!(port.key.as_deref(), Some("APP_PORT"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Source key; records never carry one.
    pub key: Option<String>,
    pub default: Option<String>,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            key: None,
            default: None,
            required: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub fn uint(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Uint)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn list(name: impl Into<String>, element: FieldKind) -> Self {
        Self::new(name, FieldKind::list(element))
    }

    pub fn record(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self::new(name, FieldKind::Record(fields))
    }

    /// Set the source key. Ignored for records.
    pub fn env(mut self, key: impl Into<String>) -> Self {
        if !matches!(self.kind, FieldKind::Record(_)) {
            self.key = Some(key.into());
        }
        self
    }

    pub fn default_value(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Non-empty source key, if binding was requested.
    pub fn source_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// Non-empty default literal.
    pub fn default_literal(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }
}

/// A bound field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Bool(bool),
    Float(f64),
    List(Vec<Value>),
    Record(BoundConfig),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(record) => write!(f, "{{{} fields}}", record.len()),
        }
    }
}

/// Populated configuration: one value per declared field, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundConfig {
    values: Vec<(String, Value)>,
}

impl BoundConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config holding the zero value of every field in `fields`.
    pub fn zeroed(fields: &[FieldSpec]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|f| (f.name.clone(), f.kind.zero_value()))
                .collect(),
        }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn expect_kind<'a, T>(
        &'a self,
        name: &str,
        kind: &str,
        pick: impl FnOnce(&'a Value) -> Option<T>,
    ) -> DomainResult<T> {
        let value = self
            .get(name)
            .ok_or_else(|| DomainError::MissingField(name.to_string()))?;
        pick(value).ok_or_else(|| DomainError::TypeMismatch {
            field: name.to_string(),
            kind: kind.to_string(),
            value: value.to_string(),
        })
    }

    pub fn str(&self, name: &str) -> DomainResult<&str> {
        self.expect_kind(name, "string", |v| match v {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn i64(&self, name: &str) -> DomainResult<i64> {
        self.expect_kind(name, "int", |v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn u64(&self, name: &str) -> DomainResult<u64> {
        self.expect_kind(name, "uint", |v| match v {
            Value::Uint(u) => Some(*u),
            _ => None,
        })
    }

    pub fn bool(&self, name: &str) -> DomainResult<bool> {
        self.expect_kind(name, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn f64(&self, name: &str) -> DomainResult<f64> {
        self.expect_kind(name, "float", |v| match v {
            Value::Float(x) => Some(*x),
            _ => None,
        })
    }

    pub fn list(&self, name: &str) -> DomainResult<&[Value]> {
        self.expect_kind(name, "list", |v| match v {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        })
    }

    pub fn record(&self, name: &str) -> DomainResult<&BoundConfig> {
        self.expect_kind(name, "record", |v| match v {
            Value::Record(r) => Some(r),
            _ => None,
        })
    }

    /// String list; fails if any element is not a string.
    pub fn strings(&self, name: &str) -> DomainResult<Vec<String>> {
        self.list(name)?
            .iter()
            .map(|v| match v {
                Value::Str(s) => Ok(s.clone()),
                other => Err(mismatch(name, "string", other)),
            })
            .collect()
    }

    pub fn ints(&self, name: &str) -> DomainResult<Vec<i64>> {
        self.list(name)?
            .iter()
            .map(|v| match v {
                Value::Int(i) => Ok(*i),
                other => Err(mismatch(name, "int", other)),
            })
            .collect()
    }

    pub fn floats(&self, name: &str) -> DomainResult<Vec<f64>> {
        self.list(name)?
            .iter()
            .map(|v| match v {
                Value::Float(x) => Ok(*x),
                other => Err(mismatch(name, "float", other)),
            })
            .collect()
    }

    /// Flatten into `(dotted.path, value)` pairs, records expanded.
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
        for (name, value) in &self.values {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match value {
                Value::Record(inner) => inner.flatten_into(&path, out),
                other => out.push((path, other)),
            }
        }
    }
}

fn mismatch(field: &str, kind: &str, value: &Value) -> DomainError {
    DomainError::TypeMismatch {
        field: field.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
    }
}

/// Application config types that declare their own schema.
pub trait FromBound: Sized {
    /// Field descriptors, in declaration order.
    fn schema() -> Vec<FieldSpec>;

    /// Build `Self` from a config bound against [`FromBound::schema`].
    fn from_bound(config: &BoundConfig) -> DomainResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_record_field_when_setting_env_then_key_stays_empty() {
        let record = FieldSpec::record("database", vec![]).env("DB");
        assert_eq!(record.key, None);
    }

    #[test]
    fn given_record_kind_when_zeroed_then_children_hold_zero_values() {
        let kind = FieldKind::Record(vec![
            FieldSpec::string("dsn"),
            FieldSpec::int("pool"),
        ]);

        let Value::Record(zero) = kind.zero_value() else {
            panic!("expected record");
        };

        assert_eq!(zero.str("dsn").unwrap(), "");
        assert_eq!(zero.i64("pool").unwrap(), 0);
    }

    #[test]
    fn given_wrong_accessor_when_reading_then_type_mismatch() {
        let mut cfg = BoundConfig::new();
        cfg.insert("port", Value::Int(8080));

        let err = cfg.str("port").unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { ref kind, .. } if kind == "string"));
        assert_eq!(
            cfg.bool("nope").unwrap_err(),
            DomainError::MissingField("nope".into())
        );
    }

    #[test]
    fn given_nested_record_when_flattening_then_paths_are_dotted() {
        let mut inner = BoundConfig::new();
        inner.insert("dsn", Value::Str("pg://".into()));
        let mut cfg = BoundConfig::new();
        cfg.insert("port", Value::Int(1));
        cfg.insert("database", Value::Record(inner));

        let flat: Vec<String> = cfg.flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(flat, vec!["port", "database.dsn"]);
    }

    #[test]
    fn given_list_kind_when_displayed_then_shows_element() {
        assert_eq!(FieldKind::list(FieldKind::Int).to_string(), "list<int>");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
    }
}
