//! `.env` file parsing

use std::collections::BTreeMap;
use std::path::PathBuf;

use regex::Regex;
use tracing::trace;

use crate::domain::error::{DomainError, DomainResult};

const KEY_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.-]*$";

/// Parsed key/value file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    /// Path to this env file
    pub path: PathBuf,
    /// Parsed variables; a later duplicate key replaces an earlier one
    pub variables: BTreeMap<String, String>,
}

impl EnvFile {
    /// Parse env file content.
    ///
    /// Recognizes `KEY=value` and `export KEY=value` lines. Blank lines,
    /// `#` comments and lines without `=` are skipped. `$VAR` and `${VAR}`
    /// inside unquoted or double-quoted values resolve against keys defined
    /// earlier in the file, then `lookup`, then expand to nothing.
    ///
    /// # Arguments
    /// * `content` - File content to parse
    /// * `path` - Path of the file (used in error messages)
    /// * `lookup` - Fallback for variable expansion (usually the process env)
    pub fn parse<F>(content: &str, path: PathBuf, lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_re = Regex::new(KEY_PATTERN).map_err(|e| DomainError::InvalidEnvFile {
            path: path.clone(),
            line: 0,
            message: e.to_string(),
        })?;
        let mut variables: BTreeMap<String, String> = BTreeMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let rest = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, raw)) = rest.split_once('=') else {
                trace!("skipping line {line_no} without '='");
                continue;
            };

            let key = key.trim();
            if !key_re.is_match(key) {
                return Err(invalid(&path, line_no, format!("invalid key {key:?}")));
            }

            let value = match parse_value(raw.trim()) {
                Ok(Raw::Literal(v)) => v,
                Ok(Raw::Expand(v)) => expand(&v, &variables, &lookup),
                Err(message) => return Err(invalid(&path, line_no, message)),
            };
            variables.insert(key.to_string(), value);
        }

        Ok(Self { path, variables })
    }

    /// `export KEY=value` lines, values shell-quoted where needed.
    pub fn to_exports(&self) -> String {
        self.variables
            .iter()
            .map(|(k, v)| format!("export {}={}\n", k, shell_quote(v)))
            .collect()
    }
}

fn invalid(path: &std::path::Path, line: usize, message: String) -> DomainError {
    DomainError::InvalidEnvFile {
        path: path.to_path_buf(),
        line,
        message,
    }
}

enum Raw {
    /// Single-quoted: taken as is
    Literal(String),
    /// Unquoted or double-quoted: variables expanded
    Expand(String),
}

fn parse_value(raw: &str) -> Result<Raw, String> {
    let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return Ok(Raw::Expand(strip_trailing_comment(raw).to_string()));
    };

    let body = &raw[1..];
    let mut out = String::new();
    let mut chars = body.char_indices();
    let mut close = None;

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if quote == '"' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => {
                    if other != '"' && other != '\\' {
                        out.push('\\');
                    }
                    out.push(other);
                }
                None => out.push('\\'),
            },
            c if c == quote => {
                close = Some(i);
                break;
            }
            c => out.push(c),
        }
    }

    let close = close.ok_or_else(|| format!("unterminated {quote} quote"))?;
    let trailing = body[close + 1..].trim();
    if !trailing.is_empty() && !trailing.starts_with('#') {
        return Err(format!("unexpected {trailing:?} after quoted value"));
    }

    Ok(if quote == '\'' {
        Raw::Literal(out)
    } else {
        Raw::Expand(out)
    })
}

/// `value  # comment` → `value`; a `#` not preceded by whitespace is kept.
fn strip_trailing_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return s[..i].trim_end();
        }
    }
    s
}

fn expand<F>(value: &str, earlier: &BTreeMap<String, String>, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    shellexpand::env_with_context_no_errors(value, |name: &str| {
        Some(
            earlier
                .get(name)
                .cloned()
                .or_else(|| lookup(name))
                .unwrap_or_default(),
        )
    })
    .into_owned()
}

/// Quote a value for POSIX shells unless it only contains safe characters.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./:,@%+=-".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
