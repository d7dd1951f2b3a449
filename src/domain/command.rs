//! Command, subcommand and flag descriptors plus argv token classification

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::trace;

use crate::domain::context::ExecContext;
use crate::domain::error::{DomainError, DomainResult};

/// Flag name (as typed) to value; valueless flags map to `""`.
pub type FlagMap = BTreeMap<String, String>;

/// Error type handlers may return; surfaced to the caller unchanged.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<(), HandlerError>;

/// Command handler: `(context, positional args, flags)`.
pub type Handler = Box<dyn Fn(&ExecContext, &[String], &FlagMap) -> HandlerResult>;

/// Named CLI option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub long: String,
    pub short: Option<String>,
    pub usage: String,
    pub required: bool,
}

impl FlagSpec {
    pub fn new(long: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            usage: usage.into(),
            required: false,
        }
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// True if `name` is this flag's long or short spelling.
    pub fn matches(&self, name: &str) -> bool {
        !name.is_empty() && (self.long == name || self.short.as_deref() == Some(name))
    }

    /// Value under either spelling; the long spelling is checked first.
    ///
    /// The flag map keeps whatever spelling was typed, so handlers accepting
    /// both forms go through this.
    pub fn lookup<'a>(&self, flags: &'a FlagMap) -> Option<&'a str> {
        flags
            .get(&self.long)
            .or_else(|| self.short.as_ref().and_then(|s| flags.get(s)))
            .map(String::as_str)
    }

    /// `--long, -s` or `--long`.
    pub fn spelling(&self) -> String {
        match &self.short {
            Some(short) => format!("--{}, -{}", self.long, short),
            None => format!("--{}", self.long),
        }
    }
}

/// Second-level command with its own flags and handler.
pub struct SubCommandSpec {
    pub name: String,
    pub short: String,
    pub long: String,
    pub flags: Vec<FlagSpec>,
    pub handler: Option<Handler>,
}

impl SubCommandSpec {
    pub fn new(name: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: short.into(),
            long: String::new(),
            flags: Vec::new(),
            handler: None,
        }
    }

    pub fn long_about(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ExecContext, &[String], &FlagMap) -> HandlerResult + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for SubCommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubCommandSpec")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Top-level command.
pub struct CommandSpec {
    pub name: String,
    pub short: String,
    pub long: String,
    pub flags: Vec<FlagSpec>,
    pub subcommands: Vec<SubCommandSpec>,
    pub handler: Option<Handler>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: short.into(),
            long: String::new(),
            flags: Vec::new(),
            subcommands: Vec::new(),
            handler: None,
        }
    }

    pub fn long_about(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn subcommand(mut self, subcommand: SubCommandSpec) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ExecContext, &[String], &FlagMap) -> HandlerResult + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&SubCommandSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Application command tree.
#[derive(Debug)]
pub struct AppSpec {
    pub name: String,
    pub version: String,
    pub description: String,
    pub commands: Vec<CommandSpec>,
}

impl AppSpec {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            commands: Vec::new(),
        }
    }

    pub fn command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Check name uniqueness for commands, subcommands and flags.
    pub fn validate(&self) -> DomainResult<()> {
        unique(
            self.commands.iter().map(|c| c.name.as_str()),
            || format!("app {}", self.name),
            "command",
        )?;

        for cmd in &self.commands {
            validate_flags(&cmd.flags, &cmd.name)?;
            unique(
                cmd.subcommands.iter().map(|s| s.name.as_str()),
                || format!("command {}", cmd.name),
                "subcommand",
            )?;
            for sub in &cmd.subcommands {
                validate_flags(&sub.flags, &format!("{} {}", cmd.name, sub.name))?;
            }
        }
        Ok(())
    }
}

fn validate_flags(flags: &[FlagSpec], owner: &str) -> DomainResult<()> {
    unique(flags.iter().map(|f| f.long.as_str()), || format!("command {owner}"), "flag")?;
    unique(
        flags.iter().filter_map(|f| f.short.as_deref()),
        || format!("command {owner}"),
        "short flag",
    )?;
    if flags.iter().any(|f| f.long.is_empty()) {
        return Err(DomainError::InvalidSchema {
            message: format!("command {owner}: flag without long name"),
        });
    }
    Ok(())
}

fn unique<'a>(
    names: impl Iterator<Item = &'a str>,
    owner: impl Fn() -> String,
    what: &str,
) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DomainError::InvalidSchema {
                message: format!("{}: duplicate {what} `{name}`", owner()),
            });
        }
    }
    Ok(())
}

/// Positional arguments and flags split out of the remaining argv.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub args: Vec<String>,
    pub flags: FlagMap,
}

impl ParsedArgs {
    /// Classify `tokens` against the active flag list.
    ///
    /// `--name` and `-name` are flag candidates; a candidate matching a
    /// declared long or short name takes the next token as its value unless
    /// that token starts with `-`. Unknown flag-shaped tokens stay positional.
    pub fn parse(tokens: &[String], flags: &[FlagSpec]) -> Self {
        let mut parsed = Self::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            let candidate = if let Some(long) = token.strip_prefix("--") {
                Some(long)
            } else if token.len() > 1 {
                token.strip_prefix('-')
            } else {
                None
            };

            let known = candidate.filter(|name| flags.iter().any(|f| f.matches(name)));
            match known {
                Some(name) => match tokens.get(i + 1) {
                    Some(next) if !next.starts_with('-') => {
                        trace!("flag {name}={next}");
                        parsed.flags.insert(name.to_string(), next.clone());
                        i += 2;
                    }
                    _ => {
                        trace!("flag {name} without value");
                        parsed.flags.insert(name.to_string(), String::new());
                        i += 1;
                    }
                },
                None => {
                    parsed.args.push(token.clone());
                    i += 1;
                }
            }
        }

        parsed
    }

    /// Every required flag must appear under its long or short spelling.
    pub fn check_required(&self, flags: &[FlagSpec]) -> DomainResult<()> {
        for flag in flags.iter().filter(|f| f.required) {
            if flag.lookup(&self.flags).is_none() {
                return Err(DomainError::MissingRequiredFlag {
                    long: flag.long.clone(),
                    short: flag.short.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_known_long_flag_with_value_when_parsing_then_consumes_value() {
        let flags = vec![FlagSpec::new("http", "")];

        let parsed = ParsedArgs::parse(&argv(&["--http", "all", "extra"]), &flags);

        assert_eq!(parsed.flags.get("http"), Some(&"all".to_string()));
        assert_eq!(parsed.args, vec!["extra"]);
    }

    #[test]
    fn given_flag_followed_by_flag_when_parsing_then_first_is_valueless() {
        let flags = vec![FlagSpec::new("verbose", "").short("V"), FlagSpec::new("out", "")];

        let parsed = ParsedArgs::parse(&argv(&["-V", "--out", "-"]), &flags);

        assert_eq!(parsed.flags.get("V"), Some(&String::new()));
        assert_eq!(parsed.flags.get("out"), Some(&String::new()));
        assert_eq!(parsed.args, vec!["-"]);
    }

    #[test]
    fn given_unknown_flags_when_parsing_then_kept_as_positional() {
        let flags = vec![FlagSpec::new("http", "")];

        let parsed = ParsedArgs::parse(&argv(&["--grpc", "x", "-", "--"]), &flags);

        assert!(parsed.flags.is_empty());
        assert_eq!(parsed.args, vec!["--grpc", "x", "-", "--"]);
    }

    #[test]
    fn given_long_name_with_single_dash_when_parsing_then_recognized_under_typed_name() {
        let flags = vec![FlagSpec::new("output", "").short("o")];

        let parsed = ParsedArgs::parse(&argv(&["-output", "dir", "--o", "x"]), &flags);

        assert_eq!(parsed.flags.get("output"), Some(&"dir".to_string()));
        assert_eq!(parsed.flags.get("o"), Some(&"x".to_string()));
    }

    #[test]
    fn given_required_flag_under_short_name_when_checking_then_ok() {
        let flags = vec![FlagSpec::new("output", "").short("o").required()];
        let parsed = ParsedArgs::parse(&argv(&["-o", "dir"]), &flags);

        assert!(parsed.check_required(&flags).is_ok());
        assert_eq!(flags[0].lookup(&parsed.flags), Some("dir"));
    }

    #[test]
    fn given_duplicate_short_flag_when_validating_then_invalid_schema() {
        let app = AppSpec::new("app", "1", "").command(
            CommandSpec::new("run", "")
                .flag(FlagSpec::new("one", "").short("x"))
                .flag(FlagSpec::new("two", "").short("x")),
        );

        let err = app.validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidSchema { .. }));
    }

    #[test]
    fn given_empty_short_when_building_flag_then_short_is_none() {
        assert_eq!(FlagSpec::new("a", "").short("").short, None);
    }
}
