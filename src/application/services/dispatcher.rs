//! Command dispatch service
//!
//! Routes an argument vector to the matching command or subcommand handler.

use std::io::Write;

use tracing::{debug, instrument};

use crate::application::help;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    AppSpec, CommandSpec, DomainError, ExecContext, FlagSpec, Handler, ParsedArgs,
    SubCommandSpec,
};
use crate::exitcode;

/// Dispatches argv against a validated [`AppSpec`].
#[derive(Debug)]
pub struct Dispatcher {
    app: AppSpec,
}

/// What a dispatch resolved to before running anything.
enum Route<'a> {
    Help,
    Version,
    Target {
        flags: &'a [FlagSpec],
        handler: Option<&'a Handler>,
        tokens: &'a [String],
        command: &'a CommandSpec,
        subcommand: Option<&'a SubCommandSpec>,
    },
}

impl Dispatcher {
    /// Create a dispatcher; fails if flag or command names collide.
    pub fn new(app: AppSpec) -> ApplicationResult<Self> {
        app.validate()?;
        Ok(Self { app })
    }

    pub fn app(&self) -> &AppSpec {
        &self.app
    }

    /// Run the handler selected by `argv`.
    ///
    /// Help, version and diagnostics go to `out`. Handler errors come back
    /// as [`ApplicationError::Handler`].
    #[instrument(level = "debug", skip(self, ctx, out))]
    pub fn dispatch(
        &self,
        ctx: &ExecContext,
        argv: &[String],
        out: &mut dyn Write,
    ) -> ApplicationResult<()> {
        let (flags, handler, tokens, command, subcommand) = match self.route(argv, out)? {
            Route::Help => {
                return help::write_app_help(out, &self.app).with_context("write help");
            }
            Route::Version => {
                return help::write_version(out, &self.app).with_context("write version");
            }
            Route::Target {
                flags,
                handler,
                tokens,
                command,
                subcommand,
            } => (flags, handler, tokens, command, subcommand),
        };

        let parsed = ParsedArgs::parse(tokens, flags);
        debug!(args = ?parsed.args, flags = ?parsed.flags, "parsed invocation");
        parsed.check_required(flags)?;

        let Some(handler) = handler else {
            debug!("{} has no handler, showing help", command.name);
            let written = match subcommand {
                Some(sub) => help::write_subcommand_help(out, command, sub),
                None => help::write_command_help(out, command),
            };
            return written.with_context("write help");
        };

        handler(ctx, &parsed.args, &parsed.flags).map_err(ApplicationError::Handler)
    }

    fn route<'a>(
        &'a self,
        argv: &'a [String],
        out: &mut dyn Write,
    ) -> ApplicationResult<Route<'a>> {
        match argv.first().map(String::as_str) {
            Some("--help" | "-h") => return Ok(Route::Help),
            Some("--version" | "-v") => return Ok(Route::Version),
            None => return Ok(Route::Help),
            Some(_) if self.app.commands.is_empty() => return Ok(Route::Help),
            Some(_) => {}
        }

        let name = &argv[0];
        let Some(command) = self.app.find_command(name) else {
            writeln!(out, "Unknown command: {name}").with_context("write diagnostic")?;
            help::write_app_help(out, &self.app).with_context("write help")?;
            return Err(DomainError::UnknownCommand(name.clone()).into());
        };

        if !command.subcommands.is_empty() && argv.len() > 1 {
            let sub_name = &argv[1];
            let Some(sub) = command.find_subcommand(sub_name) else {
                writeln!(out, "Unknown subcommand: {sub_name} for command {name}")
                    .with_context("write diagnostic")?;
                help::write_command_help(out, command).with_context("write help")?;
                return Err(DomainError::UnknownSubCommand {
                    command: name.clone(),
                    name: sub_name.clone(),
                }
                .into());
            };
            debug!("matched {} {}", command.name, sub.name);
            return Ok(Route::Target {
                flags: &sub.flags,
                handler: sub.handler.as_ref(),
                tokens: &argv[2..],
                command,
                subcommand: Some(sub),
            });
        }

        debug!("matched {}", command.name);
        Ok(Route::Target {
            flags: &command.flags,
            handler: command.handler.as_ref(),
            tokens: &argv[1..],
            command,
            subcommand: None,
        })
    }

    /// Dispatch and turn the outcome into an exit status.
    ///
    /// Errors are reported on `err` as `Error: <message>`.
    pub fn execute(
        &self,
        ctx: &ExecContext,
        argv: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> i32 {
        match self.dispatch(ctx, argv, out) {
            Ok(()) => exitcode::OK,
            Err(e) => {
                let _ = writeln!(err, "Error: {e}");
                exitcode::FAILURE
            }
        }
    }
}
