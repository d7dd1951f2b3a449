//! Command execution

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::parse_schema;
use crate::application::services::loader::read_env_file;
use crate::application::services::{ConfigLoader, Dispatcher};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::demo::{self, DemoConfig};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::ExecContext;
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::ProcessEnv;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(InfraError::WorkingDir)?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Check {
            schema,
            env_file,
            no_env_file,
            strict,
        }) => cmd_check(&container, schema, env_file.as_deref(), *no_env_file, *strict),
        Some(Commands::Dotenv { file }) => cmd_dotenv(&container, file),
        Some(Commands::Demo { args }) => cmd_demo(&container, args),
        Some(Commands::Config { command }) => cmd_config(&container, &project_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "envcmd", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see envcmd --help".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_check(
    container: &ServiceContainer,
    schema_path: &Path,
    env_file: Option<&Path>,
    no_env_file: bool,
    strict: bool,
) -> CliResult<()> {
    let content = container
        .fs
        .read_to_string(schema_path)
        .map_err(|e| InfraError::read("schema", schema_path, e))?;
    let schema = parse_schema(&content)?;
    debug!("schema has {} top-level fields", schema.len());

    let mut settings = (*container.settings).clone();
    if let Some(path) = env_file {
        settings.env_file = path.to_path_buf();
    }
    if no_env_file {
        settings.load_env_file = false;
    }
    settings.strict_required |= strict;

    let bound = ConfigLoader::from_settings(container.fs.clone(), &settings).load(&schema)?;

    output::header(&format!("{}", schema_path.display()));
    for (path, value) in bound.flatten() {
        output::binding(&path, value);
    }
    output::success("environment satisfies schema");
    Ok(())
}

#[instrument(skip(container))]
fn cmd_dotenv(container: &ServiceContainer, file: &PathBuf) -> CliResult<()> {
    let env_file = read_env_file(container.fs.as_ref(), file, &ProcessEnv)?;
    print!("{}", env_file.to_exports());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_demo(container: &ServiceContainer, args: &[String]) -> CliResult<()> {
    let cfg: DemoConfig = container.loader().load_into()?;
    demo::log_config(&cfg);

    let dispatcher = Dispatcher::new(demo::app())?;
    let ctx = ExecContext::new();
    let code = dispatcher.execute(&ctx, args, &mut io::stdout(), &mut io::stderr());
    if code == exitcode::OK {
        Ok(())
    } else {
        Err(CliError::Exit(code))
    }
}

fn cmd_config(
    container: &ServiceContainer,
    project_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::warning("no global config directory on this platform"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(project_dir).display()
            ));
            output::detail(&format!(
                "env:    {}",
                container.settings.env_file.display()
            ));
        }
        ConfigCommands::Template => {
            print!("{}", Settings::template());
        }
    }
    Ok(())
}
