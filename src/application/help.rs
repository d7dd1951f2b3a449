//! Help and version text for dispatcher apps

use std::io::{self, Write};

use crate::domain::{AppSpec, CommandSpec, FlagSpec, SubCommandSpec};

pub fn write_version(out: &mut dyn Write, app: &AppSpec) -> io::Result<()> {
    writeln!(out, "{} version {}", app.name, app.version)
}

/// Full app help: every command with its flags or subcommands.
pub fn write_app_help(out: &mut dyn Write, app: &AppSpec) -> io::Result<()> {
    writeln!(out, "{} - {}\n", app.name, app.description)?;
    writeln!(out, "Version: {}\n", app.version)?;

    if app.commands.is_empty() {
        return Ok(());
    }

    writeln!(out, "Available commands:")?;
    for cmd in &app.commands {
        writeln!(out, "  {} - {}", cmd.name, cmd.short)?;

        if cmd.subcommands.is_empty() && !cmd.flags.is_empty() {
            writeln!(out, "    Flags:")?;
            write_flags(out, &cmd.flags, 6)?;
        }

        if !cmd.subcommands.is_empty() {
            writeln!(out, "    Subcommands:")?;
            write_subcommands(out, &cmd.subcommands, 6)?;
        }
    }
    writeln!(out, "\nUse --help for more information about a command.")
}

pub fn write_command_help(out: &mut dyn Write, cmd: &CommandSpec) -> io::Result<()> {
    writeln!(out, "{} - {}", cmd.name, cmd.short)?;
    if !cmd.long.is_empty() {
        writeln!(out, "\n{}", cmd.long)?;
    }

    if cmd.subcommands.is_empty() && !cmd.flags.is_empty() {
        writeln!(out, "\nFlags:")?;
        write_flags(out, &cmd.flags, 2)?;
    }

    if !cmd.subcommands.is_empty() {
        writeln!(out, "\nSubcommands:")?;
        write_subcommands(out, &cmd.subcommands, 2)?;
    }
    Ok(())
}

pub fn write_subcommand_help(
    out: &mut dyn Write,
    cmd: &CommandSpec,
    sub: &SubCommandSpec,
) -> io::Result<()> {
    writeln!(out, "{} {} - {}", cmd.name, sub.name, sub.short)?;
    if !sub.long.is_empty() {
        writeln!(out, "\n{}", sub.long)?;
    }
    if !sub.flags.is_empty() {
        writeln!(out, "\nFlags:")?;
        write_flags(out, &sub.flags, 2)?;
    }
    Ok(())
}

fn write_subcommands(
    out: &mut dyn Write,
    subs: &[SubCommandSpec],
    indent: usize,
) -> io::Result<()> {
    for sub in subs {
        writeln!(out, "{:indent$}{} - {}", "", sub.name, sub.short)?;
        if !sub.flags.is_empty() {
            writeln!(out, "{:width$}Flags:", "", width = indent + 2)?;
            write_flags(out, &sub.flags, indent + 4)?;
        }
    }
    Ok(())
}

fn write_flags(out: &mut dyn Write, flags: &[FlagSpec], indent: usize) -> io::Result<()> {
    for flag in flags {
        let required = if flag.required { " (required)" } else { "" };
        writeln!(
            out,
            "{:indent$}{}: {}{}",
            "",
            flag.spelling(),
            flag.usage,
            required
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommandSpec;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn given_app_with_subcommands_when_rendering_help_then_lists_nested_flags() {
        let app = AppSpec::new("myapp", "1.0.0", "demo").command(
            CommandSpec::new("db", "Database operations").subcommand(
                SubCommandSpec::new("create_sql", "Generate SQL files")
                    .flag(FlagSpec::new("output", "Output directory").short("o")),
            ),
        );

        let text = render(|out| write_app_help(out, &app));

        assert!(text.starts_with("myapp - demo\n\nVersion: 1.0.0\n\n"));
        assert!(text.contains("  db - Database operations\n    Subcommands:\n"));
        assert!(text.contains("      create_sql - Generate SQL files\n        Flags:\n"));
        assert!(text.contains("          --output, -o: Output directory\n"));
    }

    #[test]
    fn given_command_with_long_text_when_rendering_then_includes_it() {
        let cmd = CommandSpec::new("serve", "Start")
            .long_about("Starts everything")
            .flag(FlagSpec::new("http", "HTTP config").required());

        let text = render(|out| write_command_help(out, &cmd));

        assert_eq!(
            text,
            "serve - Start\n\nStarts everything\n\nFlags:\n  --http: HTTP config (required)\n"
        );
    }

    #[test]
    fn given_app_when_rendering_version_then_single_line() {
        let app = AppSpec::new("myapp", "1.0.0", "");
        assert_eq!(render(|out| write_version(out, &app)), "myapp version 1.0.0\n");
    }
}
