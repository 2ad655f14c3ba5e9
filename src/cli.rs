use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum CommandArgs {
    /// Score open pull requests and merge the ones that pass review (default)
    Run,
    /// Validate the configuration and list the configured repositories
    Configure,
}

#[derive(Parser, Debug)]
#[command(
    name = "reviewer",
    about = "Code review your pull requests: merge the ones whose +1/-1 comment score meets each repository's threshold"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Config file (default is $HOME/.reviewer.toml)
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Report what would be merged without merging anything
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<CommandArgs>,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { dry_run: bool },
    Configure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Parses command-line arguments into an [`Invocation`].
///
/// Help and version requests surface as a `clap::Error` inside the
/// returned error so the caller can print them and exit cleanly.
pub fn parse_args<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;

    let command = match cli.command.unwrap_or(CommandArgs::Run) {
        CommandArgs::Run => Command::Run {
            dry_run: cli.dry_run,
        },
        CommandArgs::Configure => {
            if cli.dry_run {
                anyhow::bail!("--dry-run only applies to the run command");
            }
            Command::Configure
        }
    };

    Ok(Invocation {
        config: cli.config,
        command,
    })
}
