use std::process::ExitCode;

use reviewer::{
    Command, GitHub, Settings, TomlConfig, config, describe_repositories, parse_args, run,
};
use tracing::info;

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let invocation = match parse_args(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let reader = TomlConfig::load(invocation.config.as_deref())?;
    let mut stdout = std::io::stdout();

    match invocation.command {
        Command::Configure => {
            config::check_file(&reader)?;
            let repositories = config::load_repositories(&reader)?;
            describe_repositories(&repositories, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { dry_run } => {
            let settings = Settings::load(&reader)?;
            let forge = GitHub::new(&settings.token)?;
            let summary = run(&forge, &settings.repositories, dry_run, &mut stdout).await?;
            info!(?summary, "run finished");

            Ok(ExitCode::from(summary.exit_status()))
        }
    }
}
