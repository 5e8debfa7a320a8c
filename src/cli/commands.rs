//! Command dispatch: resolve settings, run the treemap service, print

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{TreeSource, TreemapService};
use crate::cli::args::{Action, Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Fs { path, action }) => {
            run_action(cli, &TreeSource::FileSystem(path.clone()), action)
        }
        Some(Commands::Papers {
            csv,
            no_by_year,
            action,
        }) => {
            let source = TreeSource::Papers {
                csv: csv.clone(),
                by_year: no_by_year.then_some(false),
            };
            run_action(cli, &source, action)
        }
        Some(Commands::Config { command }) => run_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Load settings and apply command line overrides.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    settings.validate()?;
    Ok(settings)
}

#[instrument(skip(cli))]
fn run_action(cli: &Cli, source: &TreeSource, action: &Action) -> CliResult<()> {
    let service = TreemapService::new(resolve_settings(cli)?);
    let mut tree = service.load(source)?;

    match action {
        Action::Layout { expand_all } => {
            service.layout(&mut tree, *expand_all)?;
            for entry in service.layout_report(&tree)? {
                output::rect_line(&entry.rect, &entry.color, &entry.path);
            }
        }
        Action::Hit { x, y, expand_all } => {
            service.layout(&mut tree, *expand_all)?;
            output::info(&service.hit(&tree, *x, *y)?);
        }
        Action::Tree => {
            output::info(&service.tree_report(&tree)?);
            output::header(&service.summary(&tree)?);
        }
        Action::Check => {
            service.layout(&mut tree, true)?;
            service.check(&tree)?;
            output::success(&format!(
                "{} nodes tile {}",
                tree.len(),
                service.bounds()
            ));
        }
    }
    debug!("action {:?} done", action);
    Ok(())
}

fn run_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = resolve_settings(cli)?;
            output::header("# Effective configuration");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if path.exists() { "exists" } else { "not found" };
                output::info(&format!("{} ({})", path.display(), state));
            }
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}
