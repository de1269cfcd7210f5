//! Command dispatch: one handler per subcommand, all running against a
//! [`ServiceContainer`].

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::TreeService;
use crate::cli::args::{Cli, Commands, ConfigCommands, FilterArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::OptionalBox;
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    // Completion must work even with a broken config file
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    if !settings.display.color {
        output::disable_colors();
    }
    let container = ServiceContainer::new(settings);
    run(&container, command)
}

/// Dispatch a command against an already wired container.
pub fn run(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Show { file } => cmd_show(container, file),
        Commands::Walk { file, leaves } => cmd_walk(container, file, *leaves),
        Commands::Count { file, filter } => cmd_count(container, file, filter),
        Commands::First { file, filter } => cmd_first(container, file, filter),
        Commands::Sum { file, scale } => cmd_sum(container, file, *scale),
        Commands::Config { command } => cmd_config(container, command),
        Commands::Completion { .. } => Err(CliError::Usage(
            "completion is handled before dispatch".to_string(),
        )),
    }
}

fn service_for(container: &ServiceContainer, filter: &FilterArgs) -> TreeService {
    let policy = filter
        .policy
        .map_or(container.trees.policy(), Into::into);
    container.trees.with_policy(policy)
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = container.trees.load(file)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_walk(container: &ServiceContainer, file: &Path, leaves: bool) -> CliResult<()> {
    let tree = container.trees.load(file)?;
    let values = container.trees.walk(&tree, leaves);
    debug!("walked {} values", values.len());
    output::info(&values.iter().join(" "));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_count(container: &ServiceContainer, file: &Path, filter: &FilterArgs) -> CliResult<()> {
    check_bounds(filter)?;
    let trees = service_for(container, filter);
    let tree = trees.load(file)?;
    let n = trees.count(&tree, &filter.query());
    output::info(&n);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_first(container: &ServiceContainer, file: &Path, filter: &FilterArgs) -> CliResult<()> {
    check_bounds(filter)?;
    let trees = service_for(container, filter);
    let tree = trees.load(file)?;
    match trees.first(&tree, &filter.query()) {
        OptionalBox::Present(value) => output::info(&value),
        OptionalBox::Absent => output::warning("no value matches"),
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_sum(container: &ServiceContainer, file: &Path, scale: i64) -> CliResult<()> {
    let tree = container.trees.load(file)?;
    output::info(&container.trees.sum(&tree, scale)?);
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("# effective configuration");
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if path.exists() { "exists" } else { "not found" };
                output::action(state, &path.display());
            }
            None => output::warning("no config directory on this platform"),
        },
    }
    Ok(())
}

fn check_bounds(filter: &FilterArgs) -> CliResult<()> {
    if let (Some(min), Some(max)) = (filter.min, filter.max) {
        if min > max {
            return Err(CliError::InvalidArgs(format!(
                "--min {min} is greater than --max {max}"
            )));
        }
    }
    Ok(())
}
