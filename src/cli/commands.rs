use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{AvlTree, CycleReport, Driver, TreeDisplay};
use crate::cli::args::{Cli, Commands, ConfigCommands, RunArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, DriverSettings, RawDriverSettings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        Some(Commands::Run(args)) => _run(config, args),
        Some(Commands::Tree {
            keys,
            remove,
            remove_upper,
        }) => _tree(keys, remove, *remove_upper),
        Some(Commands::Values { keys }) => _values(keys),
        Some(Commands::Config { command }) => _config(config, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

impl RunArgs {
    /// Flags given on the command line, as the topmost settings layer.
    pub fn overlay(&self) -> RawDriverSettings {
        RawDriverSettings {
            max_count: self.max_count,
            min_count: self.min_count,
            cycles: self.cycles,
            upper_bound: self.upper_bound,
            seed: self.seed,
        }
    }
}

#[instrument]
fn _run(config: Option<&Path>, args: &RunArgs) -> CliResult<()> {
    let settings = DriverSettings::load(config)?.merge_with(&args.overlay());
    debug!(?settings, "effective driver settings");

    let driver = Driver::new(settings)?;
    output::header(&format!(
        "{} keys, {} kept, {} cycles, upper bound {}, seed {}",
        settings.max_count, settings.min_count, settings.cycles, settings.upper_bound, settings.seed
    ));
    let reports = driver.run().inspect_err(|e| output::failure(e))?;
    for report in &reports {
        output::success(&format_report(report));
    }
    Ok(())
}

fn format_report(report: &CycleReport) -> String {
    format!(
        "cycle {}: inserted {}, removed {} (left {}), removed above bound {}, remaining {}, height {}",
        report.cycle,
        report.inserted,
        report.removed,
        report.after_removal,
        report.removed_upper,
        report.remaining,
        report.height
    )
}

#[instrument]
fn _tree(keys: &[i64], remove: &[i64], remove_upper: Option<i64>) -> CliResult<()> {
    let mut tree: AvlTree<i64> = keys.iter().copied().collect();
    for key in remove {
        if !tree.remove(key) {
            output::detail(&format!("{} not found", key));
        }
    }
    if let Some(bound) = remove_upper {
        let removed = tree.remove_upper(&bound);
        output::detail(&format!("removed {} keys above {}", removed, bound));
    }
    output::info(&tree.to_tree_string());
    output::info(&tree.summary());
    Ok(())
}

#[instrument]
fn _values(keys: &[i64]) -> CliResult<()> {
    let tree: AvlTree<i64> = keys.iter().copied().collect();
    print!("{}", tree.render_values());
    Ok(())
}

#[instrument]
fn _config(config: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = DriverSettings::load(config)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&DriverSettings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .ok_or_else(|| CliError::InvalidArgs("no home directory found".into()))?;
            output::info(&format!("global: {}", global.display()));
            if let Some(path) = config {
                output::info(&format!("explicit: {}", path.display()));
            }
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
