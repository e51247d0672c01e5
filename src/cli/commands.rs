//! Command handlers: one function per subcommand

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, error, instrument};

use crate::application::services::Submission;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{MergeMode, MergeOutcome};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Dispatch the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `groc --help`".to_string(),
        ));
    };

    // Completions need neither config nor storage.
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let dir = local_dir(cli)?;
    let settings = Settings::load(Some(&dir))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Add {
            item,
            available,
            brand,
            mode,
        } => cmd_add(&container, item, brand, available, *mode),
        Commands::List => cmd_list(&container),
        Commands::Clear { yes } => cmd_clear(&container, *yes, &mut io::stdin().lock()),
        Commands::Export { output } => cmd_export(&container, &dir, output.as_deref()),
        Commands::Info => cmd_info(&container),
        Commands::Config { command } => cmd_config(&container, &dir, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        ))),
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

#[instrument(skip(container))]
fn cmd_add(
    container: &ServiceContainer,
    item: &str,
    brand: &str,
    available: &str,
    mode: Option<MergeMode>,
) -> CliResult<()> {
    let mode = mode.unwrap_or(container.settings.default_mode);
    let service = container.inventory();
    let mut ledger = service.load()?;

    let outcome = service.submit(&mut ledger, Submission::new(item, brand, available), mode)?;

    let msg = match &outcome {
        MergeOutcome::Inserted(e) => format!("added {} ({}): {}", e.item, e.brand, e.available),
        MergeOutcome::Incremented { previous, entry } => format!(
            "{} ({}): {} -> {}",
            entry.item, entry.brand, previous, entry.available
        ),
        MergeOutcome::Replaced { previous, entry } => format!(
            "{} ({}): {} -> {} (replaced)",
            entry.item, entry.brand, previous, entry.available
        ),
    };
    output::success(&msg);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer) -> CliResult<()> {
    let ledger = container.inventory().load()?;
    let document = container.exporter().document(&ledger);

    output::header(&document.title);
    output::table(&document);
    if ledger.is_empty() {
        output::info("(no items)");
    }
    Ok(())
}

/// Clear all data, asking on `input` unless `yes` is set.
#[instrument(skip(container, input))]
fn cmd_clear(container: &ServiceContainer, yes: bool, input: &mut dyn BufRead) -> CliResult<()> {
    let service = container.inventory();
    let mut ledger = service.load()?;

    if !yes {
        output::prompt(&format!("Remove all {} items? [y/N]", ledger.len()));
        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .map_err(|e| InfraError::io("read confirmation", e))?;
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            output::info("Aborted.");
            return Ok(());
        }
    }

    let count = ledger.len();
    service.clear(&mut ledger)?;
    output::success(&format!("cleared {count} items"));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_export(container: &ServiceContainer, dir: &Path, target: Option<&Path>) -> CliResult<()> {
    let target = match target {
        Some(path) => path.to_path_buf(),
        None => dir.join(&container.settings.export.file_name),
    };
    let ledger = container.inventory().load()?;

    match container.exporter().export(&ledger, &target) {
        Ok(report) => {
            output::success(&format!(
                "exported {} items to {} ({} bytes)",
                report.rows,
                report.path.display(),
                report.bytes
            ));
            Ok(())
        }
        Err(e) => {
            error!(path = %target.display(), "export failed: {e}");
            Err(e.into())
        }
    }
}

#[instrument(skip(container))]
fn cmd_info(container: &ServiceContainer) -> CliResult<()> {
    let service = container.inventory();
    let ledger = service.load()?;

    output::action("storage", &container.store.describe(service.key()));
    output::action("key", &service.key());
    output::action("items", &ledger.len());
    output::action("default mode", &container.settings.default_mode);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_config(container: &ServiceContainer, dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(dir)
            };
            if container.fs.exists(&path) && !force {
                output::warning(&format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
                return Ok(());
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, Settings::template().as_bytes())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::action("global", &global);
            output::action("local", &local_config_path(dir).display());
            output::action("data", &container.settings.data_dir.display());
            Ok(())
        }
    }
}
