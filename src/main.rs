mod catalog;
mod cli;
mod config;
mod error;
mod logging;
mod mcp;
mod queue;
mod schedule;
mod selection;
mod settings;
mod tui;
mod utils;

use anyhow::{anyhow, bail, Result};
use catalog::Catalog;
use cli::{Cli, Commands, ConfigActions, OutputFormat};
use config::Config;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logging::LogTarget;
use queue::{QueueDriver, QueueEntry, SessionClock, TaskQueue};
use ratatui::{backend::CrosstermBackend, Terminal};
use selection::SelectionController;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tracing::warn;
use tui::App;
use utils::{format_mb, format_millis};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = match Config::load() {
        Ok(config) => run(cli, config),
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    // The TUI and the MCP transport own stdout.
    let target = match cli.command {
        None | Some(Commands::Mcp) => LogTarget::File,
        Some(_) => LogTarget::Stderr,
    };
    let _guard = logging::init(&config.log, target)?;
    let catalog_path = cli.catalog.as_deref();

    match cli.command {
        None => {
            let catalog = load_catalog(&config, catalog_path)?;
            run_tui(config, catalog)?
        }
        Some(Commands::Apps { format }) => {
            print_apps(&load_catalog(&config, catalog_path)?, format)?
        }
        Some(Commands::Schedules { format }) => {
            print_schedules(&load_catalog(&config, catalog_path)?, format)?
        }
        Some(Commands::Kill { apps, all, format }) => {
            let catalog = load_catalog(&config, catalog_path)?;
            let mut selection = SelectionController::kill(&catalog);
            if all {
                selection.select_all();
            } else {
                select_requested(&mut selection, &apps);
            }
            run_queue(&config, selection, format)?
        }
        Some(Commands::ClearCache {
            apps,
            all,
            high,
            format,
        }) => {
            let catalog = load_catalog(&config, catalog_path)?;
            let mut selection = SelectionController::cache(&catalog);
            if all {
                selection.select_all();
            } else if high {
                selection.select_high_cache(config.selection.high_cache_threshold_mb);
            } else {
                select_requested(&mut selection, &apps);
            }
            run_queue(&config, selection, format)?
        }
        Some(Commands::Config { action }) => run_config(action, config)?,
        Some(Commands::Mcp) => {
            let catalog = load_catalog(&config, catalog_path)?;
            tokio::runtime::Runtime::new()
                .map_err(|e| anyhow!("Failed to create tokio runtime: {}", e))?
                .block_on(mcp::run_mcp_server(config, catalog))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_catalog(config: &Config, path: Option<&Path>) -> Result<Catalog> {
    Ok(Catalog::load(&config.catalog, path)?)
}

fn run_tui(config: Config, catalog: Catalog) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, catalog);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn print_apps(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(catalog.apps())?);
        return Ok(());
    }

    println!(
        "{:<4} {:<14} {:<30} {:<8} {:>8}",
        "ID", "NAME", "PACKAGE", "RUNNING", "CACHE"
    );
    for app in catalog.apps() {
        println!(
            "{:<4} {:<14} {:<30} {:<8} {:>8}",
            app.id,
            app.name,
            app.package_name,
            if app.running() { "yes" } else { "no" },
            format_mb(app.cache_mb())
        );
    }
    println!(
        "\n{} apps, {} running, {} reclaimable",
        catalog.apps().len(),
        catalog.running().count(),
        format_mb(catalog.total_cache_mb())
    );
    Ok(())
}

fn print_schedules(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let schedules = catalog.seed_schedules();
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(schedules)?);
        return Ok(());
    }

    if schedules.is_empty() {
        println!("No scheduled cleanups.");
        return Ok(());
    }
    for schedule in schedules {
        println!(
            "{} {} [{}] {} - {} ({} apps)",
            schedule.kind.icon(),
            schedule.name,
            if schedule.enabled { "on" } else { "off" },
            schedule.kind.label(),
            schedule.schedule,
            schedule.selected_apps.len()
        );
    }
    Ok(())
}

fn select_requested(selection: &mut SelectionController, requested: &[String]) {
    selection.select_ids(requested);
    for id in requested {
        if !selection.is_selected(id) {
            warn!(id = %id, screen = selection.screen().title(), "skipping app");
            eprintln!("Skipping {}: not available for {}", id, selection.screen().title());
        }
    }
}

fn run_queue(config: &Config, selection: SelectionController, format: OutputFormat) -> Result<()> {
    if !selection.can_commit() {
        bail!("No apps selected. Use --apps <ids> or --all");
    }

    let entries = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow!("Failed to create tokio runtime: {}", e))?
        .block_on(follow_queue(config, selection, format))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Human => {
            let done = entries.iter().filter(|e| e.status.is_terminal()).count();
            println!("\nDone: {}/{} operation(s) finished", done, entries.len());
        }
    }
    Ok(())
}

/// Commits the selection to a fresh queue and waits until every new entry
/// reaches a terminal status.
async fn follow_queue(
    config: &Config,
    mut selection: SelectionController,
    format: OutputFormat,
) -> Result<Vec<QueueEntry>> {
    let queue = Arc::new(Mutex::new(TaskQueue::from_config(&config.queue)));
    let driver = QueueDriver::spawn(Arc::clone(&queue), SessionClock::start());
    let mut events = driver.subscribe();
    let human = matches!(format, OutputFormat::Human);

    let (ids, names) = {
        let mut queue = queue.lock().await;
        let ids = selection.commit(&mut queue, driver.clock().now())?;
        let names: HashMap<String, String> = ids
            .iter()
            .filter_map(|id| queue.get(id))
            .map(|e| (e.id.clone(), e.app_name.clone()))
            .collect();
        if human {
            println!("Queued {} operation(s):", ids.len());
            for entry in ids.iter().filter_map(|id| queue.get(id)) {
                println!("  {:<14} {}", entry.app_name, entry.command);
            }
            println!();
        }
        (ids, names)
    };
    driver.notify();

    let mut remaining: HashSet<String> = ids.iter().cloned().collect();
    while !remaining.is_empty() {
        match events.recv().await {
            Ok(transition) => {
                if human {
                    if let Some(name) = names.get(&transition.entry_id) {
                        println!(
                            "[{:>6}] {} {:<14} {}",
                            format_millis(transition.at.as_millis()),
                            transition.to.icon(),
                            name,
                            transition.to
                        );
                    }
                }
                if transition.to.is_terminal() {
                    remaining.remove(&transition.entry_id);
                }
            }
            Err(RecvError::Lagged(_)) => {
                let queue = queue.lock().await;
                remaining.retain(|id| queue.get(id).is_some_and(|e| !e.status.is_terminal()));
            }
            Err(RecvError::Closed) => break,
        }
    }

    let entries = {
        let queue = queue.lock().await;
        ids.iter().filter_map(|id| queue.get(id).cloned()).collect()
    };
    driver.shutdown().await;
    Ok(entries)
}

fn run_config(action: ConfigActions, mut config: Config) -> Result<()> {
    match action {
        ConfigActions::Show => {
            println!("Config file: {}", Config::config_path().display());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigActions::Set { key, value } => match config.set_value(&key, &value) {
            Ok(()) => {
                config.save()?;
                println!("Set {} to {}", key, value);
            }
            Err(e) => {
                println!("{}", e);
                let settings: Vec<_> = settings::SettingKey::ALL
                    .iter()
                    .map(|k| k.config_key())
                    .collect();
                println!(
                    "Available keys: {}, {}",
                    Config::KEYS.join(", "),
                    settings.join(", ")
                );
            }
        },
        ConfigActions::Reset => {
            config.settings.reset();
            config.save()?;
            println!("Settings restored to defaults");
        }
        ConfigActions::Export => println!("{}", config.settings.export_json()?),
    }

    Ok(())
}
