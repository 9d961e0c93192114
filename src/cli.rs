use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apptools")]
#[command(about = "Kill apps and clear caches on a simulated Android device", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Read apps and schedules from this JSON catalog instead of the built-in sample
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List the device's apps")]
    Apps {
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
    },
    #[command(about = "List scheduled cleanups")]
    Schedules {
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
    },
    #[command(about = "Force-stop running apps")]
    Kill {
        #[arg(short, long, value_delimiter = ',', num_args = 1..)]
        apps: Vec<String>,
        #[arg(long, conflicts_with = "apps")]
        all: bool,
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
    },
    #[command(about = "Clear app caches")]
    ClearCache {
        #[arg(short, long, value_delimiter = ',', num_args = 1..)]
        apps: Vec<String>,
        #[arg(long, conflicts_with_all = ["apps", "high"])]
        all: bool,
        #[arg(long, conflicts_with = "apps", help = "Only apps above the high-cache threshold")]
        high: bool,
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
    },
    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
    #[command(about = "Run as MCP server (for AI integration)")]
    Mcp,
}

#[derive(Subcommand)]
pub enum ConfigActions {
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(short, long)]
        key: String,
        #[arg(short, long)]
        value: String,
    },
    #[command(about = "Restore default settings")]
    Reset,
    #[command(about = "Print settings as JSON")]
    Export,
}

impl Cli {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_kill_apps() {
        let cli = Cli::try_parse_from(["apptools", "kill", "--apps", "1,4"]).unwrap();
        match cli.command {
            Some(Commands::Kill { apps, all, .. }) => {
                assert_eq!(apps, vec!["1", "4"]);
                assert!(!all);
            }
            _ => panic!("expected kill"),
        }
    }

    #[test]
    fn test_all_conflicts_with_apps() {
        assert!(Cli::try_parse_from(["apptools", "clear-cache", "--all", "--apps", "1"]).is_err());
    }

    #[test]
    fn test_no_command_runs_tui() {
        let cli = Cli::try_parse_from(["apptools"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.catalog.is_none());
    }
}
