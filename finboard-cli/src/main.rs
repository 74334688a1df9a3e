mod commands;

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use finboard_lib::model::Role;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

/// Inspect dashboard display configs, filters and rules from the command line.
#[derive(Parser, Debug)]
#[command(name = "finboard", version, about)]
struct Cli {
    /// Dashboard API base URL, used when data is fetched instead of read from files
    #[arg(long, env = "FINBOARD_URL", global = true)]
    url: Option<String>,

    /// Bearer token sent to the dashboard API
    #[arg(long, env = "FINBOARD_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build column specs from a display config
    Columns {
        #[command(flatten)]
        source: ColumnSource,

        /// Role of the user the columns are built for
        #[arg(long, value_enum, default_value_t = RoleArg::Viewer)]
        role: RoleArg,
    },
    /// Render rows with the columns of a display config
    Render {
        #[command(flatten)]
        source: ColumnSource,

        /// JSON file with an array of rows
        #[arg(long, value_name = "PATH", conflicts_with = "widget")]
        rows: Option<PathBuf>,

        /// Fetch the rows of this widget instead
        #[arg(long)]
        widget: Option<String>,

        /// JSON file with an array of tag paths that already exist
        #[arg(long, value_name = "PATH")]
        known_tags: Option<PathBuf>,

        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Search rule cards
    Search {
        /// Search term; empty matches every rule
        #[arg(default_value = "")]
        term: String,

        /// JSON file with an array of rule cards; fetched from the API if omitted
        #[arg(long, value_name = "PATH")]
        rules: Option<PathBuf>,
    },
    /// Translate filter values into query parameters
    Translate {
        /// JSON file with an array of filter descriptors
        #[arg(long, value_name = "PATH")]
        filters: PathBuf,

        /// JSON file mapping filter keys to values
        #[arg(long, value_name = "PATH")]
        values: PathBuf,

        /// Only include filters scoped to this widget
        #[arg(long)]
        widget: Option<String>,
    },
}

/// Where column descriptors come from.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct ColumnSource {
    /// JSON file with a display-config response
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fetch the display config of this dataset
    #[arg(long)]
    dataset: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum RoleArg {
    Admin,
    Member,
    Viewer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Member => Role::Member,
            RoleArg::Viewer => Role::Viewer,
        }
    }
}

fn init_logging(level: LogLevel, file: Option<&PathBuf>) -> Result<()> {
    let level = LevelFilter::from(level);
    match file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => {
            TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_file.as_ref())?;

    let remote = commands::Remote::new(cli.url, cli.token);
    match cli.command {
        Command::Columns { source, role } => {
            let descriptors = remote.descriptors(source.config, source.dataset).await?;
            commands::columns(&descriptors, role.into())
        }
        Command::Render {
            source,
            rows,
            widget,
            known_tags,
            json,
        } => {
            let descriptors = remote.descriptors(source.config, source.dataset).await?;
            let rows = remote.rows(rows, widget).await?;
            commands::render(&descriptors, &rows, known_tags, json)
        }
        Command::Search { term, rules } => {
            let rules = remote.rules(rules).await?;
            commands::search(&rules, &term)
        }
        Command::Translate {
            filters,
            values,
            widget,
        } => commands::translate(&filters, &values, widget.as_deref()),
    }
}
