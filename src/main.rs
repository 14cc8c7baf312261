use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pam_provider::config::Config;
use pam_provider::pam::PamClient;
use pam_provider::resource::{self, Operation, Outcome, ResourceData};
use pam_provider::VERSION;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Operator CLI for the PAM provider
#[derive(Parser, Debug)]
#[command(name = "pam-provider", version, about, long_about = None)]
struct Args {
    /// Tenant base URL (overrides TENANT / HOST)
    #[arg(long)]
    tenant: Option<String>,

    /// API token (overrides TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Config file (JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered resource and data source types
    Resources,
    /// Refresh one resource by id
    Read { type_name: String, id: String },
    /// Adopt an existing remote object by id
    Import { type_name: String, id: String },
    /// Create (no id in the state file) or update a resource
    Apply { type_name: String, file: PathBuf },
    /// Delete a resource by id
    Delete { type_name: String, id: String },
    /// Run a data source with the arguments in the file
    Data { type_name: String, file: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Failed to open log file {}: {}", log_path.display(), err);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("pam-provider {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("pam-provider").join("pam-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".pam-provider").join("pam-provider.log");
    }
    PathBuf::from("pam-provider.log")
}

/// JSON or YAML, by extension
fn read_state_file(path: &Path) -> Result<ResourceData> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read state file {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))?
    };
    ResourceData::from_value(value).with_context(|| format!("Invalid state in {}", path.display()))
}

fn print(value: &Value, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn outcome_to_value(outcome: &Outcome) -> Result<Value> {
    Ok(json!({
        "state": outcome.state.as_ref().map(ResourceData::to_value),
        "diagnostics": serde_json::to_value(&outcome.diagnostics)?,
    }))
}

fn build_client(args: &Args) -> Result<PamClient> {
    let config = Config::load(args.config.as_deref())?
        .with_env(|key| std::env::var(key).ok())
        .with_overrides(args.tenant.clone(), args.token.clone());
    tracing::debug!("Effective configuration: {:?}", config);

    let options = config.to_client_options()?;
    PamClient::new(options).context("Failed to build PAM client")
}

fn list_types(format: OutputFormat) -> Result<bool> {
    let listing = json!({
        "resources": resource::resource_type_names(),
        "data_sources": resource::data_source_type_names(),
    });
    print(&listing, format)?;
    Ok(true)
}

async fn run(args: Args) -> Result<bool> {
    let outcome = match &args.command {
        Command::Resources => return list_types(args.output),
        Command::Read { type_name, id } => {
            let client = build_client(&args)?;
            resource::run_resource(&client, type_name, Operation::Read, ResourceData::with_id(id)).await
        },
        Command::Import { type_name, id } => {
            let client = build_client(&args)?;
            resource::run_resource(&client, type_name, Operation::Import, ResourceData::with_id(id)).await
        },
        Command::Apply { type_name, file } => {
            let data = read_state_file(file)?;
            let client = build_client(&args)?;
            resource::apply(&client, type_name, data).await
        },
        Command::Delete { type_name, id } => {
            let client = build_client(&args)?;
            resource::run_resource(&client, type_name, Operation::Delete, ResourceData::with_id(id)).await
        },
        Command::Data { type_name, file } => {
            let data = read_state_file(file)?;
            let client = build_client(&args)?;
            resource::read_data_source(&client, type_name, data).await
        },
    };

    print(&outcome_to_value(&outcome)?, args.output)?;
    Ok(!outcome.has_error())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{:?}", err);
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}
