//! # daqmx-errors
//!
//! Look up NI-DAQmx and System Configuration status codes and decode
//! DAQmx extended error messages.

use clap::{Parser, Subcommand};
use daqmx_errors::config::runtime::{env_vars, message_preferences, RuntimeConfig};
use daqmx_errors::logging::{
    self, codes, LogCrateLogger, LogLevel, LoggingService, MemoryLogger, MultiLogger,
};
use daqmx_errors::registry::{ActionRequired, Category, ErrorInfo, ErrorRegistry};
use daqmx_errors::syscfg::{self, StatusInfo};
use daqmx_errors::{log_info, log_success, log_warning, message};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

#[derive(Parser)]
#[command(
    name = "daqmx-errors",
    version,
    about = "NI-DAQmx status code registry"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Leave the registry description off decoded messages
    #[arg(long, global = true)]
    no_description: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe DAQmx status codes
    Lookup {
        #[arg(required = true, allow_negative_numbers = true)]
        codes: Vec<i32>,
    },
    /// Describe System Configuration status codes
    Syscfg {
        #[arg(required = true, allow_negative_numbers = true)]
        codes: Vec<i32>,
    },
    /// List registry entries
    List {
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(long, value_parser = parse_action)]
        action: Option<ActionRequired>,
    },
    /// Decode a DAQmx extended error message (reads stdin when TEXT is omitted)
    Parse {
        text: Option<String>,

        /// Map a driver channel to a config key, e.g. Dev1/ai0=channels.0
        #[arg(long = "channel", value_parser = parse_channel_mapping)]
        channels: Vec<(String, String)>,
    },
    /// Summarize the registry contents
    Stats,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Lookup { .. } => "lookup",
            Commands::Syscfg { .. } => "syscfg",
            Commands::List { .. } => "list",
            Commands::Parse { .. } => "parse",
            Commands::Stats => "stats",
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error("No codes found: {0:?}")]
    NotFound(Vec<i32>),
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}', expected one of {}", s, names.join(", "))
    })
}

fn parse_action(s: &str) -> Result<ActionRequired, String> {
    ActionRequired::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = ActionRequired::ALL.iter().map(|a| a.as_str()).collect();
        format!("unknown action '{}', expected one of {}", s, names.join(", "))
    })
}

fn parse_channel_mapping(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((channel, key)) if !channel.is_empty() && !key.is_empty() => {
            Ok((channel.to_string(), key.to_string()))
        }
        _ => Err(format!("expected CHANNEL=KEY, got '{}'", s)),
    }
}

/// Preferences for this run: environment defaults adjusted by the flags
fn runtime_config(verbose: bool, no_description: bool) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    if verbose {
        config.logging.min_log_level = LogLevel::Debug;
        config.logging.enable_console_logging = true;
    } else if std::env::var_os(env_vars::LOGGING_LEVEL).is_none() {
        // Keep stderr quiet unless something went wrong
        config.logging.min_log_level = LogLevel::Warning;
    }
    if no_description {
        config.message.append_description = false;
    }
    config
}

/// Install preferences and the global logger; the returned buffer sees
/// every event the service lets through
fn init_logging(config: RuntimeConfig, verbose: bool) -> Result<Arc<MemoryLogger>, CliError> {
    config.install().map_err(CliError::Logging)?;
    logging::config::validate_config().map_err(CliError::Logging)?;

    let min_level = logging::config::get_min_log_level();
    let sink = if verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Stderr)
            .init();
        let mut sink = MultiLogger::new(min_level);
        sink.add_logger(Arc::new(LogCrateLogger));
        sink
    } else {
        logging::service::create_configured_multi_logger()
    };
    let (sink, memory) = sink.with_memory();

    let service = LoggingService::new(Arc::new(sink), min_level);
    logging::init_global_logging_with_service(Arc::new(service)).map_err(CliError::Logging)?;
    Ok(memory)
}

/// Error and warning counts plus the full detail of each error, if any
fn diagnostics_report(memory: &MemoryLogger) -> Option<String> {
    let summary = memory.get_summary();
    if !summary.has_errors() && !summary.has_warnings() {
        return None;
    }

    let mut report = format!(
        "{} error(s), {} warning(s) logged",
        summary.error_count, summary.warning_count
    );
    for event in memory.get_errors() {
        report.push('\n');
        report.push_str(&event.format_detailed());
    }
    Some(report)
}

/// System Configuration status without its code, which the report carries
#[derive(Serialize)]
struct StatusDetails {
    name: &'static str,
    group: &'static str,
    description: &'static str,
    is_error: bool,
}

impl From<&StatusInfo> for StatusDetails {
    fn from(status: &StatusInfo) -> Self {
        Self {
            name: status.name,
            group: status.group,
            description: status.description,
            is_error: status.is_error(),
        }
    }
}

#[derive(Serialize)]
struct CodeReport<T: Serialize> {
    code: i32,
    found: bool,
    #[serde(flatten)]
    details: Option<T>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_info(code: i32, info: &ErrorInfo) {
    println!("{}", code);
    println!("  Category: {}", info.category);
    println!("  Action:   {}", info.action_required);
    println!("  {}", info.description);
}

fn print_status(code: i32, status: &StatusDetails) {
    println!("{} ({})", code, status.name);
    println!("  Group: {}", status.group);
    println!("  {}", status.description);
}

fn lookup_codes(codes_in: &[i32], json: bool) -> Result<(), CliError> {
    let registry = ErrorRegistry::global();
    let reports: Vec<CodeReport<&ErrorInfo>> = codes_in
        .iter()
        .map(|&code| {
            let details = registry.get(code);
            match details {
                Some(info) => log_success!(
                    codes::success::STATUS_RESOLVED,
                    "Resolved DAQmx status",
                    "status" => code,
                    "category" => info.category
                ),
                None => log_warning!(
                    codes::registry::UNKNOWN_STATUS_CODE,
                    "Code not in DAQmx registry",
                    "status" => code
                ),
            }
            CodeReport {
                code,
                found: details.is_some(),
                details,
            }
        })
        .collect();

    if json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            match report.details {
                Some(info) => print_info(report.code, info),
                None => println!("{}\n  not found", report.code),
            }
        }
    }

    missing(&reports)
}

fn syscfg_reports(codes_in: &[i32]) -> Vec<CodeReport<StatusDetails>> {
    codes_in
        .iter()
        .map(|&code| {
            let details = syscfg::lookup_status(code).map(StatusDetails::from);
            if details.is_none() {
                log_warning!(
                    codes::registry::UNKNOWN_SYSCFG_STATUS,
                    "Code not in System Configuration table",
                    "status" => code
                );
            }
            CodeReport {
                code,
                found: details.is_some(),
                details,
            }
        })
        .collect()
}

fn lookup_syscfg(codes_in: &[i32], json: bool) -> Result<(), CliError> {
    let reports = syscfg_reports(codes_in);

    if json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            match &report.details {
                Some(status) => print_status(report.code, status),
                None => println!("{}\n  not found", report.code),
            }
        }
    }

    missing(&reports)
}

fn missing<T: Serialize>(reports: &[CodeReport<T>]) -> Result<(), CliError> {
    let missing: Vec<i32> = reports.iter().filter(|r| !r.found).map(|r| r.code).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CliError::NotFound(missing))
    }
}

#[derive(Serialize)]
struct ListRow<'a> {
    code: i32,
    #[serde(flatten)]
    info: &'a ErrorInfo,
}

fn list_entries(
    category: Option<Category>,
    action: Option<ActionRequired>,
    json: bool,
) -> Result<(), CliError> {
    let rows: Vec<ListRow> = ErrorRegistry::global()
        .iter()
        .filter(|(_, info)| category.map_or(true, |c| info.category == c))
        .filter(|(_, info)| action.map_or(true, |a| info.action_required == a))
        .map(|(code, info)| ListRow { code, info })
        .collect();

    if json {
        return print_json(&rows);
    }
    for row in &rows {
        println!(
            "{:>8}  {:<13}  {:<15}  {}",
            row.code, row.info.category, row.info.action_required, row.info.description
        );
    }
    Ok(())
}

fn parse_message(
    text: Option<String>,
    channels: Vec<(String, String)>,
    json: bool,
) -> Result<(), CliError> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let text = text.trim_end();
    let channel_map: HashMap<String, String> = channels.into_iter().collect();

    let parsed = message::parse(text);
    let formatted = message::format(&parsed, text, &channel_map);

    if json {
        return print_json(&serde_json::json!({
            "parsed": parsed,
            "error": formatted,
        }));
    }

    println!("{}", formatted.message);
    if !message_preferences().append_description {
        return Ok(());
    }
    if let Some(info) = parsed.status_code.and_then(daqmx_errors::lookup) {
        println!("\n{} / {}: {}", info.category, info.action_required, info.description);
    }
    Ok(())
}

#[derive(Serialize)]
struct Stats {
    entries: usize,
    declared: usize,
    duplicate_codes: Vec<i32>,
    categories: BTreeMap<String, usize>,
    actions: BTreeMap<String, usize>,
    syscfg_statuses: usize,
    source: String,
}

fn stats(json: bool) -> Result<(), CliError> {
    let registry = ErrorRegistry::global();
    let stats = Stats {
        entries: registry.len(),
        declared: registry.declared_len(),
        duplicate_codes: registry.duplicate_codes().to_vec(),
        categories: Category::ALL
            .iter()
            .map(|c| (c.to_string(), registry.by_category(*c).len()))
            .collect(),
        actions: ActionRequired::ALL
            .iter()
            .map(|a| (a.to_string(), registry.by_action(*a).len()))
            .collect(),
        syscfg_statuses: syscfg::statuses().len(),
        source: daqmx_errors::config::build_info::source_info(),
    };

    if json {
        return print_json(&stats);
    }

    println!("DAQmx entries:       {} ({} declared)", stats.entries, stats.declared);
    println!("Overridden codes:    {:?}", stats.duplicate_codes);
    for (name, count) in &stats.categories {
        println!("  {:<15} {}", name, count);
    }
    for (name, count) in &stats.actions {
        println!("  {:<15} {}", name, count);
    }
    println!("SysCfg statuses:     {}", stats.syscfg_statuses);
    println!("{}", stats.source);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let memory = init_logging(runtime_config(cli.verbose, cli.no_description), cli.verbose)?;
    log_info!("daqmx-errors starting", "version" => env!("CARGO_PKG_VERSION"));

    let command = cli.command.name();
    let result = match cli.command {
        Commands::Lookup { codes } => lookup_codes(&codes, cli.json),
        Commands::Syscfg { codes } => lookup_syscfg(&codes, cli.json),
        Commands::List { category, action } => list_entries(category, action, cli.json),
        Commands::Parse { text, channels } => parse_message(text, channels, cli.json),
        Commands::Stats => stats(cli.json),
    };

    if result.is_ok() {
        let summary = memory.get_summary();
        log_success!(
            codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Command completed",
            "command" => command,
            "warnings" => summary.warning_count
        );
    }
    if cli.verbose {
        if let Some(report) = diagnostics_report(&memory) {
            eprintln!("{}", report);
        }
    }
    result
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        // Lookups already printed "not found" for each missing code
        Err(CliError::NotFound(_)) => ExitCode::FAILURE,
        Err(e @ CliError::Logging(_)) => {
            logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &e.to_string());
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            logging::safe_log_error(codes::system::INTERNAL_ERROR, &e.to_string());
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daqmx_errors::logging::Logger;

    #[test]
    fn test_negative_codes_parse() {
        let cli = Cli::try_parse_from(["daqmx-errors", "lookup", "-200007", "200079"]).unwrap();
        match cli.command {
            Commands::Lookup { codes } => assert_eq!(codes, vec![-200007, 200079]),
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_list_filters_parse() {
        let cli = Cli::try_parse_from([
            "daqmx-errors",
            "--json",
            "list",
            "--category",
            "hardware",
            "--action",
            "Stall",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::List { category, action } => {
                assert_eq!(category, Some(Category::Hardware));
                assert_eq!(action, Some(ActionRequired::Stall));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(Cli::try_parse_from(["daqmx-errors", "list", "--category", "Timing"]).is_err());
    }

    #[test]
    fn test_channel_mapping() {
        assert_eq!(
            parse_channel_mapping("Dev1/ai0=channels.0"),
            Ok(("Dev1/ai0".to_string(), "channels.0".to_string()))
        );
        assert!(parse_channel_mapping("Dev1/ai0").is_err());
        assert!(parse_channel_mapping("=channels.0").is_err());
    }

    #[test]
    fn test_missing_codes_reported() {
        let reports = vec![
            CodeReport::<&ErrorInfo> {
                code: -200007,
                found: true,
                details: daqmx_errors::lookup(-200007),
            },
            CodeReport::<&ErrorInfo> {
                code: 1,
                found: false,
                details: None,
            },
        ];
        match missing(&reports) {
            Err(CliError::NotFound(codes)) => assert_eq!(codes, vec![1]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_code_report_flattens_details() {
        let report = CodeReport {
            code: -200501,
            found: true,
            details: daqmx_errors::lookup(-200501),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["category"], "Hardware");
        assert_eq!(json["found"], true);
    }

    #[test]
    fn test_syscfg_report_has_single_code_key() {
        let reports = syscfg_reports(&[-2147220623, 12345]);

        let found = serde_json::to_string(&reports[0]).unwrap();
        assert_eq!(found.matches("\"code\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&found).unwrap();
        assert_eq!(value["code"], -2147220623);
        assert_eq!(value["name"], "PropDoesNotExist");
        assert_eq!(value["is_error"], true);

        let missing = serde_json::to_value(&reports[1]).unwrap();
        assert_eq!(missing["found"], false);
        assert!(missing.get("name").is_none());
    }

    #[test]
    fn test_runtime_config_from_flags() {
        let config = runtime_config(true, true);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert!(config.logging.enable_console_logging);
        assert!(!config.message.append_description);
    }

    #[test]
    fn test_no_description_flag_is_global() {
        let cli = Cli::try_parse_from(["daqmx-errors", "parse", "text", "--no-description"]).unwrap();
        assert!(cli.no_description);
        assert_eq!(cli.command.name(), "parse");
    }

    #[test]
    fn test_diagnostics_report() {
        let memory = MemoryLogger::new();
        assert_eq!(diagnostics_report(&memory), None);

        memory.log(&logging::LogEvent::warning_with_code(
            codes::registry::UNKNOWN_SYSCFG_STATUS,
            "Code not in System Configuration table",
        ));
        memory.log(
            &logging::LogEvent::error(codes::driver::DRIVER_ERROR, "DAQmx error -200077")
                .with_status_code(-200077),
        );

        let report = diagnostics_report(&memory).unwrap();
        assert!(report.starts_with("1 error(s), 1 warning(s) logged"));
        assert!(report.contains("N001"));
        assert!(report.contains("Recommended action"));
    }
}
