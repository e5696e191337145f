use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use findbolig::parser::Extractor;
use findbolig::types::Credentials;
use findbolig::{FindboligClient, HistoryFile, PortalConfig, RunOptions};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "findbolig")]
#[command(about = "Records your findbolig.nu waitlist placements in a CSV file", long_about = None)]
struct Cli {
    #[arg(
        short = 'u',
        long,
        env = "FINDBOLIG_USERNAME",
        help = "Your username on findbolig.nu"
    )]
    username: String,

    #[arg(
        short = 'p',
        long,
        env = "FINDBOLIG_PASSWORD",
        hide_env_values = true,
        help = "Your password on findbolig.nu"
    )]
    password: String,

    #[arg(short = 'o', long, value_name = "FILE", help = "The output CSV file")]
    output: PathBuf,

    #[arg(
        short = 'l',
        long = "log",
        value_enum,
        ignore_case = true,
        default_value = "warning",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "0",
        value_parser = parse_delay,
        help = "Pause between waitlist rank requests"
    )]
    delay: Duration,

    #[arg(long, default_value = "https://www.findbolig.nu/", help = "Portal base URL")]
    base_url: String,

    #[arg(
        long,
        value_enum,
        default_value = "pattern",
        help = "How to read the portal's HTML"
    )]
    extractor: ExtractorKind,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "text",
        help = "Summary format"
    )]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    #[value(alias = "critical")]
    Error,
    #[value(alias = "warning")]
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

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtractorKind {
    /// Regular expressions over the raw page
    Pattern,
    /// CSS selectors over a parsed document
    Dom,
}

impl From<ExtractorKind> for Extractor {
    fn from(kind: ExtractorKind) -> Self {
        match kind {
            ExtractorKind::Pattern => Extractor::Pattern,
            ExtractorKind::Dom => Extractor::Dom,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_delay(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("Invalid delay '{s}': {e}"))
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .format(|buf, record| writeln!(buf, "{}\t{}", record.level(), record.args()))
        .init();

    if let OutputFormat::Text = cli.format {
        println!("findbolig waitlist extractor v{}\n", env!("CARGO_PKG_VERSION"));
    }

    let client = FindboligClient::new(PortalConfig::new(cli.base_url), cli.extractor.into())
        .unwrap_or_else(|e| {
            log::error!("Error creating client: {}", e);
            process::exit(1);
        });

    let credentials = Credentials::new(cli.username, cli.password);
    let history = HistoryFile::new(cli.output);
    let options = RunOptions {
        delay: cli.delay,
        ..RunOptions::default()
    };

    let placements =
        findbolig::run(&client, &credentials, &history, &options).unwrap_or_else(|e| {
            log::error!("{}", e);
            process::exit(e.exit_code());
        });

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&placements) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => print!("{}", placements),
    }
}
