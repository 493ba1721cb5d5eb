use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlsx_translator::cli::{self, TranslateOptions};
use xlsx_translator::error::TranslatorResult;

#[derive(Parser)]
#[command(name = "xlsx-translate")]
#[command(about = "Translate the non-English cells, headers and sheet names of a workbook.")]
#[command(long_about = "xlsx-translate - workbook translation through a remote service

Every cell, column header and sheet name containing a non-ASCII character is
sent once to a LibreTranslate-compatible service. Results are cached for the
run, so repeated strings cost a single call. Items that fail to translate keep
their original text.

COMMANDS:
  translate   - Translate a workbook into translated_<name>.xlsx
  scan        - List the strings a translation would send (dry run)

EXAMPLES:
  xlsx-translate translate sales.xlsx --source ja --target en
  xlsx-translate translate sales.xlsx -t en --sheet 売上 --sheet 在庫
  xlsx-translate scan sales.xlsx -v

LOGGING:
  RUST_LOG=xlsx_translator=debug xlsx-translate translate ...")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Translate a workbook.

Loads every worksheet (or the ones given with --sheet), translates sheet
names first, then processes sheets in parallel and writes a new .xlsx file
next to the input named translated_<input name>.xlsx.

CONFIG FILE (--config, YAML):
  source_lang: ja
  target_lang: en
  endpoint: http://localhost:5000/translate
  api_key: secret
  max_concurrent_requests: 500
  workers: 0          # 0 = one per CPU
  timeout_secs: 30

Flags override config file values.")]
    /// Translate a workbook
    Translate {
        /// Path to the workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
        file: PathBuf,

        /// Source language code (empty = auto-detect)
        #[arg(short, long, env = "XLSX_TRANSLATOR_SOURCE")]
        source: Option<String>,

        /// Target language code
        #[arg(short, long, env = "XLSX_TRANSLATOR_TARGET")]
        target: Option<String>,

        /// Output file (default: translated_<name>.xlsx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only translate these sheets (repeatable)
        #[arg(long = "sheet")]
        sheets: Vec<String>,

        /// Translation service URL
        #[arg(long, env = "XLSX_TRANSLATOR_ENDPOINT")]
        endpoint: Option<String>,

        /// Translation service API key
        #[arg(long, env = "XLSX_TRANSLATOR_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Maximum concurrent translation calls
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Sheet workers (0 = one per CPU)
        #[arg(long)]
        workers: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List flagged sheet names, headers and cells without translating
    Scan {
        /// Path to the workbook
        file: PathBuf,

        /// Only scan these sheets (repeatable)
        #[arg(long = "sheet")]
        sheets: Vec<String>,

        /// List every flagged string
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "xlsx_translator=debug"
    } else {
        "xlsx_translator=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> TranslatorResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Translate {
            file,
            source,
            target,
            output,
            sheets,
            endpoint,
            api_key,
            max_concurrent,
            workers,
            timeout,
            config,
            verbose,
        } => {
            init_tracing(verbose);
            let options = TranslateOptions {
                source,
                target,
                output,
                sheets,
                endpoint,
                api_key,
                max_concurrent,
                workers,
                timeout,
                config,
            };
            cli::translate(file, options, verbose).map(|_| ())
        }

        Commands::Scan {
            file,
            sheets,
            verbose,
        } => {
            init_tracing(verbose);
            cli::scan(file, sheets, verbose).map(|_| ())
        }
    }
}
