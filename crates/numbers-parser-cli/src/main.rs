//! numbers-parser CLI - export a Numbers document and parse the export

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use numbers_parser::prelude::*;
use numbers_parser::{
    diagnostics, filter_pages, CommandBuilder, OsascriptConfig, QpdfConfig, QpdfPageCopier,
    StepOutcome, INVOICE_PAGES,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "numbers-parser")]
#[command(
    author,
    version,
    about = "Export a Numbers document through osascript and parse the export into JSON"
)]
struct Cli {
    /// Log format: text (default) or json
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments for `parse`, which runs when no subcommand is given
    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Export CSV and PDF from a .numbers file
    Export(ExportArgs),

    /// Parse an exported CSV into raw and reduced JSON
    Extract(ExtractArgs),

    /// Keep only the invoice pages of the exported PDF
    Invoice(InvoiceArgs),

    /// Export, filter the invoice, then extract (default)
    Parse(ParseArgs),
}

#[derive(Args, Clone, Debug)]
struct ExportArgs {
    /// Source document (.numbers)
    #[arg(long, env = "NUMBERS_SOURCE", value_parser = sanitize_path)]
    source: Option<PathBuf>,

    /// Where Numbers writes the CSV export
    #[arg(long, env = "NUMBERS_DESTINATION", value_parser = sanitize_path)]
    destination: Option<PathBuf>,

    /// Where Numbers writes the raw invoice PDF
    #[arg(long, env = "NUMBERS_INVOICE_RAW", value_parser = sanitize_path)]
    pdf_raw: Option<PathBuf>,

    /// Set one cell before exporting (needs sheet, table, row, column and value)
    #[arg(short, long, alias = "adjust")]
    adjust_before_exporting: bool,

    #[command(flatten)]
    target: TargetArgs,

    /// Close the document after exporting
    #[arg(long)]
    close: bool,

    /// Application brought to the front after exporting
    #[arg(long, value_enum, default_value = "terminal")]
    foreground: ForegroundArg,

    /// Print the scripts that would run instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Path to the osascript executable
    #[arg(long, env = "NUMBERS_OSASCRIPT", default_value = "/usr/bin/osascript")]
    osascript: PathBuf,
}

/// The cell overwritten by `--adjust-before-exporting`
#[derive(Args, Clone, Debug)]
struct TargetArgs {
    /// Sheet holding the cell
    #[arg(long, env = "NUMBERS_SHEET")]
    sheet: Option<String>,

    /// Table holding the cell
    #[arg(long, env = "NUMBERS_TABLE")]
    table: Option<String>,

    /// Row of the cell
    #[arg(long, env = "NUMBERS_ROW")]
    row: Option<String>,

    /// Column of the cell
    #[arg(long, env = "NUMBERS_COLUMN")]
    column: Option<String>,

    /// New value, written into the script unquoted
    #[arg(long, env = "NUMBERS_VALUE")]
    value: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ForegroundArg {
    Terminal,
    Finder,
}

impl From<ForegroundArg> for ForegroundApp {
    fn from(arg: ForegroundArg) -> Self {
        match arg {
            ForegroundArg::Terminal => ForegroundApp::Terminal,
            ForegroundArg::Finder => ForegroundApp::Finder,
        }
    }
}

#[derive(Args, Clone, Debug)]
struct ExtractArgs {
    /// CSV export to parse
    #[arg(long, env = "NUMBERS_TARGET", value_parser = sanitize_path)]
    csv_path: Option<PathBuf>,

    /// Output for the raw rows
    #[arg(long, env = "NUMBERS_PARSED", value_parser = sanitize_path)]
    raw_json_path: Option<PathBuf>,

    /// Output for the reduced ledger
    #[arg(long, env = "NUMBERS_REPARSED", value_parser = sanitize_path)]
    reparsed_json_path: Option<PathBuf>,

    /// How rows are reduced
    #[arg(long, value_enum, default_value = "grouping")]
    strategy: StrategyArg,

    /// Field delimiter of the CSV export
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Identifier column (flatten strategy)
    #[arg(long, default_value = "Invoice ID")]
    id_column: String,

    /// Prefix of the value column (flatten strategy)
    #[arg(long, default_value = "RN")]
    value_prefix: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Grouping,
    Flatten,
    Contacts,
}

#[derive(Args, Clone, Debug)]
struct InvoiceArgs {
    /// Raw invoice PDF exported by Numbers
    #[arg(long, env = "NUMBERS_INVOICE_RAW", value_parser = sanitize_path)]
    invoice_raw: Option<PathBuf>,

    /// Filtered invoice PDF
    #[arg(long, env = "NUMBERS_INVOICE_OUT", value_parser = sanitize_path)]
    invoice_out: Option<PathBuf>,

    /// Path to the qpdf executable
    #[arg(long, env = "NUMBERS_QPDF", default_value = "qpdf")]
    qpdf: PathBuf,
}

#[derive(Args, Clone, Debug)]
struct ParseArgs {
    #[command(flatten)]
    export: ExportArgs,

    #[command(flatten)]
    invoice: InvoiceArgs,

    #[command(flatten)]
    extract: ExtractArgs,
}

/// How a run ended, short of a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Outcome {
    Complete,
    /// Some steps failed but the run carried on
    StepsFailed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Complete => ExitCode::SUCCESS,
            Outcome::StepsFailed => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match cli.command {
        Some(Commands::Export(args)) => export(&args),
        Some(Commands::Extract(args)) => extract_json(&args, None),
        Some(Commands::Invoice(args)) => invoice(&args, None),
        Some(Commands::Parse(args)) => parse(&args),
        None => parse(&cli.parse),
    };

    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let directives = [
        "numbers_parser",
        "numbers_automation",
        "numbers_script",
        "numbers_csv",
        "numbers_ledger",
    ]
    .map(|target| format!("{target}={level}"))
    .join(",");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Trim whitespace and one trailing `:` from a path given on the command line
/// or in the environment.
fn sanitize_path(raw: &str) -> std::result::Result<PathBuf, String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(':').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err("path is empty".to_string());
    }
    Ok(PathBuf::from(trimmed))
}

fn required<'a>(value: &'a Option<PathBuf>, flag: &str, env: &str) -> Result<&'a Path> {
    value
        .as_deref()
        .ok_or_else(|| anyhow!("Missing {flag} (or set {env})"))
}

fn build_request(args: &ExportArgs) -> Result<PipelineRequest> {
    let source = required(&args.source, "--source", "NUMBERS_SOURCE")?;
    let destination = required(&args.destination, "--destination", "NUMBERS_DESTINATION")?;
    let pdf_raw = required(&args.pdf_raw, "--pdf-raw", "NUMBERS_INVOICE_RAW")?;

    let mut request = PipelineRequest::new(source, destination, pdf_raw)
        .with_close_after_export(args.close)
        .with_foreground(args.foreground.into());

    if args.adjust_before_exporting {
        let target = args.target.clone();
        let adjustment = CellAdjustment::from_parts(
            target.sheet,
            target.table,
            target.row,
            target.column,
            target.value,
        )?;
        request = request.with_adjustment(adjustment);
    }
    Ok(request)
}

fn export(args: &ExportArgs) -> Result<Outcome> {
    let request = build_request(args)?;

    if args.dry_run {
        print_plan(&request);
        return Ok(Outcome::Complete);
    }

    println!(
        "Converting {} → {}",
        request.source().display(),
        request.destination().display()
    );

    let bridge = OsascriptBridge::new(OsascriptConfig {
        osascript_path: args.osascript.clone(),
    });
    let report = Pipeline::new(bridge)
        .run(&request)
        .context("Export failed")?;

    for step in report.steps() {
        match &step.outcome {
            StepOutcome::Succeeded => info!("{}: ok", step.kind),
            StepOutcome::Failed(reason) => warn!("{}: {reason}", step.kind),
        }
    }

    if report.is_success() {
        println!("Export complete.");
        Ok(Outcome::Complete)
    } else {
        let failed: Vec<String> = report.failures().map(|s| s.kind.to_string()).collect();
        println!("Export finished with failed steps: {}", failed.join(", "));
        Ok(Outcome::StepsFailed)
    }
}

fn print_plan(request: &PipelineRequest) {
    for command in CommandBuilder::new(request).plan() {
        println!("-- {}", command.kind());
        println!("{}", command.script());
        println!();
    }
    if let Some(adjustment) = request.adjustment() {
        println!("-- diagnostics (not run)");
        println!("{}", diagnostics::describe_target(adjustment));
    }
}

/// `fallback_raw` is the PDF path of a preceding export, used when no raw
/// invoice path was given.
fn invoice(args: &InvoiceArgs, fallback_raw: Option<&Path>) -> Result<Outcome> {
    let raw = match (&args.invoice_raw, fallback_raw) {
        (Some(raw), _) => raw.as_path(),
        (None, Some(raw)) => raw,
        (None, None) => required(&args.invoice_raw, "--invoice-raw", "NUMBERS_INVOICE_RAW")?,
    };
    let out = required(&args.invoice_out, "--invoice-out", "NUMBERS_INVOICE_OUT")?;

    println!("Filtering invoice pages from {}...", raw.display());
    let copier = QpdfPageCopier::new(QpdfConfig {
        qpdf_path: args.qpdf.clone(),
    });
    let report = filter_pages(&copier, raw, out, &INVOICE_PAGES)
        .with_context(|| format!("Failed to filter '{}'", raw.display()))?;

    println!(
        "Kept {} of {} pages in {}",
        report.copied.len(),
        report.page_count,
        out.display()
    );
    Ok(Outcome::Complete)
}

/// `fallback_csv` is the CSV path of a preceding export, used when no CSV
/// path was given.
fn extract_json(args: &ExtractArgs, fallback_csv: Option<&Path>) -> Result<Outcome> {
    let csv = match (&args.csv_path, fallback_csv) {
        (Some(csv), _) => csv.clone(),
        (None, Some(csv)) => csv.to_path_buf(),
        (None, None) => required(&args.csv_path, "--csv-path", "NUMBERS_TARGET")?.to_path_buf(),
    };
    let paths = ExtractPaths {
        csv,
        raw_json: required(&args.raw_json_path, "--raw-json-path", "NUMBERS_PARSED")?
            .to_path_buf(),
        reduced_json: required(
            &args.reparsed_json_path,
            "--reparsed-json-path",
            "NUMBERS_REPARSED",
        )?
        .to_path_buf(),
    };

    let options = CsvReadOptions::with_delimiter(args.delimiter).context("Invalid --delimiter")?;
    let strategy = match args.strategy {
        StrategyArg::Grouping => Strategy::Grouping(GroupingStrategy::default()),
        StrategyArg::Flatten => Strategy::Flatten(FlattenStrategy {
            id_column: args.id_column.clone(),
            value_prefix: args.value_prefix.clone(),
        }),
        StrategyArg::Contacts => Strategy::Contacts(ContactsStrategy),
    };

    let summary = extract(&paths, &options, &strategy)
        .with_context(|| format!("Failed to extract '{}'", paths.csv.display()))?;

    println!("Parsed data saved to {}", paths.raw_json.display());
    println!(
        "Reparsed {} rows into {} {strategy} records at {}",
        summary.rows,
        summary.records,
        paths.reduced_json.display()
    );
    Ok(Outcome::Complete)
}

fn parse(args: &ParseArgs) -> Result<Outcome> {
    let exported = export(&args.export)?;
    if args.export.dry_run {
        return Ok(exported);
    }

    // The invoice PDF is a side product; extraction runs regardless.
    let filtered = match invoice(&args.invoice, args.export.pdf_raw.as_deref()) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Invoice step failed, continuing: {e:#}");
            Outcome::StepsFailed
        }
    };
    let extracted = extract_json(&args.extract, args.export.destination.as_deref())?;

    Ok(exported.max(filtered).max(extracted))
}
