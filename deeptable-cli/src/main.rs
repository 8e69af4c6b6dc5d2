//! DeepTable command-line host
//!
//! Loads a column schema and a row collection from JSON files, applies the
//! view mutations given on the command line and prints the resulting page.
//!
//! # Usage
//!
//! ```bash
//! # Dogs from Germany, oldest first, second page of five
//! deeptable --schema columns.json --rows dogs.json \
//!     --filter country=Germany --sort max_age:desc --page-size 5 --page 2
//!
//! # Choices offered by a filter column
//! deeptable --schema columns.json --rows dogs.json --options is_dangerous
//!
//! # Full snapshot as JSON
//! deeptable --schema columns.json --rows dogs.json -o json
//! ```

mod output;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::ValueEnum;
use deeptable_lib::TableView;
use deeptable_lib::ViewConfig;
use deeptable_lib::model::Column;
use deeptable_lib::model::Row;
use deeptable_lib::model::Schema;
use deeptable_lib::sort::SortState;
use log::info;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use output::OutputFormat;

/// Print one page of a JSON dataset as a table
#[derive(Parser, Debug)]
#[command(name = "deeptable", version, about)]
struct Args {
    /// Column schema (JSON array of column descriptors)
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Rows (JSON array of objects)
    #[arg(short, long, value_name = "FILE")]
    rows: PathBuf,

    /// View configuration (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Filter constraint, repeatable (`null` selects the Unknown bucket)
    #[arg(short, long, value_name = "COLUMN=VALUE")]
    filter: Vec<String>,

    /// Search fragment, repeatable
    #[arg(long, value_name = "COLUMN=TEXT")]
    search: Vec<String>,

    /// Sort column, optionally followed by `:desc`
    #[arg(long, value_name = "COLUMN[:asc|:desc]")]
    sort: Option<String>,

    /// Rows per page, overriding the configuration
    #[arg(long)]
    page_size: Option<usize>,

    /// Page to show
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Show every filtered row on one page
    #[arg(long)]
    no_pagination: bool,

    /// Select a row of the shown page by position, repeatable
    #[arg(long, value_name = "POSITION")]
    select: Vec<usize>,

    /// Select every row of the shown page
    #[arg(long)]
    select_page: bool,

    /// List the choices of a filter column instead of printing rows
    #[arg(long, value_name = "COLUMN")]
    options: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormatArg,

    /// Log file
    #[arg(long, value_name = "FILE", default_value = "deeptable.log")]
    log_file: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevelArg,
}

/// Log level argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Formatted table with a pagination line
    Table,
    /// The full view snapshot as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file.display()))?;
    WriteLogger::init(args.log_level.into(), Config::default(), log_file)
        .context("cannot initialize logger")?;

    let config = load_config(&args)?;
    let schema = load_schema(&args.schema)?;
    let rows: Vec<Row> = read_json(&args.rows)?;
    info!(
        "loaded {} rows over {} columns",
        rows.len(),
        schema.len()
    );

    let mut view = TableView::new(schema, rows, config)?;

    if let Some(column) = &args.options {
        let options = view.filter_options(column)?;
        println!("{}", output::format_options(&options, args.output.into()));
        return Ok(());
    }

    apply_args(&mut view, &args)?;
    println!("{}", output::format_view(&view, args.output.into()));
    Ok(())
}

fn load_config(args: &Args) -> Result<ViewConfig> {
    let mut config = match &args.config {
        Some(path) => read_json(path)?,
        None => ViewConfig::default(),
    };

    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if args.no_pagination {
        config.pagination = false;
    }
    if !args.select.is_empty() || args.select_page {
        config.selectable = true;
    }
    Ok(config)
}

fn load_schema(path: &Path) -> Result<Schema> {
    let columns: Vec<Column> = read_json(path)?;
    Ok(Schema::new(columns)?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", path.display()))
}

/// Applies the mutations in the order a user would: narrow, sort, page, select.
fn apply_args(view: &mut TableView, args: &Args) -> Result<()> {
    for pair in &args.filter {
        let (column, value) = split_pair(pair)?;
        view.set_filter_option(column, value)?;
    }
    for pair in &args.search {
        let (column, text) = split_pair(pair)?;
        view.set_search(column, text)?;
    }
    if let Some(sort) = &args.sort {
        view.set_sort(parse_sort(sort)?)?;
    }
    if args.page != 1 {
        view.go_to_page(args.page)?;
    }

    if args.select_page {
        view.select_visible()?;
    }
    for &position in &args.select {
        let Some(row) = view.visible_rows().get(position).cloned() else {
            bail!(
                "no row at position {} on this page ({} rows shown)",
                position,
                view.visible_rows().len()
            );
        };
        view.toggle_row(&row, true)?;
    }
    Ok(())
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .with_context(|| format!("expected COLUMN=VALUE, got '{pair}'"))
}

fn parse_sort(arg: &str) -> Result<SortState> {
    match arg.rsplit_once(':') {
        Some((column, "asc")) => Ok(SortState::asc(column)),
        Some((column, "desc")) => Ok(SortState::desc(column)),
        Some((_, direction)) => bail!("unknown sort direction '{direction}'"),
        None => Ok(SortState::asc(arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("age").unwrap(), SortState::asc("age"));
        assert_eq!(parse_sort("age:desc").unwrap(), SortState::desc("age"));
        assert!(parse_sort("age:sideways").is_err());
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("country=Germany").unwrap(), ("country", "Germany"));
        assert_eq!(split_pair("note=a=b").unwrap(), ("note", "a=b"));
        assert!(split_pair("country").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "deeptable",
            "--schema",
            "s.json",
            "--rows",
            "r.json",
            "--filter",
            "country=Germany",
            "--filter",
            "is_dangerous=null",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.filter.len(), 2);
        assert_eq!(args.page, 1);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
        assert_eq!(args.log_file, PathBuf::from("deeptable.log"));
    }
}
