//! Blockdex command-line tool
//!
//! Loads block definition sources from disk or HTTP, builds a catalog, and
//! prints it, summarizes it, or lays out annotation dataset templates.

mod dataset;
mod settings;
mod source;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blockdex_core::{BuildReport, CatalogBuilder, DocumentReport, Record, build_documents, merge};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::dataset::DatasetWriter;
use crate::settings::BuildArgs;

/// CLI arguments
#[derive(Parser)]
#[command(name = "blockdex")]
#[command(about = "Extract block definition catalogs from object-literal sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog as JSON
    Catalog {
        #[command(flatten)]
        build: BuildArgs,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Write one CSV annotation template per block
    Dataset {
        #[command(flatten)]
        build: BuildArgs,

        /// Output directory
        #[arg(short, long, default_value = "dataset")]
        out: PathBuf,

        /// Template rows per block
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,

        /// Task type written into every row
        #[arg(short, long, default_value = "explain")]
        task_type: String,
    },
    /// List every block with its shape, event and func presence
    Inspect {
        #[command(flatten)]
        build: BuildArgs,

        /// Emit one JSON object per block instead of text
        #[arg(long)]
        json: bool,
    },
}

/// One line of `inspect --json` output.
#[derive(Debug, Serialize)]
struct InspectRow<'a> {
    category: &'a str,
    name: &'a str,
    skeleton: Option<&'a str>,
    has_func: Option<bool>,
    event: Option<&'a str>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output only
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli.command, &mut stdout.lock()).await
}

/// Executes one subcommand, writing its output to `out`.
async fn run(command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Catalog { build, pretty } => {
            let report = build_report(&build).await?;
            if pretty {
                serde_json::to_writer_pretty(&mut *out, &report)?;
            } else {
                serde_json::to_writer(&mut *out, &report)?;
            }
            writeln!(out)?;
        }
        Commands::Dataset {
            build,
            out: dir,
            rows,
            task_type,
        } => {
            let report = build_report(&build).await?;
            let summary = DatasetWriter::new(&dir)
                .with_rows(rows)
                .with_task_type(task_type)
                .write(&report.catalog)?;
            info!(
                out = %dir.display(),
                categories = summary.categories,
                files = summary.files,
                rows = summary.rows,
                "dataset templates written"
            );
        }
        Commands::Inspect { build, json } => {
            let report = build_report(&build).await?;
            for (i, record) in report.catalog.records().enumerate() {
                if json {
                    let row = InspectRow {
                        category: &record.category,
                        name: &record.name,
                        skeleton: record.fields.skeleton.as_deref(),
                        has_func: record.fields.has_func,
                        event: record.fields.event.as_deref(),
                    };
                    serde_json::to_writer(&mut *out, &row)?;
                    writeln!(out)?;
                } else {
                    write_inspect_entry(out, i + 1, record)?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Text layout of one `inspect` entry; unset fields print as `N/A`.
fn write_inspect_entry(out: &mut impl Write, position: usize, record: &Record) -> io::Result<()> {
    let has_func = match record.fields.has_func {
        Some(flag) => flag.to_string(),
        None => "N/A".to_string(),
    };
    writeln!(out, "{position}. {} [{}]", record.name, record.category)?;
    writeln!(out, "   - skeleton: {}", record.fields.skeleton.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "   - has_func: {has_func}")?;
    writeln!(out, "   - event: {}", record.fields.event.as_deref().unwrap_or("N/A"))
}

/// Loads all inputs and builds one merged catalog.
///
/// Fails only if every document fails; otherwise failed documents are logged
/// and left out.
async fn build_report(args: &BuildArgs) -> Result<BuildReport> {
    let config = settings::resolve(args)?;
    let duplicates = config.duplicates;
    let builder = CatalogBuilder::new(config).context("invalid build configuration")?;

    let documents = source::load_all(&args.inputs).await?;
    let reports = build_documents(&builder, &documents);

    if reports.iter().all(|r| r.result.is_err()) {
        match reports.into_iter().next() {
            Some(DocumentReport {
                name,
                result: Err(e),
            }) => {
                return Err(anyhow::Error::new(e).context(format!("failed to build catalog from {name}")));
            }
            _ => bail!("no documents to build"),
        }
    }

    let report = merge(reports, duplicates)?;
    info!(
        categories = report.catalog.categories().len(),
        records = report.catalog.len(),
        skipped = report.skipped,
        excluded = report.excluded,
        "catalog built"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdex_core::{Fields, Span};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_dataset_command() {
        let cli = Cli::try_parse_from([
            "blockdex",
            "dataset",
            "block_name_id_match.js",
            "--out",
            "out",
            "-n",
            "3",
            "-x",
            "move_x",
        ])
        .unwrap();

        match cli.command {
            Commands::Dataset { build, out, rows, task_type } => {
                assert_eq!(build.inputs, ["block_name_id_match.js"]);
                assert_eq!(build.excludes, ["move_x"]);
                assert_eq!(out, PathBuf::from("out"));
                assert_eq!(rows, 3);
                assert_eq!(task_type, "explain");
            }
            _ => panic!("expected dataset command"),
        }
    }

    #[test]
    fn anchor_conflicts_with_whole() {
        let result = Cli::try_parse_from([
            "blockdex",
            "catalog",
            "block_start.js",
            "--whole",
            "--anchor",
            "getBlocks()",
        ]);
        assert!(result.is_err());
    }

    fn source_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().prefix("block_start").suffix(".js").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn catalog_output_is_plain_json() {
        let file = source_file("// block_start.js\nfoo: \"a\"\n// block_end.js\nbar: \"b\"\n");
        let path = file.path().display().to_string();
        let cli = Cli::try_parse_from(["blockdex", "catalog", path.as_str()]).unwrap();

        let mut out = Vec::new();
        run(cli.command, &mut out).await.unwrap();

        let report: BuildReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(report.catalog.len(), 2);
        assert_eq!(report.catalog.find("bar").unwrap().category, "end");
    }

    #[tokio::test]
    async fn inspect_json_emits_one_object_per_line() {
        let file = source_file("foo: \"a\"\nbar: \"b\"\n");
        let path = file.path().display().to_string();
        let cli = Cli::try_parse_from(["blockdex", "inspect", "--json", path.as_str()]).unwrap();

        let mut out = Vec::new();
        run(cli.command, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "foo");
        assert!(rows[0]["has_func"].is_null());
    }

    #[test]
    fn inspect_text_marks_unset_has_func() {
        let unset = Record::new("foo", Fields::default(), "start", Span::default());
        let evaluated = Record::new(
            "show",
            Fields {
                has_func: Some(false),
                ..Fields::default()
            },
            "looks",
            Span::default(),
        );

        let mut out = Vec::new();
        write_inspect_entry(&mut out, 1, &unset).unwrap();
        write_inspect_entry(&mut out, 2, &evaluated).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "1. foo [start]\n   - skeleton: N/A\n   - has_func: N/A\n   - event: N/A\n\
             2. show [looks]\n   - skeleton: N/A\n   - has_func: false\n   - event: N/A\n"
        );
    }

    #[tokio::test]
    async fn builds_from_file() {
        let mut file = tempfile::Builder::new().prefix("block_looks").suffix(".js").tempfile().unwrap();
        write!(
            file,
            "Entry.blocks = {{ getBlocks() {{ return {{ show: {{ skeleton: 'basic', func(s) {{}} }}, show_prompt: {{}} }}; }} }};"
        )
        .unwrap();

        let args = BuildArgs {
            inputs: vec![file.path().display().to_string()],
            strategy: Some(settings::StrategyKind::DeepSpan),
            category: Some("looks".into()),
            ..BuildArgs::default()
        };
        let report = build_report(&args).await.unwrap();

        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.excluded, 1);
        let show = report.catalog.find("show").unwrap();
        assert_eq!(show.category, "looks");
        assert_eq!(show.fields.has_func, Some(true));
    }
}
