use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use citegraph_core::config_file::{self, ConfigFile};
use citegraph_graph::{CitationConfig, GraphError};
use citegraph_ingest::{IngestError, ProgressEvent};
use citegraph_parsing::{ParsingConfig, ParsingConfigBuilder};
use citegraph_reporting::ExportConfig;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt};

mod output;

use output::ColorMode;

/// Citation graph builder - segment paper bibliographies and link papers that cite each other
#[derive(Parser, Debug)]
#[command(name = "citegraph", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file to use instead of the platform and ./.citegraph.toml files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn every paper's References.txt into a cleaned, one-per-line reference list
    References {
        /// Directory holding one sub-directory per paper
        #[arg(long)]
        sections_dir: Option<PathBuf>,

        /// Where `<paper>_references.txt` files are written
        #[arg(long)]
        references_dir: Option<PathBuf>,
    },

    /// Build, analyze and export the citation graph from reference lists
    Graph {
        /// Directory of `*_sections_references.txt` files
        #[arg(long)]
        references_dir: Option<PathBuf>,

        /// Where paper_graph.json and paper_graph.dot are written
        #[arg(long)]
        graph_dir: Option<PathBuf>,

        /// Write the analysis report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run `references` then `graph`
    Run {
        #[arg(long)]
        sections_dir: Option<PathBuf>,

        #[arg(long)]
        references_dir: Option<PathBuf>,

        #[arg(long)]
        graph_dir: Option<PathBuf>,

        /// Write the analysis report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Everything a run needs, resolved from flags, environment, config files
/// and defaults.
struct Settings {
    sections_dir: PathBuf,
    references_dir: PathBuf,
    graph_dir: PathBuf,
    parsing: ParsingConfig,
    citations: CitationConfig,
    export: ExportConfig,
}

// Resolve a directory: CLI flag > env var > config file > default
fn resolve_dir(flag: Option<PathBuf>, env: &str, file: Option<&String>, default: &str) -> PathBuf {
    flag.or_else(|| std::env::var(env).ok().map(PathBuf::from))
        .or_else(|| file.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn load_file_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    match explicit {
        Some(path) => config_file::try_load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(config_file::load_config()),
    }
}

impl Settings {
    fn resolve(
        file: &ConfigFile,
        sections_dir: Option<PathBuf>,
        references_dir: Option<PathBuf>,
        graph_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let paths = file.paths.clone().unwrap_or_default();
        let parsing = ParsingConfigBuilder::from_file_config(
            &file.segmentation.clone().unwrap_or_default(),
        )
        .build()
        .context("invalid regex in [segmentation] config")?;

        Ok(Self {
            sections_dir: resolve_dir(
                sections_dir,
                "CITEGRAPH_SECTIONS_DIR",
                paths.sections_dir.as_ref(),
                "paper_sections",
            ),
            references_dir: resolve_dir(
                references_dir,
                "CITEGRAPH_REFERENCES_DIR",
                paths.references_dir.as_ref(),
                "paper_references",
            ),
            graph_dir: resolve_dir(
                graph_dir,
                "CITEGRAPH_GRAPH_DIR",
                paths.graph_dir.as_ref(),
                "paper_graph",
            ),
            parsing,
            citations: CitationConfig::from_file_config(&file.citations.clone().unwrap_or_default()),
            export: ExportConfig::from_file_config(&file.export.clone().unwrap_or_default()),
        })
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let file = load_file_config(cli.config.as_deref())?;

    match cli.command {
        Command::References {
            sections_dir,
            references_dir,
        } => {
            let settings = Settings::resolve(&file, sections_dir, references_dir, None)?;
            references(&settings, ColorMode(!cli.no_color))?;
            Ok(())
        }
        Command::Graph {
            references_dir,
            graph_dir,
            output,
        } => {
            let settings = Settings::resolve(&file, None, references_dir, graph_dir)?;
            graph(&settings, cli.no_color, output)
        }
        Command::Run {
            sections_dir,
            references_dir,
            graph_dir,
            output,
        } => {
            let settings = Settings::resolve(&file, sections_dir, references_dir, graph_dir)?;
            if !references(&settings, ColorMode(!cli.no_color))? {
                return Ok(());
            }
            graph(&settings, cli.no_color, output)
        }
    }
}

/// Run the `references` stage. Returns `false` when there was no corpus.
fn references(settings: &Settings, color: ColorMode) -> anyhow::Result<bool> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let result = citegraph_ingest::process_corpus(
        &settings.sections_dir,
        &settings.references_dir,
        &settings.parsing,
        |event| match event {
            ProgressEvent::Started { total } => bar.set_length(total as u64),
            ProgressEvent::Processing { paper, .. } => bar.set_message(paper),
            ProgressEvent::Written { .. } | ProgressEvent::Failed { .. } => bar.inc(1),
        },
    );
    bar.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(err @ (IngestError::MissingCorpus { .. } | IngestError::EmptyCorpus { .. })) => {
            tracing::warn!("{err}");
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    let mut stdout = std::io::stdout();
    output::print_corpus_summary(&mut stdout, &report, &settings.references_dir, color)?;
    Ok(true)
}

/// Run the `graph` stage: build, analyze, report and export.
fn graph(settings: &Settings, no_color: bool, output: Option<PathBuf>) -> anyhow::Result<()> {
    let graph = match citegraph_graph::build_graph(&settings.references_dir, &settings.citations) {
        Ok(graph) => graph,
        Err(err @ (GraphError::MissingCorpus { .. } | GraphError::EmptyCorpus { .. })) => {
            tracing::warn!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    // Determine color mode and output writer
    let color = ColorMode(!no_color && output.is_none());
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    let analysis = citegraph_graph::analyze(&graph);
    output::print_analysis(&mut writer, &analysis, color)?;

    let paths = citegraph_reporting::write_all(&graph, &settings.graph_dir, &settings.export)?;
    output::print_exports(&mut writer, &paths, color)?;
    writer.flush()?;
    Ok(())
}
