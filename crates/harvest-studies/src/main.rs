//! CLI entry point for the study harvester.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use harvest_core::config::{load_section, DEFAULT_FILE_PREFIX};
use harvest_graph::{GraphClient, GraphConfig};
use harvest_ledger::OutcomeStatus;

use harvest_studies::config::{OutputFormat, StudiesConfig};
use harvest_studies::output::{self, OutputPaths};
use harvest_studies::pipeline::{HarvestReport, Harvester};
use harvest_studies::{ledger, source};

#[derive(Parser)]
#[command(name = "harvest-studies")]
#[command(about = "Add or update human-subject studies in the VIVO graph")]
struct Cli {
    /// Study file (JSON array of study records).
    #[arg(default_value = "studies.json")]
    input: PathBuf,

    /// Config file prefix.
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX)]
    config: String,

    /// Output format: rdfxml, ntriples (overrides config).
    #[arg(short, long)]
    format: Option<String>,

    /// Directory for output documents (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Apply the delta to the graph store after writing the documents.
    #[arg(long)]
    apply: bool,

    /// Do not record a run ledger.
    #[arg(long)]
    no_ledger: bool,

    /// Check a stored run ledger's integrity and exit.
    #[arg(long, value_name = "FILE")]
    verify_ledger: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    if let Some(path) = cli.verify_ledger.as_deref() {
        ledger::verify_ledger_file(path)?;
        return Ok(());
    }

    let mut studies_config: StudiesConfig = load_section(&cli.config, "studies")?;
    if let Some(format) = cli.format.as_deref() {
        studies_config.output_format = parse_format(format)?;
    }
    let graph_config: GraphConfig = load_section(&cli.config, "neo4j")?;

    tracing::info!(
        input = %cli.input.display(),
        agent = %studies_config.harvested_by,
        "Study ingest starting"
    );

    let studies = source::read_studies(&cli.input)?;

    let graph = GraphClient::connect(&graph_config).await?;
    graph.ensure_schema().await?;

    let session = (!cli.no_ledger).then(|| ledger::start_run_session(&studies_config, &cli.input));

    let mut harvester = Harvester::new(&graph, &studies_config);
    harvester.load_concepts().await?;
    let report = harvester.harvest(&studies).await?;

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| studies_config.output_dir.as_ref().map(PathBuf::from));
    let paths = OutputPaths::for_input(
        &cli.input,
        output_dir.as_deref(),
        studies_config.output_format,
    );
    output::write_delta(&report.delta, &paths, studies_config.output_format)?;
    output::write_exceptions(&report.outcomes, &paths.exceptions)?;

    if cli.apply && !report.delta.is_empty() {
        graph.apply_delta(&report.delta).await?;
    }

    if let Some(mut session) = session {
        ledger::record_report(&mut session, &report, cli.apply);
        ledger::finalize_and_store(session, &studies_config.ledger_dir);
    }

    print_summary(&report, &paths, cli.apply);
    Ok(())
}

fn parse_format(s: &str) -> anyhow::Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "rdfxml" | "rdf" | "xml" => Ok(OutputFormat::RdfXml),
        "ntriples" | "nt" => Ok(OutputFormat::NTriples),
        _ => anyhow::bail!("Invalid format: {s}. Choose: rdfxml, ntriples"),
    }
}

fn print_summary(report: &HarvestReport, paths: &OutputPaths, applied: bool) {
    let failed = report
        .outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Failed)
        .count();
    tracing::info!(
        studies = report.outcomes.len(),
        failed,
        concepts_created = report.concepts_created,
        additions = report.delta.additions.len(),
        retractions = report.delta.retractions.len(),
        add_path = %paths.additions.display(),
        sub_path = %paths.retractions.display(),
        applied,
        "Finished"
    );
}
