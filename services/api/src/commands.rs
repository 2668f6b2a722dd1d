use crate::infra::{build_engine, build_reviewer};
use clap::Args;
use grant_classifier::config::AppConfig;
use grant_classifier::error::AppError;
use grant_classifier::grants::{GrantImporter, RelatedEvidence};
use grant_classifier::pipeline::{BatchReport, BatchRunner, CsvSink, RestSink};
use grant_classifier::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Grant export (CSV, snake_case or RePORTER headers)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Write classifications to this CSV file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Publications (CSV, with a grant column or joined via --publication-links)
    #[arg(long)]
    pub(crate) publications: Option<PathBuf>,
    /// PMID to core project number links for publications (CSV)
    #[arg(long)]
    pub(crate) publication_links: Option<PathBuf>,
    /// Patents keyed by application id or project id (CSV)
    #[arg(long)]
    pub(crate) patents: Option<PathBuf>,
    /// Clinical studies keyed by application id or core project number (CSV)
    #[arg(long)]
    pub(crate) clinical_studies: Option<PathBuf>,
    /// Send flagged results to the language-model review pass
    #[arg(long)]
    pub(crate) review: bool,
    /// Write results to the configured datastore
    #[arg(long)]
    pub(crate) store: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OrgTypeArgs {
    /// Organization name as it appears in the export
    #[arg(long)]
    pub(crate) name: String,
    /// Activity code of the grant (small-business codes imply a company)
    #[arg(long, default_value = "")]
    pub(crate) activity_code: String,
}

#[derive(Args, Debug)]
pub(crate) struct RulesExportArgs {
    /// Destination file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let engine = Arc::new(build_engine(&config)?);

    let mut grants = GrantImporter::from_path(&args.input)?;
    let mut related = RelatedEvidence::new();
    if let Some(path) = &args.publications {
        related.load_publications_path(path)?;
    }
    if let Some(path) = &args.publication_links {
        related.load_publication_links_path(path)?;
    }
    if let Some(path) = &args.patents {
        related.load_patents_path(path)?;
    }
    if let Some(path) = &args.clinical_studies {
        related.load_clinical_studies_path(path)?;
    }
    if !related.is_empty() {
        let enriched = related.attach(&mut grants);
        info!(enriched, "attached related publications, patents and studies");
    }

    let mut runner = BatchRunner::from_config(engine, &config.pipeline);
    if let Some(path) = &args.output {
        runner = runner.with_sink(Arc::new(CsvSink::create(path)?));
    }
    if args.review {
        match build_reviewer(&config)? {
            Some(reviewer) => runner = runner.with_reviewer(reviewer),
            None => warn!("review requested but ANTHROPIC_API_KEY is not set; skipping"),
        }
    }
    if args.store {
        match RestSink::from_config(&config.storage)? {
            Some(sink) => runner = runner.with_sink(Arc::new(sink)),
            None => warn!("store requested but SUPABASE_URL or SUPABASE_SERVICE_KEY is not set"),
        }
    }

    let report = runner.run(&grants).await;
    if args.output.is_none() {
        print_results(&report);
    }
    print_summary(&report);
    Ok(())
}

fn print_results(report: &BatchReport) {
    for result in &report.results {
        let flag = if result.needs_review { " [review]" } else { "" };
        println!(
            "{}\t{}\t{}\t{}{}",
            result.application_id, result.category, result.confidence, result.org_type, flag
        );
    }
}

fn print_summary(report: &BatchReport) {
    let summary = &report.summary;
    println!(
        "Classified {} grants: {} accepted, {} flagged, {} reviewed, {} stored, {} errors",
        summary.total,
        summary.accepted,
        summary.flagged,
        summary.reviewed,
        summary.stored,
        summary.errors
    );
    for (category, count) in &summary.by_category {
        println!("  - {category}: {count}");
    }
}

pub(crate) fn run_org_type(args: OrgTypeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = build_engine(&config)?;
    let code = args.activity_code.trim().to_ascii_uppercase();
    let org_type = engine.classify_organization(Some(&args.name), &code);
    println!("{org_type}");
    Ok(())
}

pub(crate) fn run_rules_export(args: RulesExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let rules = config.classification.rule_set()?;
    let json = rules.to_json_pretty().map_err(std::io::Error::from)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Rule set written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
