use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::build_engine;
use crate::server;
use crate::telemetry;
use crate::workflows::screening::catalog;
use crate::workflows::screening::{
    CsvResponseStore, RiskAssessment, ScreeningService, SessionId, Submission,
};

#[derive(Parser, Debug)]
#[command(
    name = "Risk Screening",
    about = "Score early-alert questionnaires into academic, family, economic and psychosocial risk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate, store and score one questionnaire from a JSON file
    Score(ScoreArgs),
    /// Print the stored column headers in order
    Catalog,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Answer every domain with this class id instead of loading models
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub(crate) stub_class: Option<u8>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire payload in the same JSON shape the HTTP intake accepts
    #[arg(long)]
    answers: PathBuf,
    /// Response store to append to; defaults to APP_STORE_PATH
    #[arg(long)]
    store: Option<PathBuf>,
    /// Answer every domain with this class id instead of loading models
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    stub_class: Option<u8>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
    }
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = std::fs::read_to_string(&args.answers)?;
    let submission: Submission = serde_json::from_str(&raw)?;

    let engine = Arc::new(build_engine(&config.screening, args.stub_class)?);
    let store_path = args.store.unwrap_or(config.screening.store_path);
    let store = Arc::new(CsvResponseStore::new(store_path));
    let service = ScreeningService::new(store, engine);

    let session = SessionId("cli".to_string());
    let receipt = service.submit(&session, submission)?;
    let assessment = service.score_latest(&session)?;

    println!("Documento: {}", receipt.national_id);
    print!("{}", render_assessment(&assessment));
    Ok(())
}

fn render_assessment(assessment: &RiskAssessment) -> String {
    assessment
        .entries()
        .iter()
        .map(|(domain, label)| format!("{}: {}\n", domain.label(), label))
        .collect()
}

fn print_catalog() {
    for (index, header) in catalog::column_headers().iter().enumerate() {
        println!("{:>3}  {}", index + 1, header);
    }
}
