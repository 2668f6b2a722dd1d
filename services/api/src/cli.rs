use crate::commands::{
    run_classify, run_org_type, run_rules_export, ClassifyArgs, OrgTypeArgs, RulesExportArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grant_classifier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "grant-etl",
    about = "Classify NIH grant exports and serve the classifier over HTTP",
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
    /// Classify a grant export and write or store the results
    Classify(ClassifyArgs),
    /// Print the organization type for a name and activity code
    OrgType(OrgTypeArgs),
    /// Inspect the active rule set
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Write the active rule set as JSON
    Export(RulesExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Classify(args) => run_classify(args).await,
        Command::OrgType(args) => run_org_type(args),
        Command::Rules {
            command: RulesCommand::Export(args),
        } => run_rules_export(args),
    }
}
