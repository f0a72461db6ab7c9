use std::error::Error;

use clap::Parser;
use realm_provisioner::commands::provision::ProvisionCommand;
use realm_provisioner::commands::validate::ValidateCommand;
use realm_provisioner::http::client::HttpClient;
use realm_provisioner::parameters::{Commands, OutputFormat, select_cleanup_policy};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "realm-provisioner-cli", version)]
struct Cli {
    /// Log verbosity. RUST_LOG is honored when not set, and `info` is used otherwise.
    #[arg(long, global = true)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(level: Option<Level>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Provision {
            credentials,
            config,
            strict_cleanup,
            http_args,
            output_format,
        } => {
            let http_client = HttpClient::new(http_args.http_config()?)
                .map_err(|e| format!("error creating http client: {e}"))?;
            let report = ProvisionCommand::new(http_client, select_cleanup_policy(strict_cleanup))
                .run(&credentials, &config)?;
            match output_format {
                OutputFormat::Plain => println!("{report}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
        Commands::Validate {
            config,
            output_format,
        } => {
            let desired = ValidateCommand::run(&config)?;
            match output_format {
                OutputFormat::Plain => println!(
                    "realm `{}` is valid: {} client(s), {} client scope(s)",
                    desired.realm_name(),
                    desired.clients.len(),
                    desired.client_scopes.len()
                ),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&desired)?),
            }
            Ok(())
        }
    }
}
