use clap::{Parser, Subcommand};

use apidoc::AppConfig;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "petstore", version, about = "Pet store demo serving its own API documentation")]
struct Cli {
    /// Configuration profile (overridden by APIDOC_PROFILE)
    #[arg(long, default_value = "dev")]
    profile: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen address (defaults to `server.addr`)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the OpenAPI document and exit
    Export {
        /// Compact output instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    apidoc::init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.profile).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load configuration, using defaults");
        AppConfig::empty()
    });

    let (app, docs) = petstore::build_app(&config)?;

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.get_or("server.addr", DEFAULT_ADDR.to_string()));
            app.serve(&addr).await?;
        }
        Commands::Export { compact } => {
            let _router = app.build();
            docs.ensure_built();
            let document = docs.document_value();
            let out = if compact {
                serde_json::to_string(&document)?
            } else {
                serde_json::to_string_pretty(&document)?
            };
            println!("{out}");
        }
    }
    Ok(())
}
