use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use talkie_core::{CredentialConfig, CredentialIssuer, SessionIdentity, SessionManager};
use talkie_server::{ServerConfig, TalkieServer};

#[derive(Parser)]
#[command(name = "talkie", about = "Session credential service for real-time voice sessions")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the credential server
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 7460)]
        port: u16,
    },
    /// Issue a single credential and print it as JSON
    Issue {
        /// Session name (generated when omitted)
        #[arg(long)]
        session: Option<String>,
        /// Participant id (generated when omitted)
        #[arg(long)]
        participant: Option<String>,
    },
    /// Hold a session open, refreshing its credential until interrupted
    Connect {
        /// Session name (generated when omitted)
        #[arg(long)]
        session: Option<String>,
        /// Participant id (generated when omitted)
        #[arg(long)]
        participant: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { host, port } => {
            let server = TalkieServer::new(
                ServerConfig::new(host, port),
                CredentialConfig::from_env(),
            );
            server.run().await?;
        }
        Commands::Issue {
            session,
            participant,
        } => {
            let issuer = CredentialIssuer::new(CredentialConfig::from_env());
            let identity = SessionIdentity::resolve(session, participant)?;
            let credential = issuer.issue(&identity).await?;
            println!("{}", serde_json::to_string_pretty(&credential)?);
        }
        Commands::Connect {
            session,
            participant,
        } => {
            let issuer = Arc::new(CredentialIssuer::new(CredentialConfig::from_env()));
            let manager = SessionManager::new(issuer);

            let handle = manager.connect(session, participant).await?;
            tracing::info!(
                session = %handle.identity.session_name(),
                participant = %handle.identity.participant_id(),
                endpoint = %handle.endpoint,
                "session active; press Ctrl-C to disconnect"
            );

            tokio::signal::ctrl_c().await?;
            manager.disconnect().await;
            tracing::info!("session closed");
        }
    }

    Ok(())
}
