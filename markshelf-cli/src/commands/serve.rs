//! HTTP server command

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use markshelf_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "MARKSHELF_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "MARKSHELF_PORT", default_value_t = 8501)]
    pub port: u16,
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = super::load_config()?;
    tracing::info!(
        multi_user = config.multi_user,
        delete_scope = ?config.delete_scope,
        "Configuration loaded"
    );

    let server = ServerConfig {
        bind_addr: SocketAddr::new(args.bind, args.port),
    };
    tracing::info!("Starting markshelf on {}", server.bind_addr);

    run_server(AppState::from_config(&config), server)
        .await
        .context("Server error")?;

    Ok(())
}
