use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod app;
mod config;
mod core;
mod models;
mod utils;
mod web;

#[cfg(test)]
mod test_helpers;

use utils::{CinerateResult, Error};

/// Fetch information about the movies stored under one or more folders
/// and browse it on a local web page.
#[derive(Debug, Parser)]
#[command(name = "cinerate", version, about)]
struct Cli {
    /// Folders to scan for movie files
    #[arg(required = true, value_name = "FOLDER")]
    paths: Vec<PathBuf>,

    /// Directory holding config.json, userConfig.json and the static files
    #[arg(long, env = "CINERATE_ASSETS", default_value = "assets")]
    assets: PathBuf,

    /// Address to listen on (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match config::Config::load(&cli.assets) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from '{}': {e}", cli.assets.display());
            return ExitCode::FAILURE;
        }
    };
    app::common::init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli, mut config: config::Config) -> CinerateResult<()> {
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let roots = app::common::resolve_roots(&cli.paths)?;
    let movies = app::library::collect_library(&roots, &config).await?;

    let ip: IpAddr = config.server.host.parse().map_err(|e| {
        Error::Other(format!("Invalid server.host '{}': {e}", config.server.host))
    })?;
    let addr = SocketAddr::new(ip, config.server.port);

    let state = web::AppState::new(movies, config, cli.assets);
    web::serve(state, addr).await
}
