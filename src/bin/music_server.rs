use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use music_test_tools::{config::ServerConfig, logging, server::MusicServer};
use std::{net::IpAddr, path::PathBuf};

/// Serves a music directory over HTTP for testing the USB player.
#[derive(Parser)]
#[command(name = "music_server", version, about, long_about = None)]
struct Cli {
    /// Directory to serve [env: MUSIC_SERVER_ROOT, default: Music]
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Port to listen on [env: MUSIC_SERVER_PORT, default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind [env: MUSIC_SERVER_BIND, default: 0.0.0.0]
    #[arg(short, long)]
    bind: Option<IpAddr>,
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = ServerConfig::get().with_overrides(cli.bind, cli.port, cli.root);
    let server = MusicServer::bind(&config)?;

    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || {
        info!("Ctrl+C ...");
        shutdown.shutdown();
    })
    .context("Could not install Ctrl+C handler")?;

    info!("Starting HTTP server at: {}", config.port);
    server.serve()
}
