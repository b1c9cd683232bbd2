#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tourist safety dashboard server.
//!
//! ```text
//! tourist_safety_server [serve] [--bind 0.0.0.0] [--port 8080] [--geocoder gazetteer]
//! tourist_safety_server interactive
//! ```
//!
//! Unset flags fall back to `BIND_ADDR`, `PORT` and `GEOCODER_PROVIDER`.

use clap::{Parser, Subcommand};
use tourist_safety_server::ServerConfig;

#[derive(Parser)]
#[command(
    name = "tourist_safety_server",
    about = "Serve the tourist safety dashboard API"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default)
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Geocoding service id (e.g. `nominatim`, `gazetteer`)
        #[arg(long)]
        geocoder: Option<String>,
    },
    /// Prompt for settings, then start the API server
    Interactive,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();

    match cli.command {
        None => {}
        Some(Commands::Interactive) => return tourist_safety_server::interactive::run().await,
        Some(Commands::Serve {
            bind,
            port,
            geocoder,
        }) => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if geocoder.is_some() {
                config.geocoder = geocoder;
            }
        }
    }

    tourist_safety_server::run_server(config).await
}
