//! Interactive mode for the server.
//!
//! Prompts for bind address, port and geocoding service before starting
//! the server.

use dialoguer::{Confirm, Input, Select};
use tourist_safety_geocoder::service_registry;

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Defaults for every prompt come from [`ServerConfig::from_env`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Tourist Safety Server");
    println!();

    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let mut services = service_registry::all_services();
    services.sort_by_key(|s| s.priority);
    let labels: Vec<String> = services
        .iter()
        .map(|s| {
            if s.enabled {
                s.name.clone()
            } else {
                format!("{} (disabled by default)", s.name)
            }
        })
        .collect();
    let preselected = defaults
        .geocoder
        .as_deref()
        .and_then(|id| services.iter().position(|s| s.id == id))
        .unwrap_or(0);

    let geocoder = Select::new()
        .with_prompt("Geocoding service")
        .items(&labels)
        .default(preselected)
        .interact()
        .ok()
        .and_then(|idx| services.get(idx))
        .map(|s| s.id.clone())
        .or(defaults.geocoder);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        bind_addr,
        port,
        geocoder,
    })
    .await
}
