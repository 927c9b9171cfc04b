//! Booking back office served from the in-memory store
//!
//! ```sh
//! cargo run --example booking_server -- demos/booking_server/config.yaml
//! ```
//!
//! Without a path the built-in seed data is used.

use anyhow::Result;
use tourdesk::observability::init_tracing;
use tourdesk::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => DeskConfig::from_yaml_file(&path)?,
        None => DeskConfig::default_config(),
    };
    init_tracing(&config.logging.filter)?;

    config.server.socket_addr()?;
    let addr = config.server.bind_address();
    tracing::info!(
        tours = config.seed.tours.len(),
        clients = config.seed.clients.len(),
        cities = config.seed.cities.len(),
        "starting booking server"
    );

    println!("Booking back office on http://{}", addr);
    println!("   GET  /tours/all  /clients/all  /cities/all");
    println!("   POST /bookings   GET|PUT /bookings/{{id}}");

    ServerBuilder::from_config(&config)
        .with_service_name("tourdesk-demo")
        .serve(&addr)
        .await
}
