use actix_web::{web, App, HttpServer};
use saladbowl::config::{GameConfig, ServerConfig};
use saladbowl::error::AppError;
use saladbowl::routes;
use saladbowl::services::GameEngine;
use saladbowl::state::app_state::AppState;
use saladbowl::ws::Broker;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment.
    let server = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let game = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Salad Bowl on http://{}:{}",
        server.host, server.port
    );

    let (broker, inbox) = Broker::new(server.outbound_capacity);
    GameEngine::new(game, broker.clone(), inbox).spawn();

    let data = web::Data::new(AppState::new(broker));
    info!(host = %server.host, port = server.port, "HTTP server starting");

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(server.bind_addr())?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
