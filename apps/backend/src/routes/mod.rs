use actix_web::web;

pub mod health;
pub mod realtime;

/// Register every HTTP and WebSocket endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Game socket: /ws
    cfg.configure(realtime::configure_routes);
}
