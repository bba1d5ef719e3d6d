use actix_web::web;

pub mod events;
pub mod health;
pub mod players;

/// Register every route. `main.rs` adds middleware around the same tree.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Inbound events: /api/events
    cfg.service(web::scope("/api/events").configure(events::configure_routes));

    // Player reads: /api/players/**
    cfg.service(web::scope("/api/players").configure(players::configure_routes));
}
