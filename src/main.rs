use quill_api::services::UserService;
use quill_api::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up QUILL_JWT_SECRET etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Misconfiguration (empty secret, zero iterations) must abort startup
    let config = config::config();
    if let Err(e) = config.validate() {
        panic!("invalid configuration: {}", e);
    }
    tracing::info!("starting Quill API in {:?} mode", config.environment);

    let state = AppState::new(&config.storage.data_dir)
        .unwrap_or_else(|e| panic!("failed to initialize stores: {}", e));

    // Seed default accounts on first run only
    UserService::new(state.users.clone())
        .provision_defaults()
        .unwrap_or_else(|e| panic!("failed to provision users: {}", e));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("QUILL_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Quill API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
