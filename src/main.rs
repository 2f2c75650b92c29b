use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware, web};

use digital_archivist::chain::{self, ChainClient};
use digital_archivist::config::Config;
use digital_archivist::{AppState, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "digital_archivist=debug,actix_web=info".into()),
        )
        .init();

    let config = Config::from_env();
    let port = config.port;

    let provider = chain::provider(&config.rpc_url)
        .unwrap_or_else(|e| panic!("Bad RPC_URL '{}': {:#}", config.rpc_url, e));

    let chain_client = match ChainClient::new(&config) {
        Ok(client) => {
            tracing::info!("  Agent wallet: {:#x}", client.address());
            Some(client)
        }
        Err(e) => {
            tracing::warn!("Minting disabled: {:#}", e);
            None
        }
    };

    tracing::info!("digital-archivist starting");
    tracing::info!("  Chain: {} (id {})", config.chain_name, config.chain_id);
    tracing::info!("  RPC: {}", config.rpc_url);
    tracing::info!("  Contract: {}", config.contract_address);
    tracing::info!("  AI model: {} via {}", config.ai_model, config.ai_api_base);
    tracing::info!("  Image model: {}", config.image_model);
    tracing::info!("  Score threshold: {}", config.score_threshold);

    // Rate limiting on the routes that spend tokens and gas
    let governor_conf = GovernorConfigBuilder::default()
        .seconds_per_request(6)
        .burst_size(10)
        .finish()
        .unwrap();

    let state = web::Data::new(AppState {
        config,
        http_client: reqwest::Client::new(),
        provider,
        chain: chain_client,
        mint_lock: tokio::sync::Mutex::new(()),
    });

    tracing::info!("Listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(handlers::index))
            .route("/api/status", web::get().to(handlers::status))
            .route("/api/contract-config", web::get().to(handlers::contract_config))
            .route("/api/examples", web::get().to(handlers::examples))
            .service(
                web::resource("/api/evaluate")
                    .wrap(Governor::new(&governor_conf))
                    .route(web::post().to(handlers::evaluate)),
            )
            .service(
                web::resource("/api/mint")
                    .wrap(Governor::new(&governor_conf))
                    .route(web::post().to(handlers::mint)),
            )
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
