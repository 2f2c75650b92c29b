use actix_web::{App, test, web};

use digital_archivist::config::{Config, ZERO_ADDRESS};
use digital_archivist::{AppState, chain, handlers};

fn test_state() -> web::Data<AppState> {
    let config = Config {
        port: 5001,
        // Nothing in these tests is allowed to reach the network.
        rpc_url: "http://127.0.0.1:1".to_string(),
        chain_id: 11155111,
        chain_name: "Ethereum Sepolia".to_string(),
        explorer_url: "https://sepolia.etherscan.io".to_string(),
        private_key: None,
        contract_address: ZERO_ADDRESS.to_string(),
        ai_api_key: String::new(),
        ai_api_base: "http://127.0.0.1:1".to_string(),
        ai_model: "test".to_string(),
        image_model: "test".to_string(),
        score_threshold: 85,
    };
    let provider = chain::provider(&config.rpc_url).unwrap();
    web::Data::new(AppState {
        config,
        http_client: reqwest::Client::new(),
        provider,
        chain: None,
        mint_lock: tokio::sync::Mutex::new(()),
    })
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/status", web::get().to(handlers::status))
                .route(
                    "/api/contract-config",
                    web::get().to(handlers::contract_config),
                )
                .route("/api/examples", web::get().to(handlers::examples))
                .route("/api/evaluate", web::post().to(handlers::evaluate))
                .route("/api/mint", web::post().to(handlers::mint)),
        )
        .await
    };
}

#[actix_web::test]
async fn short_story_is_rejected_before_any_outbound_call() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/evaluate")
        .set_json(serde_json::json!({"story_text": "Once upon a time."}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("50"));
}

#[actix_web::test]
async fn empty_story_is_rejected() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/evaluate")
        .set_json(serde_json::json!({"story_text": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn mint_requires_title_and_description() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/mint")
        .set_json(serde_json::json!({"metadata": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn mint_without_wallet_reports_configuration_error() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/mint")
        .set_json(serde_json::json!({"metadata": {
            "metadata_title": "The Potter's Last Kiln",
            "metadata_description": "An elderly potter fires his final work.",
            "score": 92,
            "timestamp": "2026-08-23T12:00:00Z"
        }}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[actix_web::test]
async fn examples_returns_builtin_stories() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/api/examples").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let stories = body.as_array().unwrap();
    assert_eq!(stories.len(), 3);
    for story in stories {
        assert!(story["title"].is_string());
        assert!(story["content"].as_str().unwrap().chars().count() >= 50);
    }
}

#[actix_web::test]
async fn contract_config_exposes_mint_abi() {
    let app = test_app!();
    let req = test::TestRequest::get()
        .uri("/api/contract-config")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["chain_id"], 11155111);
    assert_eq!(body["chain_name"], "Ethereum Sepolia");
    assert_eq!(body["abi"][0]["name"], "mintToken");
}
