use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, PluginsConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::plugins::PluginRegistry;
use server::routes::{self, users::UserDirectories};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    data_root: std::path::PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use an isolated data root per test run
    let data_root = std::env::temp_dir().join(format!("e2e_{}", Uuid::new_v4()));
    let users = Arc::new(UserDirectories::new(&data_root, "default-user", "x-user-handle")?);
    let registry = PluginRegistry::from_config(&PluginsConfig::default())?;

    let app: Router = routes::build_router(&registry, users, cors(), 1024 * 1024);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_root })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_sampler_lifecycle_over_http() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let base = format!("{}/api/plugins/neo/samplers", app.base_url);

    let res = c.post(&base)
        .json(&json!({"name": "temp-0.7", "preset": {"temperature": 0.7}}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"success": true}));

    let res = c.get(&base).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        json!([{"name": "temp-0.7", "preset": {"temperature": 0.7}}])
    );

    // file on disk holds exactly the payload, pretty printed
    let text = tokio::fs::read_to_string(
        app.data_root.join("default-user").join("NeoSamplers").join("temp-0.7.json"),
    ).await?;
    assert_eq!(text, "{\n  \"temperature\": 0.7\n}");

    let res = c.delete(format!("{base}/temp-0.7")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let res = c.get(format!("{base}/temp-0.7")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"error": "Preset not found"}));

    let _ = tokio::fs::remove_dir_all(&app.data_root).await;
    Ok(())
}

#[tokio::test]
async fn e2e_serve_with_config_and_shutdown() -> anyhow::Result<()> {
    let data_root = std::env::temp_dir().join(format!("e2e_serve_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.server.port = 0;
    cfg.storage.data_root = data_root.to_string_lossy().into_owned();

    // port 0 is refused by validation; serve() binds whatever it is given
    assert!(cfg.clone().normalize_and_validate().is_err());

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server::startup::serve(cfg, async move { let _ = rx.await; }));

    // ensure_env runs before binding; wait for the default user directory
    for _ in 0..50 {
        if data_root.join("default-user").is_dir() { break; }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(data_root.join("default-user").is_dir());

    let _ = tx.send(());
    handle.await??;

    let _ = tokio::fs::remove_dir_all(&data_root).await;
    Ok(())
}
