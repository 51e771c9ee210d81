#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use posyandu_api::{app, config::AppConfig, database::DatabaseManager, AppState};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A server bound to a free port inside the test's own runtime.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

/// Starts a server against `DATABASE_URL`, or returns `None` when it is unset so the
/// calling test can skip.
pub async fn spawn_server() -> Result<Option<TestServer>> {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("posyandu_api=warn")),
        )
        .with_test_writer()
        .try_init();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return Ok(None);
        }
    };

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let config = AppConfig::from_source(|key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        "JWT_SECRET_KEY" => Some("integration-test-secret".to_string()),
        "SECURITY_BCRYPT_COST" => Some("4".to_string()),
        "PORT" => Some(port.to_string()),
        _ => None,
    })?;

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test port")?;
    let router = app(AppState::new(pool, config));
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: Client::new(),
    };
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/api/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str, body: &Value) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token).json(body)
    }

    pub fn put(&self, path: &str, token: &str, body: &Value) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token).json(body)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }

    /// Registers a fresh kader and returns `(id, username, token)`.
    pub async fn kader_session(&self, password: &str) -> Result<(i32, String, String)> {
        let username = format!("kader{}", unique());
        let res = self
            .client
            .post(self.url("/api/kader"))
            .json(&json!({
                "nama_lengkap": "Kader Uji",
                "username": username,
                "password": password,
            }))
            .send()
            .await?;
        let (status, body) = read(res).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);
        let id = body["id"].as_i64().context("register response without id")? as i32;

        let token = self.login(&username, password).await?;
        Ok((id, username, token))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        let (status, body) = read(res).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response without token")
    }

    /// Creates a mother and returns her id and NIK.
    pub async fn create_ibu(&self, token: &str) -> Result<(i32, String)> {
        let nik = nik();
        let res = self
            .post(
                "/api/ibu",
                token,
                &json!({
                    "nama_lengkap": format!("Ibu {}", nik),
                    "nik": nik,
                    "no_telepon": "081234567890",
                    "alamat": "Jl. Melati 1",
                }),
            )
            .send()
            .await?;
        Ok((created_id(res).await?, nik))
    }

    pub async fn create_anak(&self, token: &str, id_ibu: i32) -> Result<i32> {
        let res = self
            .post(
                "/api/anak",
                token,
                &json!({
                    "id_ibu": id_ibu,
                    "nama_anak": format!("Anak {}", unique()),
                    "tanggal_lahir": "2023-05-17",
                    "jenis_kelamin": "P",
                    "anak_ke": 1,
                    "berat_lahir_kg": 3.1,
                    "tinggi_lahir_cm": 49.5,
                }),
            )
            .send()
            .await?;
        created_id(res).await
    }
}

/// Distinct across parallel tests and repeated runs.
pub fn unique() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    (nanos % 10_000_000_000_000) as u64 * 1_000 + COUNTER.fetch_add(1, Ordering::SeqCst) % 1_000
}

/// A 16-digit NIK nobody else has.
pub fn nik() -> String {
    format!("{:016}", unique())
}

pub async fn read(res: Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res.json::<Value>().await.context("response was not JSON")?;
    Ok((status, body))
}

pub async fn created_id(res: Response) -> Result<i32> {
    let (status, body) = read(res).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, body);
    Ok(body["id"].as_i64().context("create response without id")? as i32)
}

/// Ids present in a JSON array response.
pub fn ids(body: &Value) -> Vec<i32> {
    body.as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).map(|id| id as i32).collect())
        .unwrap_or_default()
}
