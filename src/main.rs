use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use reqwest::Client;
use tracing_subscriber::{fmt, EnvFilter};

use coshh_reports::config::Config;
use coshh_reports::icons::{IconResolver, HAZARD_ICONS, PPE_ICONS};
use coshh_reports::models::CompanySettings;
use coshh_reports::report::ReportGenerator;
use coshh_reports::routes::{router, AppState};
use coshh_reports::settings::{CompanySettingsProvider, RestCompanySettings, StaticCompanySettings};
use coshh_reports::storage::{HttpFetcher, ImageFetcher, StorageBucket};

fn demo_letterhead() -> CompanySettings {
    CompanySettings {
        name: "Demo Construction Ltd".into(),
        address_line1: Some("1 Example Street".into()),
        town: Some("Leeds".into()),
        postcode: Some("LS1 1AA".into()),
        phone: Some("0113 000 0000".into()),
        email: Some("safety@example.com".into()),
        company_number: Some("01234567".into()),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    tracing::info!("Using backend {} with API key: {}...", config.backend_url, config.key_preview());

    let client = Client::builder().build().context("building HTTP client")?;
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpFetcher::new(client.clone()));
    let bucket = |name: &str| Arc::new(StorageBucket::new(client.clone(), &config.backend_url, &config.api_key, name));

    let settings: Arc<dyn CompanySettingsProvider> = if config.is_demo() {
        tracing::warn!("⚠️ DEMO_KEY in use, serving the built-in demo letterhead");
        Arc::new(StaticCompanySettings(Some(demo_letterhead())))
    } else {
        Arc::new(RestCompanySettings::new(client.clone(), &config.backend_url, &config.api_key))
    };

    let reports = ReportGenerator::new(
        settings,
        IconResolver::new(&PPE_ICONS, bucket(&config.ppe_bucket), fetcher.clone()),
        IconResolver::new(&HAZARD_ICONS, bucket(&config.hazard_bucket), fetcher.clone()),
        fetcher,
    );
    let app = router(AppState { reports: Arc::new(reports) });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
        .context("serving HTTP")?;
    Ok(())
}
