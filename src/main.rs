use clap::Parser;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use review_gateway::config::{Args, Credentials, RateLimitSettings};
use review_gateway::gemini::GeminiClient;
use review_gateway::github::{FileSizeLimits, GithubClient};
use review_gateway::rate_limit::RateLimiter;
use review_gateway::router;
use review_gateway::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // parse cli arguments, then the env-sourced config
    let args = Args::parse();
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let rate = match RateLimitSettings::from_env() {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.upstream_timeout))
        .build()
        .unwrap();

    // creating shared state
    let state = Arc::new(AppState {
        github: GithubClient::new(
            client.clone(),
            args.github_api_url.clone(),
            credentials.github_token,
            FileSizeLimits {
                max_file_size: args.max_file_bytes,
                max_total_size: args.max_total_bytes,
            },
        ),
        gemini: GeminiClient::new(
            client,
            args.gemini_api_url.clone(),
            credentials.google_api_key,
            args.model.clone(),
        ),
        cache: DashMap::new(),
        cache_ttl: Duration::from_secs(args.cache_ttl),
        rate_limiter: RateLimiter::new(rate.limit, rate.window, rate.enabled),
    });

    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("Gateway running on http://localhost:{}", args.port);
    info!("Reviewing with model {} via {}", args.model, args.gemini_api_url);
    info!("Fetching repositories from {}", args.github_api_url);
    if rate.enabled {
        info!(
            "Rate limit: {} requests per {} seconds",
            rate.limit,
            rate.window.as_secs()
        );
    } else {
        info!("Rate limiting disabled");
    }

    axum::serve(listener, app).await.unwrap();
}
