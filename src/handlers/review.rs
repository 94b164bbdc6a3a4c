use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::cache::{CacheEntry, make_cache_key};
use crate::error::{Error, Result};
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_SIZE, RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL,
};
use crate::models::{RepoFile, ReviewRequest, ReviewResponse};
use crate::review::{create_prompt, parse_review};
use crate::state::AppState;

// post handler: validate, admission gate, then fetch -> prompt -> infer -> parse.
// A rejected request must never reach GitHub or Gemini.
pub async fn review_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    REQUEST_TOTAL.inc();
    validate(&payload)?;

    let identity = client_identity(&headers, addr);
    if !state.rate_limiter.admit(&identity, Instant::now()) {
        RATE_LIMITED_TOTAL.inc();
        info!("Rate limited: {}", identity);
        return Err(Error::QuotaExceeded);
    }

    let start_time = Instant::now();

    let files = fetch_with_cache(&state, &payload).await?;
    if files.is_empty() {
        return Err(Error::NoFilesFound);
    }

    let prompt = create_prompt(
        &files,
        &payload.assignment_description,
        payload.candidate_level,
    );
    let answer = state.gemini.generate(&prompt).await?;
    let parsed = parse_review(&answer);

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    info!("Reviewed {} ({} files)", payload.repo_ref(), files.len());

    Ok(Json(ReviewResponse {
        files_found: files.into_iter().map(|f| f.path).collect(),
        comments: parsed.comments,
        rating: parsed.rating,
        conclusion: parsed.conclusion,
    }))
}

// Quota key: API key header when the caller sends one, else the peer address
fn client_identity(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}

// Checks that can fail before the rate limiter is consulted
fn validate(payload: &ReviewRequest) -> Result<()> {
    for (field, value) in [
        ("repo_owner", &payload.repo_owner),
        ("repo_name", &payload.repo_name),
    ] {
        if value.trim().is_empty() {
            return Err(Error::Validation(format!("{} must not be empty", field)));
        }
        if value.contains('/') {
            return Err(Error::Validation(format!("{} must not contain '/'", field)));
        }
    }
    Ok(())
}

async fn fetch_with_cache(state: &AppState, payload: &ReviewRequest) -> Result<Vec<RepoFile>> {
    let key = make_cache_key(
        &payload.repo_owner,
        &payload.repo_name,
        payload.branch.as_deref(),
    );

    // check cache first
    if let Some(entry) = state.cache.get(&key) {
        if entry.created_at.elapsed() < state.cache_ttl {
            CACHE_HITS.inc();
            info!("Using cached repository data: {}", payload.repo_ref());
            return Ok(entry.files.clone());
        }
    }
    CACHE_MISSES.inc();

    let files = state
        .github
        .fetch_repo_files(
            &payload.repo_owner,
            &payload.repo_name,
            payload.branch.as_deref(),
        )
        .await?;

    state.cache.insert(
        key,
        CacheEntry {
            files: files.clone(),
            created_at: Instant::now(),
        },
    );
    CACHE_SIZE.set(state.cache.len() as f64);

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateLevel;

    fn request(owner: &str, name: &str) -> ReviewRequest {
        ReviewRequest {
            repo_owner: owner.to_string(),
            repo_name: name.to_string(),
            branch: None,
            candidate_level: CandidateLevel::Junior,
            assignment_description: String::new(),
        }
    }

    #[test]
    fn validate_rejects_empty_and_slashed_fields() {
        assert!(validate(&request("owner", "repo")).is_ok());
        assert!(validate(&request("", "repo")).is_err());
        assert!(validate(&request("owner", " ")).is_err());
        assert!(validate(&request("own/er", "repo")).is_err());
        assert!(validate(&request("owner", "re/po")).is_err());
    }

    #[test]
    fn identity_prefers_api_key_header() {
        let mut headers = HeaderMap::new();
        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();

        assert_eq!(client_identity(&headers, addr), "10.1.2.3");

        headers.insert("x-api-key", "secret-key".parse().unwrap());
        assert_eq!(client_identity(&headers, addr), "secret-key");
    }
}
