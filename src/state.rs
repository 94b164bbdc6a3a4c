use dashmap::DashMap;
use std::time::Duration;

use crate::cache::CacheEntry;
use crate::gemini::GeminiClient;
use crate::github::GithubClient;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub github: GithubClient,
    pub gemini: GeminiClient,
    pub cache: DashMap<String, CacheEntry>, // repo key -> fetched files
    pub cache_ttl: Duration,
    pub rate_limiter: RateLimiter,
}
