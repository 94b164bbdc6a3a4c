use sha2::{Digest, Sha256};
use std::time::Instant;
use crate::models::RepoFile;

// Cached repository snapshot with fetch timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub files: Vec<RepoFile>,
    pub created_at: Instant,
}

// Create a cache key (hash of owner + name + branch)
pub fn make_cache_key(owner: &str, name: &str, branch: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner);
    hasher.update("/");
    hasher.update(name);
    if let Some(branch) = branch {
        hasher.update("@");
        hasher.update(branch);
    }
    format!("{:x}", hasher.finalize())
}
