use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::RepoFile;

// Caps on how much repository content gets pulled into a prompt
#[derive(Clone, Copy, Debug)]
pub struct FileSizeLimits {
    pub max_file_size: u64,
    pub max_total_size: u64,
}

#[derive(Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    limits: FileSizeLimits,
}

// Directory listing entry from the contents API
#[derive(Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    size: u64,
}

// Single-file response from the contents API
#[derive(Deserialize)]
struct FileContentsResponse {
    content: String,
    encoding: String,
}

impl GithubClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        limits: FileSizeLimits,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
            limits,
        }
    }

    // Walk the repository tree with a worklist: directories expand into more
    // listings, files are fetched and decoded. Binary files are skipped.
    pub async fn fetch_repo_files(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<Vec<RepoFile>> {
        let mut files = Vec::new();
        let mut dirs = vec![String::new()];
        let mut total_bytes: u64 = 0;

        while let Some(dir) = dirs.pop() {
            for entry in self.list_dir(owner, repo, &dir, branch).await? {
                if entry.entry_type == "dir" {
                    dirs.push(entry.path);
                    continue;
                }
                if entry.entry_type != "file" {
                    // submodules, symlinks
                    debug!("Skipping {} entry: {}", entry.entry_type, entry.path);
                    continue;
                }
                if entry.size > self.limits.max_file_size {
                    warn!("Skipping oversized file: {} ({} bytes)", entry.path, entry.size);
                    continue;
                }
                if total_bytes + entry.size > self.limits.max_total_size {
                    warn!("Total size cap reached, skipping: {}", entry.path);
                    continue;
                }

                match self.fetch_file(owner, repo, &entry.path, branch).await? {
                    Some(content) => {
                        debug!("Processing file: {}", entry.path);
                        total_bytes += content.len() as u64;
                        files.push(RepoFile {
                            path: entry.path,
                            content,
                        });
                    }
                    None => warn!("Skipping non-text file: {}", entry.path),
                }
            }
        }

        Ok(files)
    }

    async fn list_dir(
        &self,
        owner: &str,
        repo: &str,
        dir: &str,
        branch: Option<&str>,
    ) -> Result<Vec<ContentEntry>> {
        let response = self.get_contents(owner, repo, dir, branch).await?;
        Ok(response.json().await?)
    }

    // Returns None when the body is not text we can hand to the model
    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Option<String>> {
        let response = self.get_contents(owner, repo, path, branch).await?;
        let body: FileContentsResponse = response.json().await?;

        if body.encoding != "base64" {
            // the API serves e.g. "none" for blobs it won't inline
            return Ok(None);
        }
        Ok(decode_content(&body.content))
    }

    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = if path.is_empty() {
            format!("{}/repos/{}/{}/contents", self.base_url, owner, repo)
        } else {
            format!("{}/repos/{}/{}/contents/{}", self.base_url, owner, repo, path)
        };
        let mut request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "review-gateway");
        if let Some(branch) = branch {
            request = request.query(&[("ref", branch)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::RepoNotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::GitHub {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

// Contents API bodies arrive base64 with embedded newlines. None when the
// decoded bytes are not valid UTF-8.
fn decode_content(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}
