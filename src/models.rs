use serde::{Deserialize, Serialize};

// Seniority level the review is calibrated for
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateLevel {
    Junior,
    Middle,
    Senior,
}

impl CandidateLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateLevel::Junior => "Junior",
            CandidateLevel::Middle => "Middle",
            CandidateLevel::Senior => "Senior",
        }
    }
}

// Inbound review request
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ReviewRequest {
    pub repo_owner: String,
    pub repo_name: String,
    // branch/ref to review; the host's default branch when omitted
    #[serde(default)]
    pub branch: Option<String>,
    pub candidate_level: CandidateLevel,
    // extra context for the prompt, may be empty
    #[serde(default)]
    pub assignment_description: String,
}

impl ReviewRequest {
    pub fn repo_ref(&self) -> String {
        match &self.branch {
            Some(branch) => format!("{}/{}@{}", self.repo_owner, self.repo_name, branch),
            None => format!("{}/{}", self.repo_owner, self.repo_name),
        }
    }
}

// One fetched repository file
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RepoFile {
    pub path: String,
    pub content: String,
}

// Outbound review
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ReviewResponse {
    pub files_found: Vec<String>,
    pub comments: String,
    // parsed out of answers like "7/10"; null when the answer was unusable
    pub rating: Option<u8>,
    pub conclusion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_level_rejects_unknown_values() {
        let err = serde_json::from_str::<CandidateLevel>("\"Principal\"");
        assert!(err.is_err());

        let ok: CandidateLevel = serde_json::from_str("\"Middle\"").unwrap();
        assert_eq!(ok, CandidateLevel::Middle);
    }

    #[test]
    fn review_request_defaults() {
        let req: ReviewRequest = serde_json::from_str(
            r#"{"repo_owner":"o","repo_name":"r","candidate_level":"Junior"}"#,
        )
        .unwrap();
        assert_eq!(req.branch, None);
        assert_eq!(req.assignment_description, "");
        assert_eq!(req.repo_ref(), "o/r");
    }

    #[test]
    fn repo_ref_includes_branch() {
        let req: ReviewRequest = serde_json::from_str(
            r#"{"repo_owner":"o","repo_name":"r","branch":"dev","candidate_level":"Senior"}"#,
        )
        .unwrap();
        assert_eq!(req.repo_ref(), "o/r@dev");
    }
}
