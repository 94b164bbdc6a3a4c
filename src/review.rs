use serde_json::Value;
use tracing::warn;

use crate::models::{CandidateLevel, RepoFile};

pub const FALLBACK_CONCLUSION: &str =
    "The code review is complete based on the provided files.";

// Structured fields pulled out of the model's answer
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReview {
    pub comments: String,
    pub rating: Option<u8>,
    pub conclusion: String,
}

// Prompt template, calibrated by seniority level
pub fn create_prompt(files: &[RepoFile], description: &str, level: CandidateLevel) -> String {
    let mut prompt = format!(
        "You are reviewing code for a '{}' level developer.\n\nCode files:\n",
        level.as_str()
    );
    for file in files {
        prompt.push_str(&format!("File: {}\n{}\n\n", file.path, file.content));
    }
    if !description.is_empty() {
        prompt.push_str(&format!("Assignment: {}\n\n", description));
    }
    prompt.push_str(
        "Please provide feedback in the following format: Downsides/Comments, Rating (?/10), Conclusion.\n\
         Please use the following JSON schema:\n\
         {\n\"Downsides/Comments\": \"<Your comments here>\",\n\"Rating\": \"<Your rating here>\",\n\"Conclusion\": \"<Your conclusion here>\"\n}",
    );
    prompt
}

// Parse the model's JSON answer, tolerating markdown fences. Falls back to
// the raw text when the answer isn't the requested shape.
pub fn parse_review(review: &str) -> ParsedReview {
    let stripped = review
        .trim()
        .replace("```json", "")
        .replace("```", "");
    let stripped = stripped.trim();

    match serde_json::from_str::<Value>(stripped) {
        Ok(parsed) => ParsedReview {
            comments: tidy_comments(
                parsed
                    .get("Downsides/Comments")
                    .and_then(Value::as_str)
                    .unwrap_or(""),
            ),
            rating: parsed.get("Rating").and_then(parse_rating),
            conclusion: parsed
                .get("Conclusion")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        },
        Err(e) => {
            warn!("Could not parse review JSON: {}", e);
            ParsedReview {
                comments: review.to_string(),
                rating: None,
                conclusion: FALLBACK_CONCLUSION.to_string(),
            }
        }
    }
}

// Accepts a bare number or text like "7/10"
fn parse_rating(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => {
            let lead = s.split('/').next()?.trim();
            lead.parse::<u8>().ok()
        }
        _ => None,
    }
}

// Strip the markdown the model likes to sprinkle in
fn tidy_comments(text: &str) -> String {
    text.replace("\n\n", " ").replace("**", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<RepoFile> {
        vec![
            RepoFile {
                path: "src/lib.rs".to_string(),
                content: "pub fn add(a: i32, b: i32) -> i32 { a + b }".to_string(),
            },
            RepoFile {
                path: "README.md".to_string(),
                content: "# demo".to_string(),
            },
        ]
    }

    #[test]
    fn prompt_names_level_and_files() {
        let prompt = create_prompt(&files(), "Build an adder.", CandidateLevel::Senior);
        assert!(prompt.contains("'Senior' level developer"));
        assert!(prompt.contains("File: src/lib.rs"));
        assert!(prompt.contains("File: README.md"));
        assert!(prompt.contains("Assignment: Build an adder."));
        assert!(prompt.contains("Downsides/Comments"));
    }

    #[test]
    fn prompt_omits_empty_assignment() {
        let prompt = create_prompt(&files(), "", CandidateLevel::Junior);
        assert!(!prompt.contains("Assignment:"));
    }

    #[test]
    fn parses_clean_json() {
        let answer = r#"{"Downsides/Comments": "Missing tests.", "Rating": "7/10", "Conclusion": "Solid."}"#;
        let parsed = parse_review(answer);
        assert_eq!(parsed.comments, "Missing tests.");
        assert_eq!(parsed.rating, Some(7));
        assert_eq!(parsed.conclusion, "Solid.");
    }

    #[test]
    fn parses_fenced_json() {
        let answer = "```json\n{\"Downsides/Comments\": \"ok\", \"Rating\": \"9/10\", \"Conclusion\": \"fine\"}\n```";
        let parsed = parse_review(answer);
        assert_eq!(parsed.rating, Some(9));
        assert_eq!(parsed.conclusion, "fine");
    }

    #[test]
    fn falls_back_on_unparsable_answer() {
        let answer = "The model rambled instead of returning JSON.";
        let parsed = parse_review(answer);
        assert_eq!(parsed.comments, answer);
        assert_eq!(parsed.rating, None);
        assert_eq!(parsed.conclusion, FALLBACK_CONCLUSION);
    }

    #[test]
    fn rating_accepts_bare_numbers() {
        let answer = r#"{"Downsides/Comments": "x", "Rating": 8, "Conclusion": "y"}"#;
        assert_eq!(parse_review(answer).rating, Some(8));
    }

    #[test]
    fn rating_rejects_non_numeric_text() {
        let answer = r#"{"Downsides/Comments": "x", "Rating": "N/A", "Conclusion": "y"}"#;
        assert_eq!(parse_review(answer).rating, None);
    }

    #[test]
    fn comments_are_tidied() {
        let answer = r#"{"Downsides/Comments": "**Bold** point.\n\nNext point.", "Rating": "5/10", "Conclusion": "c"}"#;
        assert_eq!(parse_review(answer).comments, "Bold point. Next point.");
    }
}
