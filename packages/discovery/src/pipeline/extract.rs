//! Candidate extraction with bounded retry and response parsing.

use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, Result};
use crate::retry::{retry_rate_limited, RetryPolicy};
use crate::traits::{ai::AI, sleeper::Sleeper};
use crate::types::candidate::Candidate;

use super::prompts::extraction_prompt;

/// Ask the model for candidates, retrying only on rate limits, and parse the
/// reply. A malformed reply rejects the whole batch.
pub async fn extract_candidates(
    ai: &dyn AI,
    sleeper: &dyn Sleeper,
    policy: &RetryPolicy,
    subject: &str,
    context: &str,
) -> Result<Vec<Candidate>> {
    let prompt = extraction_prompt(subject, context);
    let prompt = prompt.as_str();

    let text = retry_rate_limited(policy, sleeper, move |attempt| {
        debug!(attempt, subject, "Requesting extraction");
        ai.generate(prompt)
    })
    .await?;

    let candidates = parse_candidates(&text).inspect_err(|e| {
        if let DiscoveryError::ExtractionParse { raw, .. } = e {
            warn!(error = %e, raw = %raw, "Extraction response was not a JSON array");
        }
    })?;

    info!(subject, count = candidates.len(), "Extracted candidates");
    Ok(candidates)
}

/// Parse a model reply into candidates after removing code fences.
pub fn parse_candidates(text: &str) -> Result<Vec<Candidate>> {
    let body = strip_code_fence(text);
    serde_json::from_str::<Vec<Candidate>>(body).map_err(|source| {
        DiscoveryError::ExtractionParse {
            source,
            raw: text.to_string(),
        }
    })
}

/// Remove at most one leading fence (with optional language tag) and at
/// most one trailing fence.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the first newline.
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest
                .strip_prefix("json")
                .or_else(|| rest.strip_prefix("JSON"))
                .unwrap_or(rest),
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{MockAI, RecordingSleeper};

    const ARRAY: &str = r#"[{"name": "Pizza Nova", "neighborhood": "Markham", "taste_rating": 8, "notes": "Classic slice", "confidence_score": 9}]"#;

    #[test]
    fn fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{}\n```", ARRAY);
        assert_eq!(
            parse_candidates(&fenced).unwrap(),
            parse_candidates(ARRAY).unwrap()
        );
    }

    #[test]
    fn strips_only_one_pair() {
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("```json[]```"), "[]");
        assert_eq!(strip_code_fence("  []  "), "[]");
        assert_eq!(strip_code_fence("```json\n```[]```\n```"), "```[]```");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_candidates("```json\n[{\"name\": \n```").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionParseError);
    }

    #[test]
    fn wrapped_object_is_rejected() {
        let err = parse_candidates(r#"{"restaurants": []}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionParseError);
    }

    #[tokio::test]
    async fn retries_through_rate_limit() {
        let ai = MockAI::new()
            .with_rate_limit()
            .with_response(format!("```json\n{}\n```", ARRAY));
        let sleeper = RecordingSleeper::new();

        let candidates =
            extract_candidates(&ai, &sleeper, &RetryPolicy::default(), "Pizza", "ctx")
                .await
                .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Pizza Nova");
        assert_eq!(ai.prompts().len(), 2);
        assert_eq!(sleeper.delays().len(), 1);
    }

    #[tokio::test]
    async fn non_quota_failure_aborts_immediately() {
        let ai = MockAI::new()
            .with_failure("400 invalid argument")
            .with_response(ARRAY);
        let sleeper = RecordingSleeper::new();

        let err = extract_candidates(&ai, &sleeper, &RetryPolicy::default(), "Pizza", "ctx")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExtractionFailed);
        assert_eq!(ai.prompts().len(), 1);
    }
}
