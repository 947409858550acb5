//! Prompt templates for extraction and verification.

use schemars::schema_for;

use crate::types::candidate::Candidate;

/// Instructions asking for a JSON array of candidates found in `context`.
pub fn extraction_prompt(subject: &str, context: &str) -> String {
    let schema = serde_json::to_string_pretty(&schema_for!(Vec<Candidate>))
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Analyze these search results and extract ANY restaurant names that serve {subject}.
RETURN ONLY VALID JSON: an array of objects, no commentary.

For each restaurant:
- name: exactly as written in the source
- neighborhood: the area or plaza it is in, empty if unknown
- taste_rating: 1-10, how highly the sources rate the food
- notes: one short sentence on why it was mentioned
- confidence_score: 0-10, how sure you are this is a real restaurant serving {subject}

Return [] if no restaurant is mentioned.

JSON Schema:
{schema}

SEARCH DATA:
{context}"#
    )
}

/// Ask for a one-word open/closed judgment from secondary snippets.
pub fn verification_prompt(name: &str, locality: &str, context: &str) -> String {
    format!(
        r#"Based only on the search results below, is the restaurant "{name}" near {locality} permanently closed?

Answer with exactly one word:
OPEN - it is operating
CLOSED - the results clearly say it has permanently closed
UNKNOWN - the results do not say

SEARCH DATA:
{context}"#
    )
}
