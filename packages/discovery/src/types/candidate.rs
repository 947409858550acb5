//! Candidate records as returned by the extraction provider.
//!
//! Model output is untrusted, so deserialization is lenient about shape:
//! numbers may arrive as floats or strings, fields may be missing or null.
//! Missing scores become 0 instead of poisoning the confidence check.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Lowest confidence score that survives the filter stage.
pub const CONFIDENCE_THRESHOLD: i32 = 5;

/// A restaurant mention extracted from search snippets, not yet accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Candidate {
    /// Restaurant name exactly as written in the source
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub name: String,

    /// Neighbourhood or area the restaurant is in
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub neighborhood: String,

    /// 1-10 rating of the food based on the reviews
    #[serde(default, deserialize_with = "lenient_int")]
    #[schemars(with = "i32")]
    pub taste_rating: i32,

    /// Brief note on why it was mentioned
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub notes: String,

    /// 0-10 certainty that this is a real restaurant serving the dish
    #[serde(default, deserialize_with = "lenient_int")]
    #[schemars(with = "i32")]
    pub confidence_score: i32,
}

impl Candidate {
    /// Confidence clamped to 0..=10.
    pub fn confidence(&self) -> i32 {
        self.confidence_score.clamp(0, 10)
    }

    /// Whether this candidate clears [`CONFIDENCE_THRESHOLD`].
    pub fn is_confident(&self) -> bool {
        self.confidence() >= CONFIDENCE_THRESHOLD
    }

    /// Whether the store could key this candidate.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from).unwrap_or(0))
}

fn number_from(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(saturate),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
                .map(saturate)
        }
        _ => None,
    }
}

fn saturate(n: i64) -> i32 {
    n.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
