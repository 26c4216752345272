use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A live (or recently finished) match as returned by `/predict/{sport}/live`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    /// e.g. "1-0"
    pub current_score: String,
    /// Match clock; the backend sends either a string ("45") or a number (45)
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<serde_json::Value>,
}

/// Match data embedded in a prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchData {
    pub home_team: String,
    pub away_team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<serde_json::Value>,
}

/// Model-derived outcome estimate for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    pub match_data: MatchData,
    /// Human-readable label, e.g. "Arsenal wins"
    pub prediction: String,
    /// Model confidence (0.0–1.0)
    pub confidence: f64,
    /// RFC 3339, or a naive ISO-8601 datetime read as UTC
    #[serde(deserialize_with = "iso_instant")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_insights: Option<serde_json::Value>,
}

/// Body of `POST /predict/{sport}/predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub match_id: String,
    /// "match_outcome", "next_score", ...
    pub prediction_type: String,
}

/// Error body the backend attaches to non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(default)]
    pub error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

fn iso_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}
