//! Run endpoint request and query models

use serde::{Deserialize, Deserializer};

/// Body for `POST /runs`
///
/// Every field is optional; the handler falls back to configured defaults.
/// Numeric fields tolerate clients that send numbers as strings, and any
/// value that cannot be read as a number is treated as absent rather than
/// rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunRequest {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub clients: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Query parameters for `GET /runs`
#[derive(Debug, Default, Deserialize)]
pub struct ListRunsQuery {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
}

/// Body for `POST /runs/{id}/stop` responses
#[derive(Debug, serde::Serialize)]
pub struct StopRunResponse {
    pub message: String,
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.and_then(|n| u64::try_from(n).ok()))
}

/// Accept a JSON number, a numeric string, or anything else as `None`
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fields_accept_numbers() {
        let req: CreateRunRequest =
            serde_json::from_str(r#"{"duration": 30, "clients": 5, "url": "http://x/"}"#).unwrap();
        assert_eq!(req.duration, Some(30));
        assert_eq!(req.clients, Some(5));
        assert_eq!(req.url.as_deref(), Some("http://x/"));
    }

    #[test]
    fn test_numeric_fields_accept_numeric_strings() {
        let req: CreateRunRequest =
            serde_json::from_str(r#"{"duration": "45", "clients": " 8 "}"#).unwrap();
        assert_eq!(req.duration, Some(45));
        assert_eq!(req.clients, Some(8));
    }

    #[test]
    fn test_garbage_numerics_fall_back_to_absent() {
        let req: CreateRunRequest =
            serde_json::from_str(r#"{"duration": "soon", "clients": {"n": 1}}"#).unwrap();
        assert_eq!(req.duration, None);
        assert_eq!(req.clients, None);
    }

    #[test]
    fn test_negative_numbers_treated_as_absent() {
        let req: CreateRunRequest = serde_json::from_str(r#"{"duration": -5}"#).unwrap();
        assert_eq!(req.duration, None);
    }

    #[test]
    fn test_empty_body_is_valid() {
        let req: CreateRunRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.duration, None);
        assert_eq!(req.clients, None);
        assert_eq!(req.url, None);
    }
}
