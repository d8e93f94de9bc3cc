use std::sync::OnceLock;

use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{domain::UserId, model::types::CompletionRequest};

/// An advisory request as posted by the mini-app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    /// Telegram id of the requester.
    #[serde(deserialize_with = "lax_i64")]
    pub user_id: i64,
    pub product: String,
    pub problems: Vec<String>,
    #[serde(default)]
    pub extra_info: String,
    /// Remote URLs / Telegram file ids, or `data:` URLs with a base64 payload.
    #[serde(default)]
    pub photos: Vec<String>,
}

impl AdvisoryRequest {
    pub fn requester(&self) -> UserId {
        UserId(self.user_id)
    }
}

/// Accepts `123` as well as `"123"`.
fn lax_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("user_id must be an integer, got {s:?}"))),
    }
}

/// Structured AI answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub analysis: String,
    pub suggestions: Vec<String>,
}

impl Analysis {
    pub fn from_completion(text: &str) -> Self {
        Self {
            analysis: text.to_string(),
            suggestions: extract_suggestions(text),
        }
    }
}

/// Response body of the analyze endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Analysis>,
}

impl AdvisoryResult {
    pub fn answered(analysis: Analysis) -> Self {
        Self {
            success: true,
            result: Some(analysis),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            result: None,
        }
    }
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*[•\-][ \t]*(.*?)[ \t\r]*$").expect("bullet regex")
    })
}

/// Every line starting with `•` or `-` (after indentation), marker stripped.
pub fn extract_suggestions(text: &str) -> Vec<String> {
    bullet_re()
        .captures_iter(text)
        .map(|c| c.get(1).map(|m| m.as_str()).unwrap_or("").to_string())
        .collect()
}

pub fn system_prompt(language: &str) -> String {
    format!(
        "You are a product support advisor. Respond only in {language}. \
Write your answer as bullet-pointed recommendations, one per line, each line starting with \"• \". \
Do not add any text outside the bullet list."
    )
}

pub fn build_completion_request(req: &AdvisoryRequest, language: &str) -> CompletionRequest {
    let problems = req
        .problems
        .iter()
        .map(|p| format!("* {p}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut user = format!("Product: {}\nProblems:\n{problems}", req.product);
    if !req.extra_info.trim().is_empty() {
        user.push_str(&format!("\nAdditional details: {}", req.extra_info.trim()));
    }

    CompletionRequest {
        system: system_prompt(language),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_optional_fields() {
        let req: AdvisoryRequest = serde_json::from_value(json!({
            "user_id": 12345,
            "product": "tomato",
            "problems": ["yellow leaves"]
        }))
        .unwrap();
        assert_eq!(req.requester(), UserId(12345));
        assert_eq!(req.extra_info, "");
        assert!(req.photos.is_empty());
    }

    #[test]
    fn user_id_accepts_numeric_strings_only() {
        let ok: AdvisoryRequest = serde_json::from_value(json!({
            "user_id": "987",
            "product": "p",
            "problems": []
        }))
        .unwrap();
        assert_eq!(ok.user_id, 987);

        let bad = serde_json::from_value::<AdvisoryRequest>(json!({
            "user_id": "abc",
            "product": "p",
            "problems": []
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn product_and_problems_are_required() {
        assert!(serde_json::from_value::<AdvisoryRequest>(json!({
            "user_id": 1,
            "problems": []
        }))
        .is_err());
        assert!(serde_json::from_value::<AdvisoryRequest>(json!({
            "user_id": 1,
            "product": "p"
        }))
        .is_err());
    }

    #[test]
    fn suggestions_match_bullet_lines() {
        let text = "Here is my advice:\n• Water less often\n- Move to shade\n  • Check the soil pH\nThanks!";
        let s = extract_suggestions(text);
        assert_eq!(
            s,
            vec!["Water less often", "Move to shade", "Check the soil pH"]
        );
    }

    #[test]
    fn suggestions_handle_crlf_and_no_bullets() {
        assert_eq!(extract_suggestions("• a\r\n• b\r\n"), vec!["a", "b"]);
        assert!(extract_suggestions("no bullets here\njust prose").is_empty());
    }

    #[test]
    fn failed_result_omits_payload() {
        let v = serde_json::to_value(AdvisoryResult::failed()).unwrap();
        assert_eq!(v, json!({ "success": false }));

        let v = serde_json::to_value(AdvisoryResult::answered(Analysis::from_completion(
            "• one",
        )))
        .unwrap();
        assert_eq!(
            v,
            json!({
                "success": true,
                "result": { "analysis": "• one", "suggestions": ["one"] }
            })
        );
    }

    #[test]
    fn completion_request_carries_request_fields() {
        let req = AdvisoryRequest {
            user_id: 1,
            product: "rose".into(),
            problems: vec!["aphids".into(), "wilting".into()],
            extra_info: "indoor".into(),
            photos: vec![],
        };
        let c = build_completion_request(&req, "Persian");
        assert!(c.system.contains("Persian"));
        assert!(c.user.contains("rose"));
        assert!(c.user.contains("* aphids\n* wilting"));
        assert!(c.user.contains("indoor"));
        // Problems are listed with `*` so echoed prompts never count as bullets.
        assert!(extract_suggestions(&c.user).is_empty());
    }
}
